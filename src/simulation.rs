//! Simulation driver.
//!
//! Owns the flakes and the global clock. Each [`Simulation::tick`] advances
//! time by `dt` and updates every flake against it. Flakes never read each
//! other, so the update can run on the rayon pool when the `parallel`
//! feature is enabled.

use crate::config::{ScreenSize, SnowConfig};
use crate::error::{Result, SnowError};
use crate::particle::{Particle, Recycle};
use crate::render::FlakeInstance;
use crate::wind::WindField;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    /// Step actually integrated, after clamping.
    pub dt: f32,
    /// Flakes that fell out the bottom and re-entered at the top.
    pub recycled_top: usize,
    /// Flakes lifted out the top and re-entered at the bottom.
    pub recycled_bottom: usize,
}

impl TickStats {
    #[inline]
    pub fn recycled(&self) -> usize {
        self.recycled_top + self.recycled_bottom
    }

    fn record(&mut self, recycle: Option<Recycle>) {
        match recycle {
            Some(Recycle::Top) => self.recycled_top += 1,
            Some(Recycle::Bottom) => self.recycled_bottom += 1,
            None => {}
        }
    }

    #[cfg(feature = "parallel")]
    fn merge(mut self, other: Self) -> Self {
        self.recycled_top += other.recycled_top;
        self.recycled_bottom += other.recycled_bottom;
        self
    }
}

/// A field of falling snow.
///
/// # Example
///
/// ```
/// use snowfield::{Simulation, SnowConfig};
///
/// let mut sim = Simulation::new(SnowConfig::new().with_seed(1)).unwrap();
/// for _ in 0..60 {
///     sim.tick(1.0 / 60.0).unwrap();
/// }
/// assert!((sim.time() - 1.0).abs() < 1e-4);
/// assert_eq!(sim.particles().len(), 300);
/// ```
pub struct Simulation {
    config: SnowConfig,
    wind: WindField,
    particles: Vec<Particle>,
    /// One stream per flake, only drawn from on recycle.
    streams: Vec<SmallRng>,
    /// Accumulated in `f64` so 1/240 s steps still register after days.
    time: f64,
    frame: u64,
}

impl Simulation {
    /// Build a simulation, seeding randomness from `config.seed` or, if
    /// unset, from OS entropy.
    pub fn new(config: SnowConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build a simulation drawing all randomness from `rng`.
    ///
    /// Flakes are scattered uniformly over the screen. `config.seed` is
    /// ignored.
    pub fn with_rng<R: Rng + ?Sized>(config: SnowConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let ScreenSize { width, height } = config.screen;
        let particles = (0..config.particle_count)
            .map(|_| {
                let position = Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
                Particle::spawn(position, rng)
            })
            .collect();
        Self::from_particles(config, particles, rng)
    }

    /// Build a simulation around existing flakes.
    ///
    /// `config.particle_count` is replaced by `particles.len()`; `rng` only
    /// seeds the per-flake recycle streams.
    pub fn from_particles<R: Rng + ?Sized>(
        mut config: SnowConfig,
        particles: Vec<Particle>,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        config.particle_count = particles.len();

        if config.parallel && !cfg!(feature = "parallel") {
            log::warn!("parallel updates requested but the `parallel` feature is off");
        }

        let streams = (0..particles.len())
            .map(|_| SmallRng::seed_from_u64(rng.gen()))
            .collect();

        log::debug!(
            "snowfield: {} flakes on {}x{}, seed {:?}",
            particles.len(),
            config.screen.width,
            config.screen.height,
            config.seed
        );

        Ok(Self {
            wind: WindField::new(config.screen.height),
            config,
            particles,
            streams,
            time: 0.0,
            frame: 0,
        })
    }

    /// Advance the clock by `dt` seconds and update every flake.
    ///
    /// `dt` above `config.max_delta` is clamped to it.
    ///
    /// # Errors
    ///
    /// [`SnowError::InvalidInput`] for negative, NaN or infinite `dt`; the
    /// simulation is left untouched.
    pub fn tick(&mut self, dt: f32) -> Result<TickStats> {
        let mut dt = SnowError::check_dt(dt)?;
        if let Some(max) = self.config.max_delta {
            if dt > max {
                log::warn!("tick of {dt:.4}s clamped to {max:.4}s");
                dt = max;
            }
        }

        self.time += f64::from(dt);
        self.frame += 1;

        #[cfg(feature = "parallel")]
        let mut stats = if self.config.parallel {
            self.update_parallel(dt)?
        } else {
            self.update_serial(dt)?
        };
        #[cfg(not(feature = "parallel"))]
        let mut stats = self.update_serial(dt)?;
        stats.dt = dt;
        Ok(stats)
    }

    fn update_serial(&mut self, dt: f32) -> Result<TickStats> {
        let (t, screen, wind) = (self.time, self.config.screen, self.wind);
        let mut stats = TickStats::default();
        for (particle, rng) in self.particles.iter_mut().zip(self.streams.iter_mut()) {
            stats.record(particle.update(dt, t, &screen, &wind, rng)?);
        }
        Ok(stats)
    }

    #[cfg(feature = "parallel")]
    fn update_parallel(&mut self, dt: f32) -> Result<TickStats> {
        use rayon::prelude::*;

        let (t, screen, wind) = (self.time, self.config.screen, self.wind);
        self.particles
            .par_iter_mut()
            .zip(self.streams.par_iter_mut())
            .map(|(particle, rng)| {
                let mut stats = TickStats::default();
                stats.record(particle.update(dt, t, &screen, &wind, rng)?);
                Ok::<_, SnowError>(stats)
            })
            .try_reduce(TickStats::default, |a, b| Ok(a.merge(b)))
    }

    // ========== Accessors ==========

    /// Global simulated time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ticks taken so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    #[inline]
    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Render snapshot of every flake.
    pub fn instances(&self) -> Vec<FlakeInstance> {
        self.particles.iter().map(Particle::instance).collect()
    }

    /// Refill `out` with the current snapshot, reusing its allocation.
    pub fn write_instances(&self, out: &mut Vec<FlakeInstance>) {
        out.clear();
        out.extend(self.particles.iter().map(Particle::instance));
    }
}
