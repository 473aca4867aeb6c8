//! Snow flake state and per-tick integration.
//!
//! A [`Particle`] lives for the whole simulation. When it leaves the screen
//! vertically it is *recycled*: [`Particle::reset`] overwrites its fields in
//! place with a fresh depth and everything derived from it. Leaving
//! sideways only wraps the position.
//!
//! # Integration
//!
//! Each [`Particle::update`] does, in order:
//!
//! 1. sample the [`WindField`] at the flake's height, depth and seed
//! 2. add a noise-driven horizontal sway and the flake's gravity
//! 3. explicit Euler step on velocity
//! 4. linear damping `max(0, 1 - drag * dt)`
//! 5. Euler step on position
//! 6. vertical recycling, then horizontal wrap
//!
//! The damping step assumes `dt` is small next to `1 / drag`.

use crate::config::ScreenSize;
use crate::error::{Result, SnowError};
use crate::noise::value_noise_1d;
use crate::render::FlakeInstance;
use crate::wind::WindField;
use glam::Vec2;
use rand::Rng;

/// Exclusive upper bound for per-flake noise seeds.
pub const SEED_RANGE: u32 = 10_000;

/// Random draws consumed by one reset.
///
/// Splitting these out keeps the depth-derived formulas independent of any
/// random source, so a flake can be built from known values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResetDraw {
    /// Depth in `[0, 1)`; 0 is far, 1 is near.
    pub depth: f32,
    /// Uniform roll in `[0, 1)` scaling the sway speed.
    pub sway_roll: f32,
    /// Noise seed in `[0, SEED_RANGE)`.
    pub seed: u32,
}

impl ResetDraw {
    /// Draw a fresh set of reset parameters.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            depth: rng.gen::<f32>(),
            sway_roll: rng.gen::<f32>(),
            seed: rng.gen_range(0..SEED_RANGE),
        }
    }
}

/// Edge a recycled flake re-entered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recycle {
    /// Fell out of the bottom, respawned above the top edge.
    Top,
    /// Lifted out of the top, respawned below the bottom edge.
    Bottom,
}

/// One snow flake.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    depth: f32,
    size: f32,
    alpha: u8,
    gravity: f32,
    sway_amp: f32,
    sway_speed: f32,
    drag: f32,
    seed: u32,
}

impl Particle {
    /// Create a flake at `position` with freshly drawn parameters.
    pub fn spawn<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        Self::from_draw(position, ResetDraw::sample(rng))
    }

    /// Create a flake at `position` from explicit reset draws.
    pub fn from_draw(position: Vec2, draw: ResetDraw) -> Self {
        let mut particle = Self {
            position,
            velocity: Vec2::ZERO,
            depth: 0.0,
            size: 0.0,
            alpha: 0,
            gravity: 0.0,
            sway_amp: 0.0,
            sway_speed: 0.0,
            drag: 0.0,
            seed: 0,
        };
        particle.reset_with(position, draw);
        particle
    }

    /// Recycle in place with freshly drawn parameters.
    pub fn reset<R: Rng + ?Sized>(&mut self, position: Vec2, rng: &mut R) {
        self.reset_with(position, ResetDraw::sample(rng));
    }

    /// Recycle in place from explicit reset draws.
    ///
    /// Overwrites every field; nothing from the previous life survives.
    pub fn reset_with(&mut self, position: Vec2, draw: ResetDraw) {
        let depth = draw.depth.clamp(0.0, 1.0);

        self.position = position;
        self.depth = depth;
        self.size = 1.0 + depth * 2.5;
        self.alpha = (70.0 + depth * 185.0).round().clamp(0.0, 255.0) as u8;
        self.gravity = 30.0 + depth * 80.0;
        self.velocity = Vec2::new(0.0, 20.0 + depth * 150.0);
        self.sway_amp = 40.0 + depth * 70.0;
        self.sway_speed = 0.25 + draw.sway_roll * 0.8;
        // near flakes get less drag so they read as heavier
        self.drag = 1.6 - depth * 0.6;
        self.seed = draw.seed;
    }

    /// Horizontal sway acceleration at time `t`, in `[-sway_amp, sway_amp]`.
    #[inline]
    pub fn sway(&self, t: f64) -> f32 {
        let n = value_noise_1d((t * f64::from(self.sway_speed)) as f32, self.seed);
        (n * 2.0 - 1.0) * self.sway_amp
    }

    /// Advance the flake by `dt` seconds at global time `t`.
    ///
    /// `rng` is only drawn from when the flake is recycled. Returns the edge
    /// it re-entered from, if any.
    ///
    /// # Errors
    ///
    /// [`SnowError::InvalidInput`] if `dt` is negative, NaN or infinite, and
    /// [`SnowError::InvalidConfig`] if `screen` is not finite and positive.
    /// The flake is left untouched in both cases.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        t: f64,
        screen: &ScreenSize,
        wind: &WindField,
        rng: &mut R,
    ) -> Result<Option<Recycle>> {
        let dt = SnowError::check_dt(dt)?;
        screen.validate()?;

        let wind_accel = wind.sample(t, self.position.y, self.depth, self.seed);
        let accel = Vec2::new(
            wind_accel.x + self.sway(t),
            self.gravity + wind_accel.y,
        );

        self.velocity += accel * dt;
        let damp = (1.0 - self.drag * dt).max(0.0);
        self.velocity *= damp;
        self.position += self.velocity * dt;

        let recycled = self.recycle(screen, rng);
        self.wrap(screen);
        Ok(recycled)
    }

    fn recycle<R: Rng + ?Sized>(&mut self, screen: &ScreenSize, rng: &mut R) -> Option<Recycle> {
        let edge = if self.position.y > screen.bottom_exit() {
            Recycle::Top
        } else if self.position.y < screen.top_exit() {
            Recycle::Bottom
        } else {
            return None;
        };

        let x = rng.gen_range(0.0..screen.width);
        let y = match edge {
            Recycle::Top => screen.respawn_top(),
            Recycle::Bottom => screen.respawn_bottom(),
        };
        self.reset(Vec2::new(x, y), rng);
        log::trace!("flake recycled from {:?}, seed {}", edge, self.seed);
        Some(edge)
    }

    fn wrap(&mut self, screen: &ScreenSize) {
        if self.position.x < screen.wrap_left() {
            self.position.x = screen.wrap_right();
        } else if self.position.x > screen.wrap_right() {
            self.position.x = screen.wrap_left();
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Draw radius in pixels.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Opacity, fixed for the flake's current life.
    #[inline]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    #[inline]
    pub fn sway_amp(&self) -> f32 {
        self.sway_amp
    }

    #[inline]
    pub fn sway_speed(&self) -> f32 {
        self.sway_speed
    }

    #[inline]
    pub fn drag(&self) -> f32 {
        self.drag
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Render snapshot of this flake.
    #[inline]
    pub fn instance(&self) -> FlakeInstance {
        FlakeInstance::new(self.position, self.size, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn far_flake(x: f32, y: f32) -> Particle {
        Particle::from_draw(
            Vec2::new(x, y),
            ResetDraw {
                depth: 0.0,
                sway_roll: 0.5,
                seed: 42,
            },
        )
    }

    fn step(p: &mut Particle, dt: f32, t: f64) -> Option<Recycle> {
        let mut rng = SmallRng::seed_from_u64(1);
        p.update(dt, t, &ScreenSize::default(), &WindField::default(), &mut rng)
            .unwrap()
    }

    #[test]
    fn test_reset_derives_from_depth() {
        let p = Particle::from_draw(
            Vec2::new(10.0, 20.0),
            ResetDraw {
                depth: 0.5,
                sway_roll: 0.25,
                seed: 77,
            },
        );
        assert_eq!(p.position(), Vec2::new(10.0, 20.0));
        assert_eq!(p.size(), 2.25);
        assert_eq!(p.alpha(), 163); // round(162.5)
        assert_eq!(p.gravity(), 70.0);
        assert_eq!(p.velocity(), Vec2::new(0.0, 95.0));
        assert_eq!(p.sway_amp(), 75.0);
        assert!((p.sway_speed() - 0.45).abs() < 1e-6);
        assert!((p.drag() - 1.3).abs() < 1e-6);
        assert_eq!(p.seed(), 77);
    }

    #[test]
    fn test_reset_extremes() {
        let far = far_flake(0.0, 0.0);
        assert_eq!(far.alpha(), 70);
        assert_eq!(far.drag(), 1.6);

        let near = Particle::from_draw(
            Vec2::ZERO,
            ResetDraw {
                depth: 1.0,
                sway_roll: 0.0,
                seed: 0,
            },
        );
        assert_eq!(near.alpha(), 255);
        assert_eq!(near.size(), 3.5);
        assert!(near.drag() > 0.0);
    }

    #[test]
    fn test_sample_ranges() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..1_000 {
            let draw = ResetDraw::sample(&mut rng);
            assert!((0.0..1.0).contains(&draw.depth));
            assert!((0.0..1.0).contains(&draw.sway_roll));
            assert!(draw.seed < SEED_RANGE);
        }
    }

    #[test]
    fn test_sway_bounded() {
        let p = far_flake(0.0, 0.0);
        for k in 0..2_000 {
            let s = p.sway(k as f64 * 0.013);
            assert!(s.abs() <= p.sway_amp());
        }
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut p = far_flake(450.0, 300.0);
        let before = p.clone();
        for k in 0..1_000 {
            assert_eq!(step(&mut p, 0.0, k as f64 * 0.1), None);
        }
        assert_eq!(p, before);
    }

    #[test]
    fn test_rejects_bad_dt() {
        let mut p = far_flake(450.0, 300.0);
        let before = p.clone();
        let mut rng = StepRng::new(0, 0);
        for dt in [-1.0 / 60.0, f32::NAN, f32::INFINITY] {
            let result = p.update(dt, 0.0, &ScreenSize::default(), &WindField::default(), &mut rng);
            assert!(matches!(result, Err(SnowError::InvalidInput { .. })));
        }
        assert_eq!(p, before);
    }

    #[test]
    fn test_single_step_integration() {
        let dt = 1.0 / 60.0;
        let t = 3.0;
        let mut p = far_flake(450.0, 300.0);
        let wind = WindField::default().sample(t, 300.0, 0.0, 42);
        let ax = wind.x + p.sway(t);
        let ay = 30.0 + wind.y;
        let damp = 1.0 - 1.6 * dt;
        let vx = ax * dt * damp;
        let vy = (20.0 + ay * dt) * damp;

        assert_eq!(step(&mut p, dt, t), None);
        assert!((p.velocity().x - vx).abs() < 1e-4);
        assert!((p.velocity().y - vy).abs() < 1e-4);
        assert!((p.position().x - (450.0 + vx * dt)).abs() < 1e-3);
        assert!((p.position().y - (300.0 + vy * dt)).abs() < 1e-3);
    }

    #[test]
    fn test_damping_floors_at_zero() {
        // drag * dt > 1 would flip velocity without the floor
        let mut p = far_flake(450.0, 300.0);
        step(&mut p, 1.0, 0.0);
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert_eq!(p.position(), Vec2::new(450.0, 300.0));
    }

    #[test]
    fn test_recycle_from_bottom() {
        let mut p = far_flake(450.0, 619.9);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut expected_rng = SmallRng::seed_from_u64(3);
        let expected_x = expected_rng.gen_range(0.0..900.0f32);
        let expected = ResetDraw::sample(&mut expected_rng);

        let recycled = p
            .update(0.1, 0.0, &ScreenSize::default(), &WindField::default(), &mut rng)
            .unwrap();

        assert_eq!(recycled, Some(Recycle::Top));
        assert_eq!(p.position(), Vec2::new(expected_x, -20.0));
        assert_eq!(p.depth(), expected.depth);
        assert_eq!(p.seed(), expected.seed);
        assert_eq!(p.gravity(), 30.0 + expected.depth * 80.0);
        assert_eq!(p.sway_amp(), 40.0 + expected.depth * 70.0);
        assert_eq!(p.drag(), 1.6 - expected.depth * 0.6);
        assert_eq!(p.velocity(), Vec2::new(0.0, 20.0 + expected.depth * 150.0));
    }

    #[test]
    fn test_recycle_from_top() {
        let mut p = far_flake(450.0, -61.0);
        // StepRng(0, 0) rolls zeros: x = 0, depth = 0, seed = 0
        let mut rng = StepRng::new(0, 0);
        let recycled = p
            .update(0.0, 0.0, &ScreenSize::default(), &WindField::default(), &mut rng)
            .unwrap();

        assert_eq!(recycled, Some(Recycle::Bottom));
        assert_eq!(p.position(), Vec2::new(0.0, 620.0));
        assert_eq!(p.seed(), 0);
        assert_eq!(p.depth(), 0.0);
    }

    #[test]
    fn test_wrap_left_keeps_state() {
        let mut p = far_flake(-49.0, 300.0);
        p.velocity = Vec2::new(-600.0, 0.0);
        let mut wrapped = p.clone();
        step(&mut wrapped, 1.0 / 60.0, 0.0);

        assert_eq!(wrapped.position().x, 950.0);
        assert_eq!(wrapped.depth(), p.depth());
        assert_eq!(wrapped.seed(), p.seed());
        assert_eq!(wrapped.gravity(), p.gravity());
        assert_eq!(wrapped.drag(), p.drag());

        // same step well inside the screen, where nothing wraps
        let mut inside = p.clone();
        inside.position.x = 450.0;
        step(&mut inside, 1.0 / 60.0, 0.0);
        assert!(inside.position().x < 450.0);
        assert_eq!(wrapped.velocity(), inside.velocity());
    }

    #[test]
    fn test_wrap_right() {
        let mut p = far_flake(949.0, 300.0);
        p.velocity = Vec2::new(600.0, 0.0);
        step(&mut p, 1.0 / 60.0, 0.0);
        assert_eq!(p.position().x, -50.0);
    }

    #[test]
    fn test_rejects_unusable_screen() {
        let mut rng = StepRng::new(0, 0);
        for screen in [
            ScreenSize::new(0.0, 600.0),
            ScreenSize::new(-900.0, 600.0),
            ScreenSize::new(f32::INFINITY, 600.0),
            ScreenSize::new(900.0, f32::NAN),
        ] {
            // would otherwise recycle and roll x from an empty range
            let mut p = far_flake(450.0, 700.0);
            let before = p.clone();
            let result = p.update(1.0 / 60.0, 0.0, &screen, &WindField::default(), &mut rng);
            assert!(matches!(result, Err(SnowError::InvalidConfig(_))));
            assert_eq!(p, before);
        }
    }

    #[test]
    fn test_instance_snapshot() {
        let p = far_flake(12.0, 34.0);
        let inst = p.instance();
        assert_eq!(inst.position, Vec2::new(12.0, 34.0));
        assert_eq!(inst.radius, 1.0);
        assert!((inst.alpha - 70.0 / 255.0).abs() < 1e-6);
    }
}
