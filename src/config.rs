//! Simulation configuration.
//!
//! The defaults reproduce the calibrated look: a 900x600 screen with 300
//! flakes. Everything the driver needs is carried here; nothing is read
//! from global state.

use crate::error::{Result, SnowError};

/// Default screen width in pixels.
pub const DEFAULT_SCREEN_WIDTH: f32 = 900.0;
/// Default screen height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: f32 = 600.0;
/// Default number of flakes.
pub const DEFAULT_PARTICLE_COUNT: usize = 300;
/// Default upper bound for a single tick, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.05;

/// How far below the bottom edge a flake may fall before it is recycled.
pub const BOTTOM_EXIT_MARGIN: f32 = 20.0;
/// Flakes lifted above this y are recycled to the bottom.
pub const TOP_EXIT_Y: f32 = -60.0;
/// Respawn height for flakes that left through the bottom.
pub const RESPAWN_TOP_Y: f32 = -20.0;
/// Horizontal distance past either side before a flake wraps around.
pub const WRAP_MARGIN: f32 = 50.0;

/// Screen extent in pixels, y pointing down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check that both extents are finite and positive.
    pub fn validate(&self) -> Result<()> {
        let Self { width, height } = *self;
        if !(width.is_finite() && width > 0.0) || !(height.is_finite() && height > 0.0) {
            return Err(SnowError::InvalidConfig(format!(
                "screen size must be finite and positive, got {width}x{height}"
            )));
        }
        Ok(())
    }

    /// Flakes with `y` past this are recycled to the top.
    #[inline]
    pub fn bottom_exit(&self) -> f32 {
        self.height + BOTTOM_EXIT_MARGIN
    }

    /// Flakes with `y` above this are recycled to the bottom.
    #[inline]
    pub fn top_exit(&self) -> f32 {
        TOP_EXIT_Y
    }

    #[inline]
    pub fn respawn_top(&self) -> f32 {
        RESPAWN_TOP_Y
    }

    #[inline]
    pub fn respawn_bottom(&self) -> f32 {
        self.height + BOTTOM_EXIT_MARGIN
    }

    /// Left wrap threshold; a flake left of it reappears at [`Self::wrap_right`].
    #[inline]
    pub fn wrap_left(&self) -> f32 {
        -WRAP_MARGIN
    }

    #[inline]
    pub fn wrap_right(&self) -> f32 {
        self.width + WRAP_MARGIN
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

/// Snowfall configuration.
///
/// # Example
///
/// ```
/// use snowfield::SnowConfig;
///
/// let config = SnowConfig::new()
///     .with_particle_count(1_000)
///     .with_seed(7)
///     .with_max_delta(Some(1.0 / 30.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SnowConfig {
    pub screen: ScreenSize,
    pub particle_count: usize,
    /// Seed for the master random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Ticks longer than this are clamped before integration.
    ///
    /// The damping factor `1 - drag * dt` only behaves for `dt` well below
    /// `1 / drag` (about 0.6 s for the farthest flakes).
    pub max_delta: Option<f32>,
    /// Update flakes on the rayon pool. Needs the `parallel` feature.
    pub parallel: bool,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            screen: ScreenSize::default(),
            particle_count: DEFAULT_PARTICLE_COUNT,
            seed: None,
            max_delta: Some(DEFAULT_MAX_DELTA),
            parallel: false,
        }
    }
}

impl SnowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen(mut self, width: f32, height: f32) -> Self {
        self.screen = ScreenSize::new(width, height);
        self
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the per-tick clamp. `None` disables clamping.
    pub fn with_max_delta(mut self, max_delta: Option<f32>) -> Self {
        self.max_delta = max_delta;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that the screen and tick clamp are usable.
    pub fn validate(&self) -> Result<()> {
        self.screen.validate()?;
        if let Some(max) = self.max_delta {
            if !(max.is_finite() && max > 0.0) {
                return Err(SnowError::InvalidConfig(format!(
                    "max_delta must be finite and positive, got {max}"
                )));
            }
        }
        Ok(())
    }
}
