//! Wind field.
//!
//! Maps global time, screen height, depth and a flake's seed to a 2-D
//! acceleration. Two parts:
//!
//! - **Shear**: a slow global sine plus a small per-flake noise jitter,
//!   pushing far flakes right and near flakes left.
//! - **Lift**: a rectified, phase-shifted sine gated by a per-flake noise
//!   stream, producing intermittent updrafts (negative `y`).
//!
//! Both grow toward the top of the screen. The scale factors are calibrated
//! and fixed.
//!
//! Time is `f64` seconds. Phases are formed in `f64` before narrowing, so
//! the field keeps moving after days of accumulated time.

use crate::config::DEFAULT_SCREEN_HEIGHT;
use crate::noise::value_noise_1d;
use glam::Vec2;

const SHEAR_FREQ: f64 = 0.35;
const SHEAR_STRENGTH: f32 = 200.0;
const JITTER_FREQ: f64 = 0.9;
const JITTER_AMP: f32 = 0.35;

const GUST_FREQ: f64 = 1.2;
const GUST_PHASE_PER_SEED: f64 = 0.01;
const LIFT_FREQ: f64 = 1.1;
const LIFT_STRENGTH: f32 = 220.0;
/// Offset separating the lift noise stream from the jitter stream.
const LIFT_SEED_OFFSET: u32 = 999;

/// Wind field over a screen of a given height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindField {
    pub screen_height: f32,
}

impl Default for WindField {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_HEIGHT)
    }
}

impl WindField {
    pub const fn new(screen_height: f32) -> Self {
        Self { screen_height }
    }

    /// `0.4` at the bottom edge up to `1.0` at the top.
    #[inline]
    pub fn height_factor(&self, y: f32) -> f32 {
        0.4 + 0.6 * (1.0 - y / self.screen_height)
    }

    /// Acceleration at time `t` for a flake at height `y`.
    ///
    /// Pure: identical inputs give identical output.
    pub fn sample(&self, t: f64, y: f32, depth: f32, seed: u32) -> Vec2 {
        let dir_x = 0.5 - depth;
        let height = self.height_factor(y);

        let base = (t * SHEAR_FREQ).sin() as f32;
        let jitter = (value_noise_1d((t * JITTER_FREQ) as f32, seed) * 2.0 - 1.0) * JITTER_AMP;
        let strength = (base + jitter) * SHEAR_STRENGTH * height;
        let ax = dir_x * strength;

        let gust = (t * GUST_FREQ + f64::from(seed) * GUST_PHASE_PER_SEED)
            .sin()
            .max(0.0) as f32;
        let personal = value_noise_1d(
            (t * LIFT_FREQ) as f32,
            seed.wrapping_add(LIFT_SEED_OFFSET),
        );
        let lift = gust * personal * LIFT_STRENGTH * (0.3 + 0.7 * height);

        Vec2::new(ax, -lift)
    }
}

/// Evaluate the wind field for the default 600 px screen.
///
/// Returns `(ax, ay)`; `ay` is zero or negative (upward).
pub fn wind_field(t: f64, y: f32, depth: f32, seed: u32) -> (f32, f32) {
    let a = WindField::default().sample(t, y, depth, seed);
    (a.x, a.y)
}
