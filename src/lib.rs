//! # snowfield
//!
//! Falling snow driven by deterministic value noise.
//!
//! Each flake carries a depth (0 = far, 1 = near) that fixes its size,
//! opacity, gravity, sway and drag. Every tick the flake is pushed by a
//! shared wind field (slow shear, per-flake jitter and intermittent
//! updrafts) and its own noise-driven sway, then damped and integrated.
//! Flakes leaving the screen vertically are recycled in place with a new
//! depth; flakes leaving sideways wrap around.
//!
//! Drawing is left to the caller: the simulation hands out one
//! [`FlakeInstance`] per flake.
//!
//! ## Quick Start
//!
//! ```
//! use snowfield::prelude::*;
//!
//! let mut sim = Simulation::new(SnowConfig::new().with_seed(42)).unwrap();
//!
//! // In your frame loop:
//! sim.tick(1.0 / 60.0).unwrap();
//! for flake in sim.instances() {
//!     // draw a white disc of `flake.radius` at `flake.position`
//!     // with opacity `flake.alpha`
//!     let _ = flake;
//! }
//! ```
//!
//! ## Determinism
//!
//! All randomness flows from one source: either `SnowConfig::seed` or an
//! `rand::Rng` passed to [`Simulation::with_rng`]. The same seed and the
//! same sequence of `dt` values reproduce the same run bit for bit, with or
//! without the `parallel` feature.
//!
//! ## Tick length
//!
//! Damping is the linear approximation `1 - drag * dt`, which only holds for
//! short steps. The driver clamps each tick to `SnowConfig::max_delta`
//! (50 ms by default) and rejects negative or non-finite `dt`.

pub mod config;
pub mod error;
pub mod noise;
pub mod particle;
pub mod render;
mod simulation;
pub mod time;
pub mod wind;

pub use config::{ScreenSize, SnowConfig};
pub use error::{Result, SnowError};
pub use glam::Vec2;
pub use noise::{hash01, smoothstep, value_noise_1d};
pub use particle::{Particle, Recycle, ResetDraw};
pub use render::{Canvas, FlakeInstance, TextCanvas};
pub use simulation::{Simulation, TickStats};
pub use wind::{wind_field, WindField};

/// Convenient re-exports for common usage.
///
/// ```
/// use snowfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ScreenSize, SnowConfig};
    pub use crate::error::SnowError;
    pub use crate::particle::{Particle, Recycle};
    pub use crate::render::{Canvas, FlakeInstance};
    pub use crate::simulation::{Simulation, TickStats};
    pub use crate::time::FrameClock;
    pub use crate::Vec2;
}
