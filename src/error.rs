//! Error types for snowfield.
//!
//! The motion model itself cannot fail; errors only come from bad inputs at
//! the edges: a nonsensical tick length or an unusable configuration.

use thiserror::Error;

/// Result type alias for snowfield operations.
pub type Result<T> = std::result::Result<T, SnowError>;

/// Errors surfaced by the simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnowError {
    /// Tick length was negative, NaN or infinite.
    #[error("invalid input: dt must be finite and non-negative, got {dt}")]
    InvalidInput { dt: f32 },

    /// Configuration rejected by [`SnowConfig::validate`](crate::SnowConfig::validate).
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

impl SnowError {
    /// Check a tick length, returning it unchanged when usable.
    pub(crate) fn check_dt(dt: f32) -> Result<f32> {
        if dt.is_finite() && dt >= 0.0 {
            Ok(dt)
        } else {
            Err(SnowError::InvalidInput { dt })
        }
    }
}
