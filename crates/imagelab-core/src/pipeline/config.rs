//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PipelineError;
use crate::filters::DEFAULT_GAMMA;
use crate::frequency::DEFAULT_RADIUS;

/// Tunables for a [`Pipeline`](super::Pipeline).
///
/// Every field has a default, so hosts may pass a partial object:
///
/// ```json
/// { "history_capacity": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of images kept for undo, current image included.
    pub history_capacity: usize,
    /// Minimum time between two accepted operations, in milliseconds.
    pub debounce_ms: u64,
    /// Largest width a resize may produce.
    pub max_width: u32,
    /// Largest height a resize may produce.
    pub max_height: u32,
    /// Disc radius of the low-pass and high-pass filters.
    pub frequency_radius: f64,
    /// Exponent of the gamma operation and the last step of the special chain.
    pub gamma: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 20,
            debounce_ms: 400,
            max_width: 10_000,
            max_height: 10_000,
            frequency_radius: DEFAULT_RADIUS,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl PipelineConfig {
    /// Debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Reject values no session can work with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.history_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "maximum size {}x{} is empty",
                self.max_width, self.max_height
            )));
        }
        if !self.frequency_radius.is_finite() || self.frequency_radius <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "frequency_radius must be positive, got {}",
                self.frequency_radius
            )));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "gamma must be positive, got {}",
                self.gamma
            )));
        }
        Ok(())
    }
}
