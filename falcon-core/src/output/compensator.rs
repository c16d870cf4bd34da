//! Output compensation curve
//!
//! The lamp and servo drivers on the model respond to PWM duty in an
//! inverted, strongly non-linear way. The show is authored in perceived
//! (linear) intensity, so every scalar value passes through
//!
//! ```text
//! compensated = (base^(1 - value) - 1) / (base - 1)
//! ```
//!
//! which is `base^(1 - value) / base` rescaled so that `value = 0` drives
//! `1.0` and `value = 1` drives `0.0`.

use crate::config::{ConfigError, DEFAULT_COMPENSATION_BASE};
use crate::error::ChannelOutOfRangeError;

/// Pure, stateless compensation transform
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compensator {
    base: f32,
}

impl Compensator {
    /// Create a compensator for a finite, positive base
    pub fn new(base: f32) -> Result<Self, ConfigError> {
        if !base.is_finite() || base <= 0.0 {
            return Err(ConfigError::InvalidCompensationBase(base));
        }
        Ok(Self { base })
    }

    /// Curve base
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Map a logical value in `[0.0, 1.0]` to a drive value in `[0.0, 1.0]`
    pub fn compensate(&self, value: f32) -> Result<f32, ChannelOutOfRangeError> {
        if !(0.0..=1.0).contains(&value) {
            // NaN also fails the range check
            return Err(ChannelOutOfRangeError { value });
        }

        let denominator = self.base - 1.0;
        if libm::fabsf(denominator) < f32::EPSILON {
            // Limit of the curve as the base approaches 1
            return Ok(1.0 - value);
        }

        let raised = libm::powf(self.base, 1.0 - value);
        Ok(((raised - 1.0) / denominator).clamp(0.0, 1.0))
    }
}

impl Default for Compensator {
    fn default() -> Self {
        Self {
            base: DEFAULT_COMPENSATION_BASE,
        }
    }
}
