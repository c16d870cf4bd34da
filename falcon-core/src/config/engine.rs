//! Engine configuration
//!
//! Timing constants shared between the show-authoring tool and the player,
//! plus the compensation curve parameter.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Step duration assumed by the show-authoring tool (ms)
pub const DEFAULT_STEP_DURATION_MS: u32 = 200;

/// Longest uninterrupted sleep in the running loop (ms)
pub const DEFAULT_TICK_QUANTUM_MS: u32 = 20;

/// Trigger poll interval while idle (ms)
pub const DEFAULT_IDLE_POLL_MS: u32 = 50;

/// Base of the output compensation curve
pub const DEFAULT_COMPENSATION_BASE: f32 = 100.0;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Step duration must be at least 1 ms
    #[error("step duration must be at least 1 ms")]
    ZeroStepDuration,
    /// Tick quantum must be at least 1 ms
    #[error("tick quantum must be at least 1 ms")]
    ZeroTickQuantum,
    /// Tick quantum longer than a step would delay cancellation past one step
    #[error("tick quantum {quantum_ms} ms exceeds step duration {step_ms} ms")]
    QuantumExceedsStep {
        /// Configured quantum
        quantum_ms: u32,
        /// Configured step duration
        step_ms: u32,
    },
    /// Compensation base must be finite and positive
    #[error("compensation base {0} must be finite and positive")]
    InvalidCompensationBase(f32),
}

/// Playback engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EngineConfig {
    /// Duration of one show step (ms)
    pub step_duration_ms: u32,
    /// Longest sleep between cancellation checks while running (ms)
    pub tick_quantum_ms: u32,
    /// Trigger poll interval while idle (ms)
    pub idle_poll_ms: u32,
    /// Compensation curve base
    pub compensation_base: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_duration_ms: DEFAULT_STEP_DURATION_MS,
            tick_quantum_ms: DEFAULT_TICK_QUANTUM_MS,
            idle_poll_ms: DEFAULT_IDLE_POLL_MS,
            compensation_base: DEFAULT_COMPENSATION_BASE,
        }
    }
}

impl EngineConfig {
    /// Check the configuration for values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_duration_ms == 0 {
            return Err(ConfigError::ZeroStepDuration);
        }
        if self.tick_quantum_ms == 0 || self.idle_poll_ms == 0 {
            return Err(ConfigError::ZeroTickQuantum);
        }
        if self.tick_quantum_ms > self.step_duration_ms {
            return Err(ConfigError::QuantumExceedsStep {
                quantum_ms: self.tick_quantum_ms,
                step_ms: self.step_duration_ms,
            });
        }
        if !self.compensation_base.is_finite() || self.compensation_base <= 0.0 {
            return Err(ConfigError::InvalidCompensationBase(self.compensation_base));
        }
        Ok(())
    }
}
