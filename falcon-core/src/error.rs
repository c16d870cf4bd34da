//! Error types
//!
//! Parse-time errors are fatal to startup. Run-time errors abort the
//! current show to `Draining`; the controller never retries them.

use crate::state::FaultKind;
use crate::traits::PortError;

/// What is wrong with a show file
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MalformedKind {
    /// File is empty or has no header line
    #[error("missing header line")]
    MissingHeader,
    /// Header does not start with the scalar channel columns
    #[error("header must start with turret;cockpit;front;landingGearAndRamp")]
    BadHeader,
    /// Data line has the wrong number of fields
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields implied by the header
        expected: usize,
        /// Fields on the line
        found: usize,
    },
    /// Field is not a non-negative integer
    #[error("field {column} is not a non-negative integer")]
    InvalidField {
        /// 0-based field position on the line
        column: usize,
    },
    /// Scalar channel value above 255
    #[error("scalar field {column} exceeds 255")]
    ScalarOutOfRange {
        /// 0-based field position on the line
        column: usize,
    },
    /// Drive pixel component above 255
    #[error("drive field {column} exceeds 255")]
    PixelOutOfRange {
        /// 0-based field position on the line
        column: usize,
    },
}

/// Structurally invalid show file
///
/// No partial table is ever produced alongside this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("malformed sequence at line {line}: {kind}")]
pub struct MalformedSequenceError {
    /// 1-based line number (0 when the file is empty)
    pub line: usize,
    /// Failure kind
    pub kind: MalformedKind,
}

impl MalformedSequenceError {
    pub(crate) const fn new(line: usize, kind: MalformedKind) -> Self {
        Self { line, kind }
    }
}

/// Logical value outside `[0, 1]` reached the compensator
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("channel value {value} outside [0, 1]")]
pub struct ChannelOutOfRangeError {
    /// Rejected value
    pub value: f32,
}

/// Failure that aborts a running show
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunError {
    /// Compensator rejected a step value
    #[error("step {step}: {source}")]
    ChannelOutOfRange {
        /// Step index
        step: usize,
        /// Rejected value
        source: ChannelOutOfRangeError,
    },
    /// Step addresses more pixels than the strip has
    #[error("step {step}: {pixels} pixels for a strip of {strip_len}")]
    PixelIndexOutOfRange {
        /// Step index
        step: usize,
        /// Pixels in the step
        pixels: usize,
        /// Pixels on the strip
        strip_len: usize,
    },
    /// Step triple count disagrees with the table
    #[error("step {step}: {pixels} pixels, table declares {expected}")]
    MalformedStep {
        /// Step index
        step: usize,
        /// Pixels in the step
        pixels: usize,
        /// Pixels declared by the header
        expected: usize,
    },
    /// Port rejected a write
    #[error("actuator port: {0}")]
    Port(#[from] PortError),
}

impl RunError {
    /// Fault category for the state machine
    pub fn kind(&self) -> FaultKind {
        match self {
            RunError::ChannelOutOfRange { .. } => FaultKind::ChannelOutOfRange,
            RunError::PixelIndexOutOfRange { .. } => FaultKind::PixelIndexOutOfRange,
            RunError::MalformedStep { .. } => FaultKind::MalformedStep,
            RunError::Port(_) => FaultKind::Port,
        }
    }
}

/// Failure loading a show file from disk
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be read
    #[error("cannot read sequence file: {0}")]
    Io(#[from] std::io::Error),
    /// File content is invalid
    #[error(transparent)]
    Malformed(#[from] MalformedSequenceError),
}
