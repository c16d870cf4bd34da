//! Playback state machine
//!
//! Defines the authoritative lifecycle of a show run.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::{Event, FaultKind};
pub use machine::State;
