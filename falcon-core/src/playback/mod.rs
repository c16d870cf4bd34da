//! Show playback
//!
//! The controller owns the real-time loop: it arms on the start trigger,
//! plays the table against the actuator port, and drains to a safe state
//! on every exit path.

pub mod controller;
pub mod guard;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use controller::{PlaybackController, ServeSummary};
pub use guard::RunGuard;
pub use session::{PlaybackSession, RunOutcome, RunReport};
