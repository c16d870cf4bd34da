//! State machine definition
//!
//! Whether outputs may be driven is a function of the current state only.

use super::events::Event;

/// Playback states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No run active
    #[default]
    Idle,
    /// Trigger accepted, run about to start
    Armed,
    /// Show playing; outputs follow the table
    Running,
    /// Run ended; outputs being forced off
    Draining,
}

impl State {
    /// Check if this state allows writing show values to the outputs
    pub fn outputs_allowed(&self) -> bool {
        matches!(self, State::Running)
    }

    /// Check if a run is in progress
    pub fn is_active(&self) -> bool {
        matches!(self, State::Armed | State::Running | State::Draining)
    }

    /// Process an event and return the next state
    ///
    /// Unlisted pairs leave the state unchanged, which makes re-triggering
    /// a running show a no-op.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Idle transitions
            (Idle, TriggerPressed) => Armed,

            // Armed transitions
            (Armed, Start) => Running,
            (Armed, TriggerReleased) => Idle,
            (Armed, TerminationRequested) => Idle,

            // Running transitions
            (Running, SequenceFinished) => Draining,
            (Running, TriggerReleased) => Draining,
            (Running, TerminationRequested) => Draining,
            (Running, Fault(_)) => Draining,

            // Draining transitions
            (Draining, Drained) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
