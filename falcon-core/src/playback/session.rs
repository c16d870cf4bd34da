//! Per-run playback state and results

use embassy_time::{Duration, Instant};

use crate::error::RunError;
use crate::state::Event;

/// Transient state of one run
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// When the run started
    pub start: Instant,
    /// Latest step index from the mapper, clamped to the table length
    ///
    /// Never decreases within a run.
    pub current_step_index: usize,
    /// Last step written to the port
    pub applied_step: Option<usize>,
    /// Number of step writes
    pub steps_applied: usize,
    /// Run was stopped by a cancellation source
    pub cancelled: bool,
}

impl PlaybackSession {
    /// Start a session at `start`
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            current_step_index: 0,
            applied_step: None,
            steps_applied: 0,
            cancelled: false,
        }
    }

    /// Record the mapper's index for this tick, keeping it monotone
    ///
    /// Returns the index to act on.
    pub fn observe(&mut self, mapped: usize, len: usize) -> usize {
        let index = mapped.max(self.current_step_index);
        self.current_step_index = index.min(len);
        index
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// Every step was played
    Completed,
    /// Start trigger released before the end
    TriggerReleased,
    /// Termination requested before the end
    Terminated,
    /// Run aborted by a fault
    Faulted(RunError),
}

impl RunOutcome {
    /// State machine event for this outcome
    pub fn event(&self) -> Event {
        match self {
            RunOutcome::Completed => Event::SequenceFinished,
            RunOutcome::TriggerReleased => Event::TriggerReleased,
            RunOutcome::Terminated => Event::TerminationRequested,
            RunOutcome::Faulted(err) => Event::Fault(err.kind()),
        }
    }

    /// Check if a cancellation source ended the run
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::TriggerReleased | RunOutcome::Terminated)
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Final step index (equals the table length after completion)
    pub current_step_index: usize,
    /// Number of step writes
    pub steps_applied: usize,
    /// Wall-clock run time
    pub elapsed: Duration,
}
