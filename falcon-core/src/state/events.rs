//! Events that trigger state transitions

/// Category of a run-time fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Compensator rejected a step value
    ChannelOutOfRange,
    /// Step has more pixels than the strip
    PixelIndexOutOfRange,
    /// Step pixel count disagrees with the table
    MalformedStep,
    /// Actuator port rejected a write
    Port,
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Trigger events
    /// Start trigger observed active
    TriggerPressed,
    /// Start trigger observed inactive
    TriggerReleased,

    // Run control events
    /// Armed show begins playing
    Start,
    /// Step index reached the end of the table
    SequenceFinished,
    /// Process termination was requested
    TerminationRequested,
    /// Run-time fault while applying a step
    Fault(FaultKind),
    /// Outputs are safe, audio stopped
    Drained,
}

impl Event {
    /// Check if this event indicates an error
    pub fn is_fault(&self) -> bool {
        matches!(self, Event::Fault(_))
    }
}
