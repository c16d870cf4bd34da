//! Step mapper
//!
//! The active step is always recomputed from the absolute time since the
//! show started, never by counting loop iterations. A late wake-up jumps
//! straight to the step that should be showing now, so drift never
//! accumulates.

use embassy_time::Duration;

/// Step active at `elapsed` into the show
///
/// `step_duration_ms == 0` is rejected by configuration validation; it is
/// treated as 1 ms here so the function stays total.
pub fn step_index_for(elapsed: Duration, step_duration_ms: u32) -> usize {
    let step_ms = u64::from(step_duration_ms.max(1));
    (elapsed.as_millis() / step_ms) as usize
}

/// Offset from the show start at which step `index` begins
pub fn step_start(index: usize, step_duration_ms: u32) -> Duration {
    Duration::from_millis(index as u64 * u64::from(step_duration_ms.max(1)))
}

/// Offset of the first step boundary strictly after `elapsed`
pub fn next_boundary(elapsed: Duration, step_duration_ms: u32) -> Duration {
    step_start(step_index_for(elapsed, step_duration_ms) + 1, step_duration_ms)
}
