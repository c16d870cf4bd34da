//! Time source for the playback loop

use embassy_time::{Duration, Instant};

/// Monotonic clock with blocking sleep
///
/// The controller reads time and sleeps only through this trait, so tests
/// can drive a run with simulated time.
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block for `duration`
    fn sleep(&mut self, duration: Duration);
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}
