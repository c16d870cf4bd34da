//! Wall clock for the playback loop

use embassy_time::{Duration, Instant};
use falcon_core::traits::Clock;

/// Monotonic system clock with thread sleep
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(std::time::Duration::from_micros(duration.as_micros()));
    }
}
