//! Start trigger input
//!
//! The trigger is a contact on the model's base. It is sampled once per
//! tick; a level change is accepted only after it has been seen on
//! `debounce` consecutive samples.

use falcon_hal::InputPin;

/// Debounced start trigger
pub struct DebouncedTrigger<P> {
    pin: P,
    /// If true, pressed = pin LOW
    active_low: bool,
    /// Consecutive samples needed to accept a change
    debounce: u8,
    /// Samples seen disagreeing with `pressed`
    pending: u8,
    /// Accepted state
    pressed: bool,
}

impl<P: InputPin> DebouncedTrigger<P> {
    /// Create a new trigger
    ///
    /// The accepted state is seeded from one raw sample, so a trigger that
    /// is already held reads pressed without waiting out the debounce.
    ///
    /// # Arguments
    /// - `pin`: The input to sample
    /// - `active_low`: If true, the trigger is pressed when the pin reads LOW
    /// - `debounce`: Consecutive samples before a change is accepted (0 and 1 both accept immediately)
    pub fn new(mut pin: P, active_low: bool, debounce: u8) -> Self {
        let pressed = pin.is_high() != active_low;
        Self {
            pin,
            active_low,
            debounce: debounce.max(1),
            pending: 0,
            pressed,
        }
    }

    /// Create a trigger that follows the pin with no debouncing
    pub fn immediate(pin: P, active_low: bool) -> Self {
        Self::new(pin, active_low, 1)
    }

    /// Sample the pin and return the debounced state
    pub fn sample(&mut self) -> bool {
        let raw = self.pin.is_high() != self.active_low;

        if raw == self.pressed {
            self.pending = 0;
        } else {
            self.pending += 1;
            if self.pending >= self.debounce {
                self.pressed = raw;
                self.pending = 0;
                tracing::debug!(pressed = raw, "trigger changed");
            }
        }
        self.pressed
    }

    /// Underlying pin
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use falcon_hal::gpio::FixedLevel;

    struct MockInput {
        high: bool,
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_immediate_active_high() {
        let mut trigger = DebouncedTrigger::immediate(MockInput { high: false }, false);
        assert!(!trigger.sample());

        trigger.pin_mut().high = true;
        assert!(trigger.sample());

        trigger.pin_mut().high = false;
        assert!(!trigger.sample());
    }

    #[test]
    fn test_active_low() {
        let mut trigger = DebouncedTrigger::immediate(MockInput { high: true }, true);
        assert!(!trigger.sample());

        trigger.pin_mut().high = false;
        assert!(trigger.sample());
    }

    #[test]
    fn test_bounce_ignored() {
        let mut trigger = DebouncedTrigger::new(MockInput { high: false }, false, 3);

        // Two high samples then a bounce back: not accepted
        trigger.pin_mut().high = true;
        assert!(!trigger.sample());
        assert!(!trigger.sample());
        trigger.pin_mut().high = false;
        assert!(!trigger.sample());

        // Three in a row: accepted
        trigger.pin_mut().high = true;
        assert!(!trigger.sample());
        assert!(!trigger.sample());
        assert!(trigger.sample());
    }

    #[test]
    fn test_held_at_startup_reads_pressed() {
        let mut trigger = DebouncedTrigger::new(FixedLevel(true), false, 3);
        assert!(trigger.sample());

        // Active-low line held low
        let mut trigger = DebouncedTrigger::new(MockInput { high: false }, true, 3);
        assert!(trigger.sample());

        // Release still waits out the debounce
        trigger.pin_mut().high = true;
        assert!(trigger.sample());
        assert!(trigger.sample());
        assert!(!trigger.sample());
    }

    #[test]
    fn test_always_pressed() {
        let mut trigger = DebouncedTrigger::immediate(FixedLevel(true), false);
        assert!(trigger.sample());
        assert!(trigger.sample());
    }
}
