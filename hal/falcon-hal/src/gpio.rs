//! GPIO pin abstractions
//!
//! Digital pins used by the show rig: the start trigger is an input,
//! simple on/off lamps are outputs.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
///
/// Takes `&mut self` because some backends (sysfs value files, expanders)
/// need mutable access to sample the line.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// An input that always reads the same level
///
/// Used for rigs without a physical trigger, where the show should start
/// as soon as the player is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedLevel(pub bool);

impl InputPin for FixedLevel {
    fn is_high(&mut self) -> bool {
        self.0
    }
}
