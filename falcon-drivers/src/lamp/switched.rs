//! On/off lamp on a digital output

use falcon_hal::{OutputPin, PwmOutput};

/// Level at and above which a switched lamp is on
pub const SWITCH_THRESHOLD: f32 = 0.5;

/// Digital pin used as a two-level duty output
pub struct SwitchedLamp<P> {
    pin: P,
}

impl<P: OutputPin> SwitchedLamp<P> {
    /// Create a new switched output, starting low
    pub fn new(mut pin: P) -> Self {
        pin.set_low();
        Self { pin }
    }

    /// Underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: OutputPin> PwmOutput for SwitchedLamp<P> {
    fn set_duty(&mut self, duty: f32) {
        self.pin.set_state(duty >= SWITCH_THRESHOLD);
    }

    fn duty(&self) -> f32 {
        if self.pin.is_set_high() {
            1.0
        } else {
            0.0
        }
    }
}
