//! Adapters from `embedded-hal` 1.0 pins
//!
//! Board crates expose `embedded-hal` traits; these wrappers make them
//! usable as HAL pins. Pin errors are logged and read as the safe level.

use embedded_hal::digital;
use embedded_hal::pwm::SetDutyCycle;
use falcon_hal::{InputPin, OutputPin, PwmOutput};

/// `embedded-hal` input as a HAL input
///
/// A read error counts as low.
pub struct EhInput<P>(pub P);

impl<P: digital::InputPin> InputPin for EhInput<P> {
    fn is_high(&mut self) -> bool {
        match self.0.is_high() {
            Ok(high) => high,
            Err(_) => {
                tracing::warn!("input read failed, treating as low");
                false
            }
        }
    }
}

/// `embedded-hal` output as a HAL output
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: digital::OutputPin> EhOutput<P> {
    /// Wrap a pin, driving it low
    pub fn new(pin: P) -> Self {
        let mut out = Self { pin, high: true };
        out.set_low();
        out
    }
}

impl<P: digital::OutputPin> OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        if self.pin.set_high().is_err() {
            tracing::warn!("output write failed");
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if self.pin.set_low().is_err() {
            tracing::warn!("output write failed");
        }
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// `embedded-hal` PWM channel as a duty output
pub struct EhPwm<P> {
    pwm: P,
    duty: f32,
}

impl<P: SetDutyCycle> EhPwm<P> {
    /// Wrap a PWM channel, starting at duty 0
    pub fn new(pwm: P) -> Self {
        let mut out = Self { pwm, duty: 1.0 };
        out.set_duty(0.0);
        out
    }
}

impl<P: SetDutyCycle> PwmOutput for EhPwm<P> {
    fn set_duty(&mut self, duty: f32) {
        let duty = if duty.is_nan() {
            0.0
        } else {
            duty.clamp(0.0, 1.0)
        };
        let max = self.pwm.max_duty_cycle();
        let raw = libm::roundf(duty * f32::from(max)) as u16;
        if self.pwm.set_duty_cycle(raw.min(max)).is_err() {
            tracing::warn!(duty, "pwm write failed");
        }
        self.duty = duty;
    }

    fn duty(&self) -> f32 {
        self.duty
    }
}
