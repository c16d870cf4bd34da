//! PWM output abstraction
//!
//! Lights and servos on the model are driven by a duty cycle. The duty is
//! expressed as a fraction in `[0.0, 1.0]`; backends translate it to their
//! own resolution.

/// Duty-cycle output
pub trait PwmOutput {
    /// Set the duty cycle (0.0 = fully off, 1.0 = fully on)
    ///
    /// Implementations clamp out-of-range values.
    fn set_duty(&mut self, duty: f32);

    /// Get the last duty cycle written
    fn duty(&self) -> f32;
}
