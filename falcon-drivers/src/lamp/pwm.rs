//! Dimmable lamp on a PWM output

use falcon_hal::PwmOutput;

/// Lamp driven by a duty-cycle output
///
/// `level` is the drive value the port receives, already passed through
/// the compensation curve: a show value of 0 arrives as level 1.0 and a
/// show value of 1 as level 0.0. Level 0.0 is the rig's safe state, which
/// [`Lamp::off`] and `all_off` produce: duty 0.0 on an active-high output,
/// duty 1.0 on an active-low one.
pub struct Lamp<P> {
    pwm: P,
    /// If true, duty = 1.0 - level
    inverted: bool,
    /// Current drive level in `[0.0, 1.0]`
    level: f32,
}

impl<P: PwmOutput> Lamp<P> {
    /// Create a new lamp output
    ///
    /// # Arguments
    /// - `pwm`: The duty-cycle output to control
    /// - `inverted`: If true, the output is active-low (duty = 1.0 - level)
    pub fn new(pwm: P, inverted: bool) -> Self {
        let mut lamp = Self {
            pwm,
            inverted,
            level: 0.0,
        };
        // Start in the safe state
        lamp.set_level(0.0);
        lamp
    }

    /// Create a new lamp with active-high output
    pub fn new_active_high(pwm: P) -> Self {
        Self::new(pwm, false)
    }

    /// Create a new lamp with active-low output
    pub fn new_active_low(pwm: P) -> Self {
        Self::new(pwm, true)
    }

    /// Set the drive level, clamped to `[0.0, 1.0]`
    pub fn set_level(&mut self, level: f32) {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        self.level = level;

        let duty = if self.inverted { 1.0 - level } else { level };
        self.pwm.set_duty(duty);
    }

    /// Return to the safe state (level 0.0)
    pub fn off(&mut self) {
        self.set_level(0.0);
    }

    /// Current drive level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Check if the output is active-low
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Underlying output
    pub fn output(&self) -> &P {
        &self.pwm
    }
}
