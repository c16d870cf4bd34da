//! One frame of the show

use alloc::vec::Vec;

use falcon_hal::Rgb;

use crate::traits::Channel;

/// All actuator targets for one step
///
/// Scalar channels hold logical intensities in `[0.0, 1.0]` before
/// compensation. Drive pixels are raw strip colors.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceStep {
    /// Turret lights
    pub turret: f32,
    /// Cockpit lights
    pub cockpit: f32,
    /// Front lights
    pub front: f32,
    /// Landing gear and ramp servo
    pub landing_gear_and_ramp: f32,
    /// One color per strip position
    pub drive_pixels: Vec<Rgb>,
}

impl SequenceStep {
    /// Create a step from scalar values in [`Channel::ALL`] order
    pub fn new(scalars: [f32; 4], drive_pixels: Vec<Rgb>) -> Self {
        let [turret, cockpit, front, landing_gear_and_ramp] = scalars;
        Self {
            turret,
            cockpit,
            front,
            landing_gear_and_ramp,
            drive_pixels,
        }
    }

    /// A step with every channel at zero and `pixels` dark pixels
    pub fn dark(pixels: usize) -> Self {
        Self::new([0.0; 4], alloc::vec![Rgb::default(); pixels])
    }

    /// Logical value for a channel
    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Turret => self.turret,
            Channel::Cockpit => self.cockpit,
            Channel::Front => self.front,
            Channel::LandingGearAndRamp => self.landing_gear_and_ramp,
        }
    }

    /// Scalar values in [`Channel::ALL`] order
    pub fn scalars(&self) -> [f32; 4] {
        [
            self.turret,
            self.cockpit,
            self.front,
            self.landing_gear_and_ramp,
        ]
    }
}
