//! Host backends for the rig
//!
//! The trigger is read from a GPIO value file. Lamp and strip outputs are
//! simulated: they keep their state and log every change at `trace`.

use std::fs;
use std::path::PathBuf;

use falcon_core::traits::Channel;
use falcon_core::Rgb;
use falcon_drivers::lamp::Lamp;
use falcon_drivers::trigger::DebouncedTrigger;
use falcon_drivers::PinRig;
use falcon_hal::{FixedLevel, InputPin, LedStrip, PwmOutput, StripError};

use crate::config::{HardwareConfig, TriggerSource};

/// Rig as built from the configuration
pub type HostRig = PinRig<SimPwm, SimStrip, TriggerInput>;

/// GPIO value file input (`0` or `1`)
#[derive(Debug)]
pub struct SysfsInput {
    path: PathBuf,
    failing: bool,
}

impl SysfsInput {
    /// Create a new input reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            failing: false,
        }
    }
}

impl InputPin for SysfsInput {
    fn is_high(&mut self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(value) => {
                if self.failing {
                    tracing::info!(path = %self.path.display(), "trigger input readable again");
                    self.failing = false;
                }
                value.trim() == "1"
            }
            Err(err) => {
                // Warn once per outage, not once per poll
                if !self.failing {
                    tracing::warn!(path = %self.path.display(), error = %err, "cannot read trigger input");
                    self.failing = true;
                }
                false
            }
        }
    }
}

/// Trigger input selected by configuration
#[derive(Debug)]
pub enum TriggerInput {
    Fixed(FixedLevel),
    Sysfs(SysfsInput),
}

impl InputPin for TriggerInput {
    fn is_high(&mut self) -> bool {
        match self {
            TriggerInput::Fixed(pin) => pin.is_high(),
            TriggerInput::Sysfs(pin) => pin.is_high(),
        }
    }
}

/// Simulated duty output
#[derive(Debug)]
pub struct SimPwm {
    channel: Channel,
    duty: f32,
}

impl SimPwm {
    pub fn new(channel: Channel) -> Self {
        Self { channel, duty: 0.0 }
    }
}

impl PwmOutput for SimPwm {
    fn set_duty(&mut self, duty: f32) {
        let duty = duty.clamp(0.0, 1.0);
        if duty != self.duty {
            tracing::trace!(channel = %self.channel, duty, "duty");
        }
        self.duty = duty;
    }

    fn duty(&self) -> f32 {
        self.duty
    }
}

/// Simulated LED strip
#[derive(Debug)]
pub struct SimStrip {
    pixels: Vec<Rgb>,
}

impl SimStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::default(); len],
        }
    }

    /// Current frame
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

impl LedStrip for SimStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn write(&mut self, colors: &[Rgb]) -> Result<(), StripError> {
        if colors.len() > self.pixels.len() {
            return Err(StripError::TooManyPixels);
        }
        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            *pixel = colors.get(i).copied().unwrap_or_default();
        }
        tracing::trace!(lit = colors.iter().filter(|c| **c != Rgb::default()).count(), "strip frame");
        Ok(())
    }
}

/// Build the rig described by the configuration
pub fn build_rig(config: &HardwareConfig) -> HostRig {
    let input = match &config.trigger {
        TriggerSource::Always => TriggerInput::Fixed(FixedLevel(!config.trigger_active_low)),
        TriggerSource::Sysfs(path) => TriggerInput::Sysfs(SysfsInput::new(path.clone())),
    };
    let trigger = DebouncedTrigger::new(input, config.trigger_active_low, config.debounce_polls);

    let mut rig = PinRig::new(SimStrip::new(config.strip_length), trigger);
    for channel in config.channel_set().iter() {
        let lamp = Lamp::new(SimPwm::new(channel), config.is_inverted(channel));
        rig = rig.with_lamp(channel, lamp);
    }
    rig
}

#[cfg(test)]
mod tests {
    use super::*;
    use falcon_core::traits::{ActuatorPort, ChannelSet};
    use std::io::Write;

    #[test]
    fn test_sysfs_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1").unwrap();
        let mut input = SysfsInput::new(file.path());
        assert!(input.is_high());

        fs::write(file.path(), "0\n").unwrap();
        assert!(!input.is_high());
    }

    #[test]
    fn test_sysfs_missing_reads_low() {
        let dir = tempfile::tempdir().unwrap();
        let mut input = SysfsInput::new(dir.path().join("value"));
        assert!(!input.is_high());
        assert!(input.failing);

        fs::write(dir.path().join("value"), "1").unwrap();
        assert!(input.is_high());
        assert!(!input.failing);
    }

    #[test]
    fn test_rig_from_config() {
        let config = HardwareConfig {
            channels: vec![Channel::Front, Channel::Turret],
            strip_length: 4,
            inverted: vec![Channel::Front],
            ..Default::default()
        };
        let mut rig = build_rig(&config);

        let caps = rig.capabilities();
        assert_eq!(
            caps.channels,
            ChannelSet::from_channels(&[Channel::Turret, Channel::Front])
        );
        assert_eq!(caps.strip_len, 4);
        assert!(rig.is_start_requested());

        let front = rig.lamp(Channel::Front).unwrap();
        assert!(front.is_inverted());
        assert_eq!(front.output().duty(), 1.0);
    }

    #[test]
    fn test_always_trigger_active_low() {
        let config = HardwareConfig {
            trigger_active_low: true,
            ..Default::default()
        };
        let mut rig = build_rig(&config);
        assert!(rig.is_start_requested());
    }

    #[test]
    fn test_sysfs_trigger_active_low() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0").unwrap();
        let config = HardwareConfig {
            trigger: TriggerSource::Sysfs(file.path().to_path_buf()),
            trigger_active_low: true,
            ..Default::default()
        };
        let mut rig = build_rig(&config);
        assert!(rig.is_start_requested());

        fs::write(file.path(), "1").unwrap();
        assert!(!rig.is_start_requested());
    }

    #[test]
    fn test_sim_strip() {
        let mut strip = SimStrip::new(2);
        strip.write(&[Rgb::new(1, 2, 3)]).unwrap();
        assert_eq!(strip.pixels(), &[Rgb::new(1, 2, 3), Rgb::default()]);
        assert_eq!(
            strip.write(&[Rgb::default(); 3]),
            Err(StripError::TooManyPixels)
        );
    }
}
