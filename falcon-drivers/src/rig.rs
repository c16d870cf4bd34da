//! Actuator port assembled from pins
//!
//! A hardware revision wires some subset of the four lamp channels, an
//! optional LED strip and the start trigger. [`PinRig`] reports exactly
//! what is wired and rejects writes to anything else.

use falcon_core::traits::{ActuatorPort, Capabilities, Channel, ChannelSet, PortError};
use falcon_core::Rgb;
use falcon_hal::{InputPin, LedStrip, PwmOutput};

use crate::lamp::Lamp;
use crate::trigger::DebouncedTrigger;

/// Lamps, strip and trigger of one rig
pub struct PinRig<L, S, T> {
    lamps: [Option<Lamp<L>>; 4],
    strip: S,
    trigger: DebouncedTrigger<T>,
}

impl<L: PwmOutput, S: LedStrip, T: InputPin> PinRig<L, S, T> {
    /// Create a rig with no lamps wired
    pub fn new(strip: S, trigger: DebouncedTrigger<T>) -> Self {
        Self {
            lamps: [None, None, None, None],
            strip,
            trigger,
        }
    }

    /// Wire a lamp to a channel, replacing any previous one
    pub fn with_lamp(mut self, channel: Channel, lamp: Lamp<L>) -> Self {
        self.lamps[channel.index()] = Some(lamp);
        self
    }

    /// Lamp wired to a channel
    pub fn lamp(&self, channel: Channel) -> Option<&Lamp<L>> {
        self.lamps[channel.index()].as_ref()
    }

    /// LED strip
    pub fn strip(&self) -> &S {
        &self.strip
    }
}

impl<L: PwmOutput, S: LedStrip, T: InputPin> ActuatorPort for PinRig<L, S, T> {
    fn capabilities(&self) -> Capabilities {
        let mut channels = ChannelSet::empty();
        for channel in Channel::ALL {
            if self.lamps[channel.index()].is_some() {
                channels.insert(channel);
            }
        }
        Capabilities {
            channels,
            strip_len: self.strip.len(),
        }
    }

    fn set_channel(&mut self, channel: Channel, value: f32) -> Result<(), PortError> {
        let lamp = self.lamps[channel.index()]
            .as_mut()
            .ok_or(PortError::UnsupportedChannel(channel))?;
        lamp.set_level(value);
        Ok(())
    }

    fn set_strip_pixels(&mut self, colors: &[Rgb]) -> Result<(), PortError> {
        let strip_len = self.strip.len();
        if colors.len() > strip_len {
            return Err(PortError::StripLength {
                pixels: colors.len(),
                strip_len,
            });
        }
        self.strip.write(colors).map_err(|err| {
            tracing::error!(?err, "strip write failed");
            PortError::Hardware
        })
    }

    fn is_start_requested(&mut self) -> bool {
        self.trigger.sample()
    }

    fn all_off(&mut self) {
        for lamp in self.lamps.iter_mut().flatten() {
            lamp.off();
        }
        if let Err(err) = self.strip.clear() {
            tracing::error!(?err, "failed to clear strip");
        }
    }
}
