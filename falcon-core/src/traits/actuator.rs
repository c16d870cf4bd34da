//! Actuator port
//!
//! The controller realizes a step by writing each scalar channel and then
//! the whole LED strip through this trait. The port also exposes the start
//! trigger, since on the model both live on the same wiring harness.

use core::fmt;
use core::str::FromStr;

use falcon_hal::Rgb;
use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar output channels of the model
///
/// The order of [`Channel::ALL`] is the column order of the show file and
/// is versioned together with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Channel {
    /// Turret lights
    Turret,
    /// Cockpit lights
    Cockpit,
    /// Front (mandible) lights
    Front,
    /// Landing gear and boarding ramp servo
    #[cfg_attr(feature = "serde", serde(alias = "landingGearAndRamp"))]
    LandingGearAndRamp,
}

impl Channel {
    /// All channels in show-file column order
    pub const ALL: [Channel; 4] = [
        Channel::Turret,
        Channel::Cockpit,
        Channel::Front,
        Channel::LandingGearAndRamp,
    ];

    /// Column name used in the show file header
    pub const fn column_name(self) -> &'static str {
        match self {
            Channel::Turret => "turret",
            Channel::Cockpit => "cockpit",
            Channel::Front => "front",
            Channel::LandingGearAndRamp => "landingGearAndRamp",
        }
    }

    /// Position of this channel in [`Channel::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Unknown channel name
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel name")]
pub struct UnknownChannel;

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turret" => Ok(Channel::Turret),
            "cockpit" => Ok(Channel::Cockpit),
            "front" => Ok(Channel::Front),
            "landingGearAndRamp" | "landing_gear_and_ramp" => Ok(Channel::LandingGearAndRamp),
            _ => Err(UnknownChannel),
        }
    }
}

/// Set of channels wired on a hardware revision
///
/// Always kept in [`Channel::ALL`] order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSet {
    channels: Vec<Channel, 4>,
}

impl ChannelSet {
    /// Empty set
    pub const fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Every channel
    pub fn full() -> Self {
        Self::from_channels(&Channel::ALL)
    }

    /// Build a set from a list; order and duplicates are normalized
    pub fn from_channels(channels: &[Channel]) -> Self {
        let mut set = Self::empty();
        for channel in channels {
            set.insert(*channel);
        }
        set
    }

    /// Add a channel
    pub fn insert(&mut self, channel: Channel) {
        if self.contains(channel) {
            return;
        }
        // Capacity equals the number of variants, so this cannot overflow
        let _ = self.channels.push(channel);
        self.channels.sort_unstable();
    }

    /// Check if a channel is present
    pub fn contains(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }

    /// Iterate in column order
    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        self.channels.iter().copied()
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Check if no channel is wired
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// What a port can drive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// Scalar channels the port accepts
    pub channels: ChannelSet,
    /// Number of LED strip pixels (0 = no strip)
    pub strip_len: usize,
}

/// Errors reported by an actuator port
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// Channel is not wired on this rig
    #[error("channel {0} is not wired on this rig")]
    UnsupportedChannel(Channel),
    /// More colors than the strip has pixels
    #[error("{pixels} pixels written to a strip of {strip_len}")]
    StripLength {
        /// Pixels in the write
        pixels: usize,
        /// Pixels on the strip
        strip_len: usize,
    },
    /// Backend failure
    #[error("hardware write failed")]
    Hardware,
}

/// Port through which the controller realizes steps
///
/// The controller owns the port exclusively for the duration of a run.
pub trait ActuatorPort {
    /// Channels and strip length this port can drive
    fn capabilities(&self) -> Capabilities;

    /// Write a compensated value in `[0.0, 1.0]` to a channel
    fn set_channel(&mut self, channel: Channel, value: f32) -> Result<(), PortError>;

    /// Replace the whole strip; `colors.len()` must not exceed the strip length
    fn set_strip_pixels(&mut self, colors: &[Rgb]) -> Result<(), PortError>;

    /// Sample the start trigger
    fn is_start_requested(&mut self) -> bool;

    /// Force every channel and pixel to its off state
    ///
    /// Best effort: implementations log failures rather than return them.
    fn all_off(&mut self);
}

impl<T: ActuatorPort + ?Sized> ActuatorPort for &mut T {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn set_channel(&mut self, channel: Channel, value: f32) -> Result<(), PortError> {
        (**self).set_channel(channel, value)
    }

    fn set_strip_pixels(&mut self, colors: &[Rgb]) -> Result<(), PortError> {
        (**self).set_strip_pixels(colors)
    }

    fn is_start_requested(&mut self) -> bool {
        (**self).is_start_requested()
    }

    fn all_off(&mut self) {
        (**self).all_off()
    }
}
