//! Service configuration
//!
//! Loaded from a TOML file with four sections:
//!
//! ```toml
//! [engine]    # step timing and compensation
//! [show]      # sequence and soundtrack files
//! [hardware]  # wired channels, strip, trigger
//! [log]       # level and optional log file
//! ```
//!
//! Unknown keys are rejected so that typos do not silently fall back to
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use falcon_core::config::EngineConfig;
use falcon_core::traits::{Channel, ChannelSet};
use serde::Deserialize;

use crate::error::PlayerError;

/// Default external audio player
pub const DEFAULT_AUDIO_PLAYER: &str = "aplay";

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub show: ShowConfig,
    #[serde(default)]
    pub hardware: HardwareConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Show files
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShowConfig {
    /// Sequence table
    pub sequence: PathBuf,
    /// Soundtrack; the show plays silently without one
    #[serde(default)]
    pub audio: Option<PathBuf>,
    /// Program used to play the soundtrack
    #[serde(default = "default_audio_player")]
    pub audio_player: String,
}

fn default_audio_player() -> String {
    DEFAULT_AUDIO_PLAYER.to_string()
}

/// Where the start trigger comes from
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum TriggerSource {
    /// Always pressed: the show loops whenever the player is idle
    #[default]
    Always,
    /// GPIO value file (`0`/`1`), e.g. `/sys/class/gpio/gpio17/value`
    Sysfs(PathBuf),
}

impl From<String> for TriggerSource {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("always") {
            TriggerSource::Always
        } else {
            TriggerSource::Sysfs(PathBuf::from(value))
        }
    }
}

/// Rig wiring
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareConfig {
    /// Lamp channels present on this revision
    pub channels: Vec<Channel>,
    /// Pixels on the LED strip (0 = no strip)
    pub strip_length: usize,
    /// Start trigger input
    pub trigger: TriggerSource,
    /// Trigger is pressed when the input reads 0
    pub trigger_active_low: bool,
    /// Consecutive samples before a trigger change is accepted
    pub debounce_polls: u8,
    /// Channels driven through active-low outputs
    pub inverted: Vec<Channel>,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            channels: Channel::ALL.to_vec(),
            strip_length: 0,
            trigger: TriggerSource::Always,
            trigger_active_low: false,
            debounce_polls: 1,
            inverted: Vec::new(),
        }
    }
}

impl HardwareConfig {
    /// Wired channels as a set
    pub fn channel_set(&self) -> ChannelSet {
        ChannelSet::from_channels(&self.channels)
    }

    /// Check if a channel uses an active-low output
    pub fn is_inverted(&self, channel: Channel) -> bool {
        self.inverted.contains(&channel)
    }

    /// Replace the trigger with one that is always pressed, undebounced
    pub fn ignore_trigger(&mut self) {
        self.trigger = TriggerSource::Always;
        self.trigger_active_low = false;
        self.debounce_polls = 1;
    }
}

/// Logging
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `falcon_core=debug,info`
    pub level: String,
    /// Append to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a configuration
    pub fn parse(text: &str) -> Result<Self, PlayerError> {
        let config: PlayerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, PlayerError> {
        let text = fs::read_to_string(path).map_err(|source| PlayerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), PlayerError> {
        self.engine.validate()?;

        let wired = self.hardware.channel_set();
        if let Some(channel) = self
            .hardware
            .inverted
            .iter()
            .find(|channel| !wired.contains(**channel))
        {
            return Err(PlayerError::InvertedNotWired(*channel));
        }
        Ok(())
    }
}
