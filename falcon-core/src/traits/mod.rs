//! Hardware-facing traits
//!
//! These traits define the boundary between the playback engine and
//! whatever realizes a step: a pin rig, a simulator or a test mock.

pub mod actuator;
pub mod audio;
pub mod clock;

pub use actuator::{ActuatorPort, Capabilities, Channel, ChannelSet, PortError};
pub use audio::{AudioError, AudioOutput, NoAudio};
pub use clock::Clock;
