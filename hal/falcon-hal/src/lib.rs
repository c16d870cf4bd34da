//! Falcon Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the show player is written
//! against. Board wiring (Raspberry Pi sysfs, simulated outputs, test
//! mocks) implements them; the playback engine never touches pins directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (falcon-player)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  falcon-drivers (PinRig, trigger)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  falcon-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`pwm::PwmOutput`] - Duty-cycle outputs (lights, servos)
//! - [`strip::LedStrip`] - Addressable LED strip

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pwm;
pub mod strip;

// Re-export key traits at crate root for convenience
pub use gpio::{FixedLevel, InputPin, OutputPin};
pub use pwm::PwmOutput;
pub use strip::{LedStrip, Rgb, StripError};
