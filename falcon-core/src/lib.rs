//! Board-agnostic core logic for the Falcon show player
//!
//! This crate contains all playback logic that does not depend on
//! specific hardware implementations:
//!
//! - Sequence table parsing (the `;`-delimited show file)
//! - Output compensation curve
//! - Step mapping from elapsed wall-clock time
//! - Playback state machine and controller
//! - Cancellation sources (trigger release, termination request)
//! - Actuator, audio and clock traits
//! - Engine configuration types
//!
//! The crate is `no_std` with `alloc`; the `std` feature adds file loading.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod output;
pub mod playback;
pub mod safety;
pub mod scheduler;
pub mod sequence;
pub mod state;
pub mod traits;

pub use embassy_time::{Duration, Instant};
pub use falcon_hal::Rgb;
