//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in falcon-core for the show rig:
//!
//! - Lamp outputs (PWM, switched, active-low)
//! - LED strip over any `smart-leds` writer
//! - Debounced start trigger
//! - `PinRig`, the actuator port assembled from the above
//! - Adapters from `embedded-hal` pins

#![no_std]
#![deny(unsafe_code)]

pub mod hal_adapter;
pub mod lamp;
pub mod rig;
pub mod strip;
pub mod trigger;

pub use rig::PinRig;
