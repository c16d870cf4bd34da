//! Configuration types
//!
//! Board-agnostic engine settings. The player fills these from its TOML
//! file; tests build them directly.

pub mod engine;

pub use engine::*;
