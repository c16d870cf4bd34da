//! Output shaping between logical step values and physical drive values

pub mod compensator;

pub use compensator::Compensator;
