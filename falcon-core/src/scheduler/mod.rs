//! Step scheduling
//!
//! Maps wall-clock playback time onto show steps.

pub mod mapper;

pub use mapper::{next_boundary, step_index_for, step_start};
