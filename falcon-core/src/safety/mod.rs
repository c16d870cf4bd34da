//! Run cancellation
//!
//! A run stops within one tick of either cancellation source: the start
//! trigger being released or a termination request. Both are sampled,
//! never pushed.

pub mod cancel;

pub use cancel::{AnyOf, CancelFlag, CancellationSource, FnSource, Never};
