//! Cancellation sources
//!
//! The controller receives a termination source at construction instead of
//! reading process-wide flags. Sources compose with [`AnyOf`].

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

/// Something that can ask a run to stop
pub trait CancellationSource {
    /// Check if cancellation was requested; never blocks
    fn is_requested(&self) -> bool;
}

impl<T: CancellationSource + ?Sized> CancellationSource for &T {
    fn is_requested(&self) -> bool {
        (**self).is_requested()
    }
}

/// Shared request flag
///
/// Clones observe the same flag, so one clone can be handed to a signal
/// thread while the controller holds another.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    requested: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }
}

impl CancellationSource for CancelFlag {
    fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// Source that never requests cancellation
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancellationSource for Never {
    fn is_requested(&self) -> bool {
        false
    }
}

/// Logical OR of two sources
#[derive(Debug, Clone, Default)]
pub struct AnyOf<A, B>(pub A, pub B);

impl<A: CancellationSource, B: CancellationSource> CancellationSource for AnyOf<A, B> {
    fn is_requested(&self) -> bool {
        self.0.is_requested() || self.1.is_requested()
    }
}

/// Source backed by a closure
pub struct FnSource<F>(pub F);

impl<F: Fn() -> bool> CancellationSource for FnSource<F> {
    fn is_requested(&self) -> bool {
        (self.0)()
    }
}
