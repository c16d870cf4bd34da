//! Termination signal handling
//!
//! SIGINT and SIGTERM are awaited on a dedicated thread running a small
//! tokio runtime. The first one received sets the shared [`CancelFlag`];
//! the playback loop observes it within one tick.

use std::thread::{self, JoinHandle};

use falcon_core::safety::CancelFlag;
use tokio::runtime::Builder;
use tokio::signal::unix::{signal, SignalKind};

use crate::error::PlayerError;

/// Install handlers and start the listener thread
///
/// Handlers are registered before this returns, so a signal arriving
/// right after startup is not lost.
pub fn spawn_listener(flag: CancelFlag) -> Result<JoinHandle<()>, PlayerError> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PlayerError::Signals)?;

    let (mut interrupt, mut terminate) = {
        let _guard = runtime.enter();
        (
            signal(SignalKind::interrupt()).map_err(PlayerError::Signals)?,
            signal(SignalKind::terminate()).map_err(PlayerError::Signals)?,
        )
    };

    let handle = thread::Builder::new()
        .name("falcon-signals".into())
        .spawn(move || {
            runtime.block_on(async {
                let name = tokio::select! {
                    _ = interrupt.recv() => "SIGINT",
                    _ = terminate.recv() => "SIGTERM",
                };
                tracing::info!(signal = name, "received signal to stop");
            });
            flag.request();
        })
        .map_err(PlayerError::Signals)?;

    Ok(handle)
}
