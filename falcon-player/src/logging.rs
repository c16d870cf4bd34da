//! Log output setup
//!
//! Logs go to stderr, or are appended to the configured file. `RUST_LOG`
//! overrides the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::PlayerError;

/// Install the global subscriber
pub fn init(config: &LogConfig) -> Result<(), PlayerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|err| PlayerError::Logging(format!("bad level {:?}: {err}", config.level)))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| {
                    PlayerError::Logging(format!("cannot open {}: {err}", path.display()))
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| PlayerError::Logging(err.to_string()))
}
