//! Player errors

use std::path::PathBuf;

use falcon_core::config::ConfigError;
use falcon_core::error::LoadError;
use falcon_core::traits::Channel;

/// Failure that stops the service
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    ConfigSyntax(#[from] toml::de::Error),
    /// Engine settings rejected
    #[error("invalid engine settings: {0}")]
    Engine(#[from] ConfigError),
    /// Inverted channel is not in the wired set
    #[error("channel {0} is marked inverted but not wired")]
    InvertedNotWired(Channel),
    /// Sequence file could not be loaded
    #[error("cannot load sequence {path}: {source}")]
    Sequence { path: PathBuf, source: LoadError },
    /// Log filter or log file setup failed
    #[error("logging setup failed: {0}")]
    Logging(String),
    /// Signal handlers could not be installed
    #[error("cannot install signal handlers: {0}")]
    Signals(std::io::Error),
}
