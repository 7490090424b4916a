//! Error types for chunk streaming.

use std::io;

use thiserror::Error;

/// Recoverable failures of the streaming engine.
///
/// Logic errors, such as generating a chunk's terrain twice, are assertions and
/// never show up here.
#[derive(Debug, Error)]
pub enum StreamingError {
    /// The background worker is gone, usually because a task panicked.
    #[error("background worker disconnected")]
    WorkerDisconnected,

    /// The operating system refused to start the worker thread.
    #[error("failed to spawn background worker: {0}")]
    WorkerSpawn(#[source] io::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigRead(#[source] io::Error),

    /// The configuration is not valid JSON for [`crate::StreamingConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds values the engine cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Shorthand for results carrying a [`StreamingError`].
pub type Result<T> = std::result::Result<T, StreamingError>;
