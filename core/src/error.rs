//! Error types for index building, task coordination and configuration

use std::path::PathBuf;
use thiserror::Error;

use crate::tasks::TaskKey;

/// Errors raised while building a lookup index
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid fight window: end {end} precedes start {start}")]
    InvalidWindow { start: i64, end: i64 },

    #[error("index build panicked: {message}")]
    Panicked { message: String },
}

/// Errors raised when reading a task's result
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index for {key} is not ready ({state})")]
    NotReady { key: TaskKey, state: &'static str },

    #[error("index build for {key} failed: {message}")]
    Failed { key: TaskKey, message: String },
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors creating the task coordinator
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("failed to start index worker pool")]
    ThreadPool(#[source] rayon::ThreadPoolBuildError),
}
