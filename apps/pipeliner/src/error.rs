//! Application error type.

use pipeliner_core::PipelineError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `pipeliner` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration file could not be read.
    #[error("Cannot read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for `AppConfig`.
    #[error("Invalid config: {0}")]
    ConfigParse(String),

    /// A command-line value is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A pipeline operation failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A stress run produced counts that differ from the expected ones.
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
