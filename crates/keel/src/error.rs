//! Engine-level errors.

use std::path::PathBuf;

use keel_core::{BackendError, CoreError};
use thiserror::Error;

/// Errors surfaced by the facade.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Anything the world reported.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A backend driven directly rather than through the world.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::EngineConfig`].
    #[error("malformed engine config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds a rejected value.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

/// Result alias for facade operations.
pub type EngineResult<T> = Result<T, EngineError>;
