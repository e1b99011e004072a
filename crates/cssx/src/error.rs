//! Error types for the compiler front end.
//!
//! Problems in the compiled source are diagnostics, not errors. The
//! variants here cover the surrounding work: reading and writing files,
//! loading configuration, watching and serializing results.

use std::path::PathBuf;

/// Result type alias for compiler front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around a compile.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed configuration file.
    #[error("invalid configuration in '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// File watcher error.
    #[cfg(feature = "watch")]
    #[error("file watcher error: {0}")]
    Watch(String),

    /// JSON serialization error.
    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
