//! Error types for `scaffold-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for scaffold-lib operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    // === Env File Errors ===
    /// The env file could not be read. Recoverable during store
    /// construction (the store continues with an empty file layer).
    #[error("Failed to read env file {path}: {source}")]
    EnvFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The env file could not be written back.
    #[error("Failed to write env file {path}: {source}")]
    EnvFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Key rejected by write-time validation.
    #[error("Invalid env key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    // === Directory Errors ===
    /// A required directory could not be created. Fatal, never retried.
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    #[must_use]
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `ScaffoldError`.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
