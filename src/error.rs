//! Error types for shard_store

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shard_store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shard_store operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {}: {source}", path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Blob already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error together with the path it happened on
    pub(crate) fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoAt {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }
}
