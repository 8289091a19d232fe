//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by asset stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Name would escape the storage area or is otherwise unusable.
    #[error("Invalid asset name: {name:?}")]
    InvalidName { name: String },

    /// An asset with the generated name already exists.
    #[error("Asset already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Asset not present.
    #[error("Asset not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to create a storage directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }
}
