//! Storage-specific error types for file operations.

use std::path::PathBuf;

use ratecast_core::errors::Error;
use thiserror::Error;

/// File storage errors, converted to `ratecast_core::Error` at the
/// repository boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Data directory {} is not available: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Store(err.to_string())
    }
}
