//! Error types for fallback store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading or writing the fallback record.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No fallback record has been written yet.
    #[error("fallback file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Returns true if the record is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
