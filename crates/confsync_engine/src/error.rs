//! Error types for the sync engine.

use confsync_codec::CodecError;
use confsync_storage::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while acquiring or refreshing configuration.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote config center could not deliver the value.
    #[error("remote fetch failed: {message}")]
    RemoteFetch {
        /// Error message.
        message: String,
        /// Whether the failure looks transient.
        retryable: bool,
    },

    /// The remote client is not connected.
    #[error("not connected to config center")]
    NotConnected,

    /// The raw value is not valid JSON or YAML for the destination type.
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),

    /// The fallback record is missing or unreadable.
    #[error("fallback unavailable: {0}")]
    FallbackUnavailable(StorageError),

    /// The session configuration is unusable.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Creates a retryable remote error.
    pub fn remote_retryable(message: impl Into<String>) -> Self {
        Self::RemoteFetch {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable remote error.
    pub fn remote_fatal(message: impl Into<String>) -> Self {
        Self::RemoteFetch {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error looks transient.
    ///
    /// Informational only: the acquisition loop retries every failure until
    /// the budget is spent.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::RemoteFetch { retryable, .. } => *retryable,
            SyncError::NotConnected => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn retryable_errors() {
        assert!(SyncError::remote_retryable("connection reset").is_retryable());
        assert!(!SyncError::remote_fatal("namespace missing").is_retryable());
        assert!(SyncError::NotConnected.is_retryable());
        assert!(!SyncError::Decode(CodecError::Empty).is_retryable());
    }

    #[test]
    fn error_display() {
        let err = SyncError::NotConnected;
        assert_eq!(err.to_string(), "not connected to config center");

        let err = SyncError::FallbackUnavailable(StorageError::NotFound(PathBuf::from(
            "./ns_key.txt",
        )));
        assert!(err.to_string().contains("ns_key.txt"));
    }

    #[test]
    fn codec_errors_convert() {
        let err: SyncError = CodecError::json("missing field `port`").into();
        assert!(matches!(err, SyncError::Decode(_)));
        assert!(!err.is_retryable());
    }
}
