//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a raw configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input is valid JSON but does not match the target type.
    #[error("json decoding failed: {message}")]
    Json {
        /// Description of the decoding error.
        message: String,
    },

    /// The input is not JSON and could not be decoded as YAML.
    #[error("yaml decoding failed: {message}")]
    Yaml {
        /// Description of the decoding error.
        message: String,
    },

    /// The input is empty or whitespace only.
    #[error("empty configuration value")]
    Empty,
}

impl CodecError {
    /// Create a JSON decoding error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create a YAML decoding error.
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::json(e.to_string())
    }
}

impl From<serde_yaml::Error> for CodecError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::yaml(e.to_string())
    }
}
