//! Error types
//!
//! Storage errors are caught and logged by the best-score layer; they never
//! reach the player. Config errors propagate to whoever loads the config.

use thiserror::Error;

/// Failure talking to a best-score backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected tuning data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("missing required element: {0}")]
    MissingElement(String),
}

/// Result alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;
