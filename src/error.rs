//! Error types for dropview

use thiserror::Error;

/// Errors surfaced by the preview pipeline and its ambient layers.
///
/// Unsupported media types and remote reference strings are not errors;
/// classification treats both as silent no-ops.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Preview task failed: {0}")]
    TaskFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for PreviewError {
    fn from(err: tokio::task::JoinError) -> Self {
        PreviewError::TaskFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
