//! Error types for Filebin.

use thiserror::Error;

/// Common error type for Filebin.
#[derive(Error, Debug)]
pub enum FilebinError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Request is missing a required part or is malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Upload exceeds the configured size limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Validation error for configuration or user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure (poisoned lock, aborted task).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for Filebin operations.
pub type Result<T> = std::result::Result<T, FilebinError>;
