//! Error types for termsync.

use thiserror::Error;

/// Common error type for termsync.
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    ///
    /// The message is what the caller sees, so it must never say which
    /// token check failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// A caller-supplied path was rejected before touching storage.
    #[error("path rejected: {0}")]
    PathRejected(String),

    /// Validation error for request input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for termsync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
