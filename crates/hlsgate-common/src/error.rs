//! Common error types used throughout hlsgate.
//!
//! Every request handler resolves to either a response or one of these
//! errors; the HTTP layer maps each variant to a status code.

use crate::token::DecodeError;

/// Common error type for hlsgate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested playlist, segment or video object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request carried a malformed token, identifier or header.
    #[error("{0}")]
    InvalidInput(String),

    /// The object store failed to answer.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::InvalidInput(format!("Invalid segment token: {e}"))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
