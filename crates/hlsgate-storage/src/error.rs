//! Storage error types.

/// Errors raised by object store backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The object does not exist in the container.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The connection string or settings are unusable.
    #[error("Storage configuration error: {0}")]
    Config(String),

    /// The object name cannot be mapped onto the backend.
    #[error("Invalid object name: {0}")]
    InvalidName(String),

    /// The service answered with an unexpected status.
    #[error("Storage service returned {status} for {name}")]
    Status { status: u16, name: String },

    /// The request did not complete in time.
    #[error("Storage request timed out for {0}")]
    Timeout(String),

    /// Transport-level HTTP failure.
    #[error("Storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

impl From<StorageError> for hlsgate_common::Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(name) => Self::not_found(format!("Object not found: {name}")),
            StorageError::InvalidName(msg) => Self::invalid_input(msg),
            other => Self::storage(other.to_string()),
        }
    }
}

/// Result type alias using the storage error.
pub type Result<T> = std::result::Result<T, StorageError>;
