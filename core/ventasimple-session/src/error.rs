//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from durable client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the storage directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value is not valid UTF-8.
    #[error("stored value for {key:?} is not valid UTF-8")]
    Encoding { key: String },

    /// The platform has no data directory.
    #[error("no data directory available on this platform")]
    NoDataDir,
}
