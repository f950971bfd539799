#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used by `depot-storage`.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors produced by storage backends.
///
/// Higher-level crates wrap this error to add repository context.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage path {0:?}")]
    InvalidPath(String),

    #[error("no such item: {0}")]
    NotFound(String),

    #[error("path {path:?} resolves outside of the storage root")]
    PathEscape { path: String },

    #[error("storage operation failed: {0}")]
    Failed(String),
}
