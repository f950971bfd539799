#![forbid(unsafe_code)]

use depot_core::LayoutError;
use depot_storage::StorageError;
use thiserror::Error;

pub type ContentResult<T> = Result<T, ContentError>;

/// Repository content errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The request itself is malformed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Well formed, but nothing is stored there.
    #[error("item not found in repository {repository}: {path}")]
    ItemNotFound { repository: String, path: String },

    /// Storage failed or refused the operation.
    #[error("cannot access {path} in repository {repository}: {source}")]
    ContentAccess {
        repository: String,
        path: String,
        #[source]
        source: StorageError,
    },
}

impl ContentError {
    /// Map a storage error for `path`, logging it unless it only reports absence.
    pub(crate) fn from_storage(repository: &str, path: &str, source: StorageError) -> Self {
        match source {
            StorageError::NotFound(_) => Self::ItemNotFound {
                repository: repository.to_string(),
                path: path.to_string(),
            },
            source => {
                tracing::error!(repository, path, error = %source, "repository storage failure");
                Self::ContentAccess {
                    repository: repository.to_string(),
                    path: path.to_string(),
                    source,
                }
            }
        }
    }
}
