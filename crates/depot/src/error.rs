#![forbid(unsafe_code)]

use std::path::PathBuf;

use depot_content::ContentError;
use depot_core::LayoutError;
use depot_proxy::{PolicyParseError, ProxyError};
use depot_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepotError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read configuration {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote {id}: unsupported url {url}: {reason}")]
    UnsupportedUrl {
        id: String,
        url: String,
        reason: String,
    },

    #[error(transparent)]
    Pattern(#[from] PolicyParseError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

pub type DepotResult<T> = Result<T, DepotError>;
