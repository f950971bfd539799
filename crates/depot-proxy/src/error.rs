#![forbid(unsafe_code)]

use depot_core::{LayoutError, MetadataError};
use depot_storage::StorageError;
use thiserror::Error;

/// Unrecognised policy string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct PolicyParseError {
    kind: &'static str,
    value: String,
}

impl PolicyParseError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Failure talking to an upstream source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("not found upstream: {0}")]
    NotFound(String),
    #[error("transfer failed: {0}")]
    Failed(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("timeout")]
    Timeout,
}

impl TransportError {
    pub fn failed<S: Into<String>>(msg: S) -> Self {
        Self::Failed(msg.into())
    }

    /// A clean miss, as opposed to a broken transfer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// A hard-failing source broke the fetch; carries the original cause.
    #[error("source {source_id} failed for {path}")]
    Transport {
        source_id: String,
        path: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

pub type ProxyResult<T> = Result<T, ProxyError>;
