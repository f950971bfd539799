#![forbid(unsafe_code)]

use thiserror::Error;

/// A coordinate or path that cannot be mapped under the repository layout.
///
/// Layout errors describe malformed input. They are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {value:?}")]
    InvalidSegment { field: &'static str, value: String },

    #[error("path {path:?} does not match the repository layout: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("artifact version {artifact_version} does not belong to version {version}")]
    VersionMismatch {
        version: String,
        artifact_version: String,
    },
}

impl LayoutError {
    pub fn invalid_path<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors produced while reading or writing a `maven-metadata.xml` document.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata parse error: {0}")]
    Parse(String),

    #[error("metadata serialize error: {0}")]
    Serialize(String),

    #[error("metadata is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

pub type MetadataResult<T> = Result<T, MetadataError>;
