#![forbid(unsafe_code)]

use std::fmt;

use crate::error::{StorageError, StorageResult};

/// A sanitized, `/`-separated path relative to a storage root.
///
/// The empty path is the root itself. Segments are never empty, `.` or `..`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath(String);

impl AssetPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a relative path. Backslashes are normalized, leading and trailing `/` ignored.
    pub fn parse(input: &str) -> StorageResult<Self> {
        let normalized = input.replace('\\', "/");
        let trimmed = normalized.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let bad = trimmed
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == ".." || seg.contains('\0'));
        if bad {
            return Err(StorageError::InvalidPath(input.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment; empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Containing path; `None` for the root.
    pub fn parent(&self) -> Option<AssetPath> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rsplit_once('/') {
            Some((head, _)) => Self(head.to_string()),
            None => Self::root(),
        })
    }

    /// Append a relative path below this one.
    pub fn resolve(&self, child: &str) -> StorageResult<AssetPath> {
        let child = Self::parse(child)?;
        Ok(match (self.is_root(), child.is_root()) {
            (_, true) => self.clone(),
            (true, false) => child,
            (false, false) => Self(format!("{}/{}", self.0, child.0)),
        })
    }

    /// Path of `self` relative to `ancestor`, if it lies below it.
    pub fn strip_prefix(&self, ancestor: &AssetPath) -> Option<&str> {
        if ancestor.is_root() {
            return Some(&self.0);
        }
        self.0
            .strip_prefix(&ancestor.0)
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl TryFrom<&str> for AssetPath {
    type Error = StorageError;

    fn try_from(value: &str) -> StorageResult<Self> {
        Self::parse(value)
    }
}
