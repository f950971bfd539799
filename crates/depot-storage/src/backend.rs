#![forbid(unsafe_code)]

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use bytes::Bytes;

use crate::{error::StorageResult, path::AssetPath};

/// Storage backend holding one repository's files.
///
/// ## Normative
/// - Paths are [`AssetPath`]s relative to the backend root; the backend maps them to its own
///   locations and never lets an operation act outside of the root.
/// - `list` returns direct children sorted by name.
/// - `write_atomic` and `replace_from_file` are all-or-nothing: readers observe either the old
///   content or the new content, and no staging files survive the call.
pub trait Storage: Send + Sync {
    /// Identifier used in logs and errors.
    fn id(&self) -> &str;

    fn exists(&self, path: &AssetPath) -> bool;

    /// True if `path` exists and can hold children.
    fn is_container(&self, path: &AssetPath) -> bool;

    fn list(&self, path: &AssetPath) -> StorageResult<Vec<AssetPath>>;

    fn read(&self, path: &AssetPath) -> StorageResult<Bytes>;

    fn modified(&self, path: &AssetPath) -> StorageResult<SystemTime>;

    fn write_atomic(&self, path: &AssetPath, data: &[u8]) -> StorageResult<()>;

    /// Copy `source` into place at `path`.
    fn replace_from_file(&self, path: &AssetPath, source: &Path) -> StorageResult<()>;

    /// Delete a file or a container with everything below it.
    fn delete(&self, path: &AssetPath) -> StorageResult<()>;

    /// Location of `path` on the local filesystem.
    fn local_path(&self, path: &AssetPath) -> PathBuf;
}
