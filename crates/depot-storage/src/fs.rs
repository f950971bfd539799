#![forbid(unsafe_code)]

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::{
    backend::Storage,
    error::{StorageError, StorageResult},
    path::AssetPath,
};

/// Concrete on-disk [`Storage`] rooted at a directory.
#[derive(Clone, Debug)]
pub struct FsStorage {
    id: String,
    root: PathBuf,
}

impl FsStorage {
    /// Create a backend rooted at `root`. The directory is created if missing.
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            id: id.into(),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fail with `PathEscape` unless `path` resolves strictly below the root.
    ///
    /// Symlinks are followed, so a link pointing out of the repository is rejected too.
    fn guard_descendant(&self, path: &AssetPath) -> StorageResult<PathBuf> {
        let target = self.local_path(path);
        let canonical_root = fs::canonicalize(&self.root)?;
        let canonical = match fs::canonicalize(&target) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if canonical == canonical_root || !canonical.starts_with(&canonical_root) {
            tracing::error!(
                storage = %self.id,
                path = %path,
                resolved = %canonical.display(),
                "refusing to touch a path outside of the storage root"
            );
            return Err(StorageError::PathEscape {
                path: path.to_string(),
            });
        }
        Ok(target)
    }

    /// Unique staging file next to `target`: `<name>.<random>.tmp`.
    fn staging_file(&self, path: &AssetPath) -> StorageResult<(PathBuf, NamedTempFile)> {
        if path.is_root() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        let target = self.local_path(path);
        let parent = target
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(path.to_string()))?;
        fs::create_dir_all(parent)?;
        let tmp = tempfile::Builder::new()
            .prefix(&format!("{}.", path.name()))
            .suffix(".tmp")
            .tempfile_in(parent)?;
        Ok((target, tmp))
    }

    fn commit(tmp: NamedTempFile, target: &Path) -> StorageResult<()> {
        // `persist` renames over the target; on failure the temp file is removed on drop.
        tmp.persist(target).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

impl Storage for FsStorage {
    fn id(&self) -> &str {
        &self.id
    }

    fn exists(&self, path: &AssetPath) -> bool {
        self.local_path(path).exists()
    }

    fn is_container(&self, path: &AssetPath) -> bool {
        self.local_path(path).is_dir()
    }

    fn list(&self, path: &AssetPath) -> StorageResult<Vec<AssetPath>> {
        let dir = self.local_path(path);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            } else {
                tracing::debug!(storage = %self.id, dir = %dir.display(), "skipping non UTF-8 entry");
            }
        }
        names.sort();
        names.iter().map(|name| path.resolve(name)).collect()
    }

    fn read(&self, path: &AssetPath) -> StorageResult<Bytes> {
        match fs::read(self.local_path(path)) {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn modified(&self, path: &AssetPath) -> StorageResult<SystemTime> {
        match fs::metadata(self.local_path(path)) {
            Ok(meta) => Ok(meta.modified()?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, path: &AssetPath, data: &[u8]) -> StorageResult<()> {
        let (target, mut tmp) = self.staging_file(path)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        Self::commit(tmp, &target)?;
        tracing::trace!(storage = %self.id, path = %path, len = data.len(), "written");
        Ok(())
    }

    fn replace_from_file(&self, path: &AssetPath, source: &Path) -> StorageResult<()> {
        let mut input = fs::File::open(source)?;
        let (target, mut tmp) = self.staging_file(path)?;
        io::copy(&mut input, &mut tmp)?;
        tmp.as_file().sync_all()?;
        Self::commit(tmp, &target)?;
        tracing::debug!(storage = %self.id, path = %path, source = %source.display(), "replaced");
        Ok(())
    }

    fn delete(&self, path: &AssetPath) -> StorageResult<()> {
        let target = self.guard_descendant(path)?;
        // `symlink_metadata` so that a link is removed rather than followed.
        let meta = fs::symlink_metadata(&target)?;
        if meta.is_dir() {
            fs::remove_dir_all(&target)?;
        } else {
            fs::remove_file(&target)?;
        }
        tracing::debug!(storage = %self.id, path = %path, "deleted");
        Ok(())
    }

    fn local_path(&self, path: &AssetPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}
