#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use bytes::Bytes;
use depot_storage::{AssetPath, FsStorage, Storage, StorageError};
use url::Url;

use crate::error::{TransportError, TransportResult};

/// Byte transport to one upstream repository.
///
/// `path` is repository-relative, e.g. `com/x/lib/1.0/lib-1.0.jar`.
#[cfg_attr(test, unimock::unimock(api = RemoteMock))]
pub trait Remote: Send + Sync {
    fn get_bytes(&self, path: &str) -> TransportResult<Bytes>;
}

/// Remote served from a local directory, e.g. a `file://` URL.
#[derive(Debug)]
pub struct FsRemote {
    storage: FsStorage,
}

impl FsRemote {
    pub fn new(root: impl AsRef<Path>) -> TransportResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(TransportError::failed(format!("no such directory: {}", root.display())));
        }
        let storage = FsStorage::new(root.display().to_string(), root)
            .map_err(|e| TransportError::failed(e.to_string()))?;
        Ok(Self { storage })
    }

    pub fn from_url(url: &Url) -> TransportResult<Self> {
        if url.scheme() != "file" {
            return Err(TransportError::failed(format!("unsupported scheme: {url}")));
        }
        let root: PathBuf = url
            .to_file_path()
            .map_err(|()| TransportError::failed(format!("not a local path: {url}")))?;
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        self.storage.root()
    }
}

impl Remote for FsRemote {
    fn get_bytes(&self, path: &str) -> TransportResult<Bytes> {
        let asset = AssetPath::parse(path).map_err(|e| TransportError::failed(e.to_string()))?;
        match self.storage.read(&asset) {
            Ok(bytes) => Ok(bytes),
            Err(StorageError::NotFound(p)) => Err(TransportError::NotFound(p)),
            Err(e) => Err(TransportError::failed(e.to_string())),
        }
    }
}
