#![forbid(unsafe_code)]

//! Generic snapshot label → concrete stored version.

use std::sync::LazyLock;

use depot_core::{
    METADATA_FILENAME, RepositoryMetadata, SnapshotVersion, is_generic_snapshot, release_part,
};
use depot_storage::{AssetPath, Storage};
use regex::Regex;

static TIMESTAMP_BUILD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{8}\.\d{6}-\d+)(?:[-.]|$)").expect("timestamp pattern is valid")
});

/// Resolves the artifact version to use inside one version directory.
pub struct SnapshotResolver<'a, S: Storage + ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> SnapshotResolver<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Concrete version of `artifact_id` stored in `version_dir` for `generic_version`.
    ///
    /// In order:
    /// 1. an explicit concrete version is used verbatim;
    /// 2. a non-snapshot version is already concrete;
    /// 3. the snapshot recorded in the directory's metadata document;
    /// 4. the newest `(timestamp, build)` among the stored files;
    /// 5. the generic version unchanged.
    pub fn resolve_artifact_version(
        &self,
        version_dir: &AssetPath,
        artifact_id: &str,
        generic_version: &str,
        explicit: Option<&str>,
    ) -> String {
        if let Some(explicit) = explicit.filter(|v| !v.is_empty() && !v.contains('*')) {
            return explicit.to_string();
        }
        if !is_generic_snapshot(generic_version) {
            return generic_version.to_string();
        }
        let base = release_part(generic_version);

        if let Some(snapshot) = self.from_metadata(version_dir) {
            return SnapshotVersion::new(base, snapshot.timestamp(), snapshot.build_number())
                .to_string();
        }
        if let Some(snapshot) = self.from_listing(version_dir, artifact_id, base) {
            return snapshot.to_string();
        }
        generic_version.to_string()
    }

    fn from_metadata(&self, version_dir: &AssetPath) -> Option<SnapshotVersion> {
        let path = version_dir.resolve(METADATA_FILENAME).ok()?;
        if !self.storage.exists(&path) {
            return None;
        }
        let bytes = match self.storage.read(&path) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(storage = self.storage.id(), path = %path, %error, "cannot read version metadata");
                return None;
            }
        };
        match RepositoryMetadata::from_slice(&bytes) {
            Ok(metadata) => metadata.snapshot_version(),
            Err(error) => {
                tracing::warn!(storage = self.storage.id(), path = %path, %error, "cannot parse version metadata");
                None
            }
        }
    }

    fn from_listing(
        &self,
        version_dir: &AssetPath,
        artifact_id: &str,
        base: &str,
    ) -> Option<SnapshotVersion> {
        let entries = self.storage.list(version_dir).ok()?;
        let prefix = format!("{artifact_id}-{base}-");
        entries
            .iter()
            .filter_map(|entry| entry.name().strip_prefix(&prefix))
            .filter_map(|rest| TIMESTAMP_BUILD.captures(rest))
            .filter_map(|caps| SnapshotVersion::from_token(base, &caps[1]))
            .max()
    }
}
