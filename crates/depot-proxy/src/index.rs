#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use depot_storage::{AssetPath, Storage, StorageResult};

/// Directory holding per-source last-checked markers. Dot entries are hidden from content
/// listings.
pub const INDEX_DIR: &str = ".index/last-checked";

/// When each source was last asked about each path.
///
/// Markers live at `.index/last-checked/<source-id>/<path>` and hold an RFC 3339 timestamp.
pub struct LastCheckedIndex<'a, S: Storage + ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> LastCheckedIndex<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    fn marker(source_id: &str, path: &AssetPath) -> StorageResult<AssetPath> {
        AssetPath::parse(INDEX_DIR)?
            .resolve(source_id)?
            .resolve(path.as_str())
    }

    /// `None` when the source never succeeded for `path` or the marker is unreadable.
    pub fn last_checked(&self, source_id: &str, path: &AssetPath) -> Option<DateTime<Utc>> {
        let marker = Self::marker(source_id, path).ok()?;
        if !self.storage.exists(&marker) {
            return None;
        }
        let bytes = self.storage.read(&marker).ok()?;
        let text = std::str::from_utf8(&bytes).ok()?;
        match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(error) => {
                tracing::warn!(source = source_id, path = %path, %error, "ignoring corrupt last-checked marker");
                None
            }
        }
    }

    pub fn touch(&self, source_id: &str, path: &AssetPath) -> StorageResult<()> {
        self.touch_at(source_id, path, Utc::now())
    }

    pub fn touch_at(
        &self,
        source_id: &str,
        path: &AssetPath,
        at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let marker = Self::marker(source_id, path)?;
        self.storage.write_atomic(&marker, at.to_rfc3339().as_bytes())
    }
}
