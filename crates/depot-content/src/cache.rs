#![forbid(unsafe_code)]

use std::{num::NonZeroUsize, sync::Arc};

use depot_storage::AssetPath;
use lru::LruCache;
use parking_lot::Mutex;

use crate::item::{CacheItem, ContentItem};

/// Key of a cached node: namespaces by their dotted name, the rest by path.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum CacheKey {
    Namespace(String),
    Project(AssetPath),
    Version(AssetPath),
    Artifact(AssetPath),
}

impl CacheKey {
    fn path(&self) -> Option<&AssetPath> {
        match self {
            Self::Namespace(_) => None,
            Self::Project(p) | Self::Version(p) | Self::Artifact(p) => Some(p),
        }
    }
}

/// Capacity policy of an [`ItemCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    /// LRU with at most this many entries.
    Bounded(NonZeroUsize),
    Unbounded,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Bounded(NonZeroUsize::new(1024).unwrap_or(NonZeroUsize::MIN))
    }
}

/// In-memory memo of content tree nodes owned by one repository.
///
/// ## Normative
/// - Same key returns the same `Arc` while the entry is cached.
/// - Entries may be evicted at any time and are rebuilt transparently; staleness is not
///   tracked beyond explicit invalidation on delete and add.
pub struct ItemCache {
    entries: Mutex<LruCache<CacheKey, ContentItem>>,
    policy: CachePolicy,
}

impl std::fmt::Debug for ItemCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.entries.try_lock().map(|c| c.len());
        f.debug_struct("ItemCache")
            .field("policy", &self.policy)
            .field("size", &size)
            .finish()
    }
}

impl Default for ItemCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl ItemCache {
    pub fn new(policy: CachePolicy) -> Self {
        let entries = match policy {
            CachePolicy::Bounded(capacity) => LruCache::new(capacity),
            CachePolicy::Unbounded => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn get(&self, key: &CacheKey) -> Option<ContentItem> {
        self.entries.lock().get(key).cloned()
    }

    /// Return the cached node for `key` or build, insert and return it.
    ///
    /// The lock is held across `build` so concurrent callers construct a node once.
    /// `build` must not call back into this cache.
    pub fn get_or_try_insert_with<T, E, F>(&self, key: CacheKey, build: F) -> Result<Arc<T>, E>
    where
        T: CacheItem,
        F: FnOnce() -> Result<Arc<T>, E>,
    {
        let mut entries = self.entries.lock();
        if let Some(hit) = entries.get(&key).and_then(T::from_item) {
            tracing::trace!(?key, "item cache hit");
            return Ok(hit);
        }
        let node = build()?;
        entries.put(key, Arc::clone(&node).into_item());
        Ok(node)
    }

    pub fn remove(&self, key: &CacheKey) -> Option<ContentItem> {
        self.entries.lock().pop(key)
    }

    /// Drop every entry at or below `path`, and every namespace entry.
    pub fn invalidate_under(&self, path: &AssetPath) {
        let mut entries = self.entries.lock();
        let stale: Vec<CacheKey> = entries
            .iter()
            .map(|(k, _)| k)
            .filter(|k| match k.path() {
                Some(p) => p == path || p.strip_prefix(path).is_some(),
                None => true,
            })
            .cloned()
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        tracing::trace!(path = %path, dropped = stale.len(), "item cache invalidated");
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
