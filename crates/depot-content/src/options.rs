#![forbid(unsafe_code)]

use std::num::NonZeroUsize;

use depot_core::ArtifactMappings;

use crate::cache::CachePolicy;

/// Options of a [`RepositoryContent`](crate::RepositoryContent).
#[derive(Clone, Debug, Default)]
pub struct ContentOptions {
    /// Capacity policy of the item cache.
    pub cache_policy: CachePolicy,
    /// Type ⇄ (classifier, extension) mapping used by the layout and the filename parser.
    pub mappings: ArtifactMappings,
}

impl ContentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` items cached.
    pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache_policy = CachePolicy::Bounded(capacity);
        self
    }

    /// Never evict cached items.
    pub fn with_unbounded_cache(mut self) -> Self {
        self.cache_policy = CachePolicy::Unbounded;
        self
    }

    pub fn with_mappings(mut self, mappings: ArtifactMappings) -> Self {
        self.mappings = mappings;
        self
    }
}
