#![forbid(unsafe_code)]

/// Options of a [`ProxyFetcher`](crate::ProxyFetcher).
#[derive(Clone, Debug)]
pub struct ProxyOptions {
    /// Return an existing local copy, flagged stale, when no source could refresh it.
    pub stale_fallback: bool,
    /// Keep `maven-metadata-<source>.xml` copies after merging.
    pub keep_source_metadata: bool,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            stale_fallback: true,
            keep_source_metadata: true,
        }
    }
}

impl ProxyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_fallback(mut self, enabled: bool) -> Self {
        self.stale_fallback = enabled;
        self
    }

    pub fn with_keep_source_metadata(mut self, keep: bool) -> Self {
        self.keep_source_metadata = keep;
        self
    }
}
