#![forbid(unsafe_code)]

use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use depot_core::{RepositoryMetadata, is_repository_metadata, repository_metadata_filename};
use depot_storage::{AssetPath, Storage, StorageError};

use crate::{
    checksum::{ChecksumKind, ChecksumReport, ChecksumStatus, parse_checksum},
    error::{ProxyError, ProxyResult, TransportError},
    index::LastCheckedIndex,
    options::ProxyOptions,
    policy::{ChecksumPolicy, UpdatePolicy},
    source::ProxiedSource,
};

/// A file available in local storage after a fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedFile {
    path: AssetPath,
    local: PathBuf,
    source: Option<String>,
    stale: bool,
    checksums: ChecksumReport,
}

impl FetchedFile {
    pub fn path(&self) -> &AssetPath {
        &self.path
    }

    /// Filesystem location of the stored file.
    pub fn local(&self) -> &std::path::Path {
        &self.local
    }

    /// First source that delivered bytes during this call; `None` when the local copy was
    /// served as is.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The local copy could not be refreshed from any source.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn checksums(&self) -> &ChecksumReport {
        &self.checksums
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(FetchedFile),
    NotFound,
}

impl FetchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(&self) -> Option<&FetchedFile> {
        match self {
            Self::Found(file) => Some(file),
            Self::NotFound => None,
        }
    }

    pub fn into_found(self) -> Option<FetchedFile> {
        match self {
            Self::Found(file) => Some(file),
            Self::NotFound => None,
        }
    }
}

/// Fills a local repository from an ordered list of upstream sources.
///
/// ## Normative
///
/// - Sources are consulted in order. For each one: path filter, then freshness of the local
///   copy under the source's update policy, then its failure cache, then the transfer.
/// - The first successful transfer wins and is stored atomically; no staging file survives.
/// - A failed transfer is cached (when the source caches failures) under the source's own
///   policy. Forced fetches and metadata fetches skip the failure cache and record their
///   failures as `always`, so the next request goes upstream again.
/// - A hard-failing source aborts the whole fetch with its transport error as the cause. A
///   clean miss is not a failure of the source.
/// - Checksum side files never fail a fetch.
pub struct ProxyFetcher<S: Storage> {
    storage: Arc<S>,
    sources: Vec<ProxiedSource>,
    options: ProxyOptions,
}

impl<S: Storage> ProxyFetcher<S> {
    pub fn new(storage: Arc<S>, sources: Vec<ProxiedSource>, options: ProxyOptions) -> Self {
        Self {
            storage,
            sources,
            options,
        }
    }

    pub fn storage(&self) -> &S {
        self.storage.as_ref()
    }

    pub fn sources(&self) -> &[ProxiedSource] {
        &self.sources
    }

    pub fn source(&self, id: &str) -> Option<&ProxiedSource> {
        self.sources.iter().find(|s| s.id() == id)
    }

    pub fn options(&self) -> &ProxyOptions {
        &self.options
    }

    /// Fetch `path` under each source's own update policy.
    pub fn fetch(&self, path: &AssetPath) -> ProxyResult<FetchOutcome> {
        self.fetch_at(path, Utc::now())
    }

    pub fn fetch_at(&self, path: &AssetPath, now: DateTime<Utc>) -> ProxyResult<FetchOutcome> {
        self.run(path, now, false)
    }

    /// Fetch `path` treating every local copy as stale and every cached failure as expired.
    pub fn fetch_always(&self, path: &AssetPath) -> ProxyResult<FetchOutcome> {
        self.run(path, Utc::now(), true)
    }

    fn run(&self, path: &AssetPath, now: DateTime<Utc>, force: bool) -> ProxyResult<FetchOutcome> {
        let rel = self.target(path)?;
        let local_exists = self.has_local(path);
        let index = LastCheckedIndex::new(self.storage.as_ref());

        for source in &self.sources {
            if !source.allows(rel) {
                tracing::trace!(source = source.id(), path = rel, "path not served by source");
                continue;
            }
            let policy = if force {
                UpdatePolicy::Always
            } else {
                source.policy_for(rel)
            };
            if local_exists && is_fresh(policy, index.last_checked(source.id(), path), now) {
                tracing::debug!(source = source.id(), path = rel, %policy, "local copy is fresh");
                return Ok(FetchOutcome::Found(self.found(path, None, false, ChecksumReport::default())));
            }
            if !force && source.failures().is_cached_failure_at(rel, now) {
                tracing::debug!(source = source.id(), path = rel, "skipping cached failure");
                continue;
            }

            let bytes = match source.remote().get_bytes(rel) {
                Ok(bytes) => bytes,
                Err(error) => {
                    self.on_failure(source, rel, policy, now, error)?;
                    continue;
                }
            };
            self.store(path, &bytes)?;
            source.failures().clear_failure(rel);
            self.touch(&index, source, path, now);

            let checksums = if ChecksumKind::is_checksum_path(rel) {
                ChecksumReport::default()
            } else {
                self.fetch_checksums(source, path, &bytes)?
            };
            tracing::debug!(source = source.id(), path = rel, size = bytes.len(), "fetched");
            return Ok(FetchOutcome::Found(self.found(
                path,
                Some(source.id()),
                false,
                checksums,
            )));
        }

        Ok(self.fallback(path, local_exists))
    }

    /// Fetch a `maven-metadata.xml` from every source and merge the copies.
    ///
    /// Each source's document is kept as `maven-metadata-<source>.xml` next to the target; all
    /// such copies found there are merged into the target, which gets computed checksums.
    pub fn fetch_metadata(&self, path: &AssetPath) -> ProxyResult<FetchOutcome> {
        let rel = self.target(path)?;
        let now = Utc::now();
        let dir = path.parent().unwrap_or_else(AssetPath::root);
        let local_exists = self.has_local(path);
        let index = LastCheckedIndex::new(self.storage.as_ref());
        let mut fetched: Vec<AssetPath> = Vec::new();
        let mut first_source = None;

        for source in &self.sources {
            if !source.allows(rel) {
                continue;
            }
            let bytes = match source.remote().get_bytes(rel) {
                Ok(bytes) => bytes,
                Err(error) => {
                    self.on_failure(source, rel, UpdatePolicy::Always, now, error)?;
                    continue;
                }
            };
            if let Err(error) = RepositoryMetadata::from_slice(&bytes) {
                tracing::warn!(source = source.id(), path = rel, %error, "ignoring unparseable metadata");
                continue;
            }
            let copy = dir.resolve(&repository_metadata_filename(source.id()))?;
            self.store(&copy, &bytes)?;
            source.failures().clear_failure(rel);
            self.touch(&index, source, path, now);
            first_source.get_or_insert_with(|| source.id().to_string());
            fetched.push(copy);
        }

        if fetched.is_empty() {
            return Ok(self.fallback(path, local_exists));
        }
        let Some(merged) = self.merge_copies(path, &dir)? else {
            return Ok(self.fallback(path, local_exists));
        };

        let xml = merged.to_xml()?;
        self.store(path, xml.as_bytes())?;
        let mut checksums = ChecksumReport::default();
        for kind in ChecksumKind::ALL {
            let side = sidecar(path, kind)?;
            self.store(&side, kind.compute(xml.as_bytes()).as_bytes())?;
            checksums.set(kind, ChecksumStatus::Generated);
        }

        if !self.options.keep_source_metadata {
            for copy in &fetched {
                if let Err(error) = self.storage.delete(copy) {
                    tracing::warn!(path = %copy, %error, "cannot remove source metadata copy");
                }
            }
        }
        tracing::debug!(path = rel, sources = fetched.len(), "metadata merged");
        Ok(FetchOutcome::Found(FetchedFile {
            path: path.clone(),
            local: self.storage.local_path(path),
            source: first_source,
            stale: false,
            checksums,
        }))
    }

    /// Merge the existing `target` document with every per-source copy in `dir`.
    fn merge_copies(
        &self,
        target: &AssetPath,
        dir: &AssetPath,
    ) -> ProxyResult<Option<RepositoryMetadata>> {
        let entries = match self.storage.list(dir) {
            Ok(entries) => entries,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(error) => return Err(self.storage_failure(dir, error)),
        };
        let mut merged: Option<RepositoryMetadata> = None;
        let documents = entries
            .iter()
            .filter(|e| *e == target || is_repository_metadata(e.name()));
        for entry in documents {
            if self.storage.is_container(entry) {
                continue;
            }
            let bytes = self
                .storage
                .read(entry)
                .map_err(|error| self.storage_failure(entry, error))?;
            match RepositoryMetadata::from_slice(&bytes) {
                Ok(doc) => {
                    merged = Some(match merged.take() {
                        Some(mut acc) => {
                            acc.merge(&doc);
                            acc
                        }
                        None => doc,
                    });
                }
                Err(error) => {
                    tracing::warn!(path = %entry, %error, "skipping unparseable metadata copy");
                }
            }
        }
        Ok(merged)
    }

    fn fetch_checksums(
        &self,
        source: &ProxiedSource,
        path: &AssetPath,
        data: &[u8],
    ) -> ProxyResult<ChecksumReport> {
        let policy = source.checksum_policy();
        let mut report = ChecksumReport::default();
        if policy == ChecksumPolicy::Ignore {
            return Ok(report);
        }
        for kind in ChecksumKind::ALL {
            let side = sidecar(path, kind)?;
            let actual = kind.compute(data);
            let upstream = match source.remote().get_bytes(side.as_str()) {
                Ok(body) => parse_checksum(&body),
                Err(error) => {
                    if !error.is_not_found() {
                        tracing::debug!(source = source.id(), path = %side, %error, "checksum unavailable");
                    }
                    None
                }
            };
            let status = match (upstream, policy) {
                (Some(expected), _) if expected == actual => {
                    self.store(&side, actual.as_bytes())?;
                    ChecksumStatus::Verified
                }
                (_, ChecksumPolicy::Fix) => {
                    self.store(&side, actual.as_bytes())?;
                    ChecksumStatus::Generated
                }
                (Some(expected), _) => {
                    tracing::warn!(source = source.id(), path = %side, expected, actual, "checksum mismatch");
                    ChecksumStatus::Mismatch { expected, actual }
                }
                (None, _) => ChecksumStatus::Missing,
            };
            report.set(kind, status);
        }
        Ok(report)
    }

    /// Log and record a failed transfer; `policy` decides how long it stays cached.
    fn on_failure(
        &self,
        source: &ProxiedSource,
        rel: &str,
        policy: UpdatePolicy,
        now: DateTime<Utc>,
        error: TransportError,
    ) -> ProxyResult<()> {
        if error.is_not_found() {
            tracing::debug!(source = source.id(), path = rel, "not found upstream");
        } else {
            tracing::warn!(source = source.id(), path = rel, %error, "transfer failed");
        }
        if source.cache_failures() {
            source
                .failures()
                .record_failure_at(rel, policy, now);
        }
        if source.hard_fail() && !error.is_not_found() {
            tracing::error!(source = source.id(), path = rel, %error, "hard-failing source aborts fetch");
            return Err(ProxyError::Transport {
                source_id: source.id().to_string(),
                path: rel.to_string(),
                source: error,
            });
        }
        Ok(())
    }

    fn target<'p>(&self, path: &'p AssetPath) -> ProxyResult<&'p str> {
        if path.is_root() {
            return Err(StorageError::InvalidPath(path.to_string()).into());
        }
        Ok(path.as_str())
    }

    fn has_local(&self, path: &AssetPath) -> bool {
        self.storage.exists(path) && !self.storage.is_container(path)
    }

    fn fallback(&self, path: &AssetPath, local_exists: bool) -> FetchOutcome {
        if local_exists && self.options.stale_fallback {
            tracing::debug!(path = %path, "serving stale local copy");
            return FetchOutcome::Found(self.found(path, None, true, ChecksumReport::default()));
        }
        FetchOutcome::NotFound
    }

    fn found(
        &self,
        path: &AssetPath,
        source: Option<&str>,
        stale: bool,
        checksums: ChecksumReport,
    ) -> FetchedFile {
        FetchedFile {
            path: path.clone(),
            local: self.storage.local_path(path),
            source: source.map(str::to_string),
            stale,
            checksums,
        }
    }

    fn store(&self, path: &AssetPath, data: &[u8]) -> ProxyResult<()> {
        self.storage
            .write_atomic(path, data)
            .map_err(|error| self.storage_failure(path, error))
    }

    fn storage_failure(&self, path: &AssetPath, error: StorageError) -> ProxyError {
        tracing::error!(storage = self.storage.id(), path = %path, %error, "storage failure");
        ProxyError::Storage(error)
    }

    fn touch(&self, index: &LastCheckedIndex<'_, S>, source: &ProxiedSource, path: &AssetPath, now: DateTime<Utc>) {
        if let Err(error) = index.touch_at(source.id(), path, now) {
            tracing::warn!(source = source.id(), path = %path, %error, "cannot update last-checked marker");
        }
    }
}

fn is_fresh(policy: UpdatePolicy, last_checked: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match policy {
        UpdatePolicy::Never => true,
        UpdatePolicy::Always => false,
        UpdatePolicy::Interval(_) => last_checked.is_some_and(|at| !policy.is_expired(at, now)),
    }
}

fn sidecar(path: &AssetPath, kind: ChecksumKind) -> ProxyResult<AssetPath> {
    Ok(AssetPath::parse(&format!("{}.{}", path.as_str(), kind.extension()))?)
}
