#![forbid(unsafe_code)]

use std::sync::Arc;

use depot_content::{Artifact, ArtifactInfo, ContentOptions, RepositoryContent};
use depot_core::{ItemSelector, METADATA_FILENAME, is_generic_snapshot};
use depot_proxy::{
    FetchOutcome, FsRemote, PathPattern, ProxiedSource, ProxyFetcher, ProxyOptions, Remote,
};
use depot_storage::{AssetPath, FsStorage, Storage};

use crate::{
    config::{DepotConfig, RemoteConfig},
    error::{DepotError, DepotResult},
};

/// A managed repository together with the remotes it proxies.
///
/// Reads go through [`RepositoryContent`]; [`fetch`](Self::fetch) fills the repository from
/// the remotes and drops cached items the new files may affect.
pub struct Depot<S: Storage = FsStorage> {
    content: RepositoryContent<S>,
    fetcher: ProxyFetcher<S>,
}

impl Depot<FsStorage> {
    /// Open the repository described by `config`, creating its root if needed.
    pub fn new(config: &DepotConfig) -> DepotResult<Self> {
        config.validate()?;
        let storage = Arc::new(FsStorage::new(config.id.clone(), config.root.clone())?);

        let mut content = ContentOptions::new();
        if let Some(capacity) = config.cache_capacity {
            content = content.with_cache_capacity(capacity);
        }
        let sources = config
            .remotes
            .iter()
            .map(source_from_config)
            .collect::<DepotResult<Vec<_>>>()?;
        let proxy = ProxyOptions::new().with_stale_fallback(config.stale_fallback);

        tracing::info!(
            repository = %config.id,
            root = %config.root.display(),
            remotes = sources.len(),
            "depot opened"
        );
        Ok(Self::from_parts(config.id.clone(), storage, content, sources, proxy))
    }
}

fn source_from_config(remote: &RemoteConfig) -> DepotResult<ProxiedSource> {
    let unsupported = |reason: String| DepotError::UnsupportedUrl {
        id: remote.id.clone(),
        url: remote.url.to_string(),
        reason,
    };
    let transport: Arc<dyn Remote> = match remote.url.scheme() {
        "file" => Arc::new(FsRemote::from_url(&remote.url).map_err(|e| unsupported(e.to_string()))?),
        other => return Err(unsupported(format!("no transport for scheme {other}"))),
    };
    let whitelist = remote
        .whitelist
        .iter()
        .map(|glob| PathPattern::new(glob))
        .collect::<Result<Vec<_>, _>>()?;
    let blacklist = remote
        .blacklist
        .iter()
        .map(|glob| PathPattern::new(glob))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProxiedSource::new(remote.id.clone(), transport)
        .with_name(remote.name.clone().unwrap_or_else(|| remote.id.clone()))
        .with_hard_fail(remote.hard_fail)
        .with_cache_failures(remote.cache_failures)
        .with_release_policy(remote.release_policy)
        .with_snapshot_policy(remote.snapshot_policy)
        .with_checksum_policy(remote.checksum_policy)
        .with_whitelist(whitelist)
        .with_blacklist(blacklist))
}

impl<S: Storage> Depot<S> {
    /// Assemble a depot over any storage backend and prepared sources.
    pub fn from_parts(
        id: impl Into<String>,
        storage: Arc<S>,
        content: ContentOptions,
        sources: Vec<ProxiedSource>,
        proxy: ProxyOptions,
    ) -> Self {
        Self {
            content: RepositoryContent::new(id, storage.clone(), content),
            fetcher: ProxyFetcher::new(storage, sources, proxy),
        }
    }

    pub fn id(&self) -> &str {
        self.content.id()
    }

    pub fn content(&self) -> &RepositoryContent<S> {
        &self.content
    }

    pub fn fetcher(&self) -> &ProxyFetcher<S> {
        &self.fetcher
    }

    /// Repository path of the item `selector` addresses. The item need not be stored.
    pub fn resolve_path(&self, selector: &ItemSelector) -> DepotResult<AssetPath> {
        Ok(self.content.get_item(selector)?.path().clone())
    }

    pub fn artifact_info(&self, path: &str) -> DepotResult<ArtifactInfo> {
        Ok(self.content.artifact_info(path)?)
    }

    /// Make `path` available locally. `maven-metadata.xml` documents are merged from all
    /// remotes; anything else comes from the first remote that has it.
    pub fn fetch(&self, path: &str) -> DepotResult<FetchOutcome> {
        let path = AssetPath::parse(path)?;
        let outcome = if path.name() == METADATA_FILENAME {
            self.fetcher.fetch_metadata(&path)?
        } else {
            self.fetcher.fetch(&path)?
        };
        if outcome.found().is_some_and(|f| f.source().is_some()) {
            if let Some(dir) = path.parent() {
                self.content.cache().invalidate_under(&dir);
            }
        }
        Ok(outcome)
    }

    /// Fetch the artifact `selector` addresses and return its node, or `None` when no remote
    /// has it.
    ///
    /// For generic snapshot versions the version metadata is fetched first so the newest
    /// unique snapshot can be resolved.
    pub fn fetch_artifact(&self, selector: &ItemSelector) -> DepotResult<Option<Arc<Artifact>>> {
        if let (Some(namespace), Some(artifact_id), Some(version)) =
            (selector.namespace(), selector.artifact_id(), selector.version())
        {
            if is_generic_snapshot(version) && selector.artifact_version().is_none() {
                let project_id = selector.project_id().unwrap_or(artifact_id);
                let metadata = self.content.metadata_path(namespace, project_id, Some(version))?;
                self.fetch(metadata.as_str())?;
            }
        }
        let artifact = self.content.get_artifact(selector)?;
        match self.fetch(artifact.path().as_str())? {
            FetchOutcome::Found(_) => Ok(Some(self.content.get_artifact(selector)?)),
            FetchOutcome::NotFound => Ok(None),
        }
    }
}
