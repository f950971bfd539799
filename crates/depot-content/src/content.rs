#![forbid(unsafe_code)]

use std::{path::Path, sync::Arc};

use depot_core::{
    ArtifactCoordinate, ItemSelector, Layout, LayoutError, is_unique_snapshot,
};
use depot_storage::{AssetPath, Storage, StorageError};

use crate::{
    cache::{CacheKey, ItemCache},
    error::{ContentError, ContentResult},
    filter::ArtifactFilter,
    info::ArtifactInfo,
    item::{Artifact, ContentItem, Namespace, Project, Version},
    options::ContentOptions,
    resolver::SnapshotResolver,
    stream::ArtifactStream,
};

/// What a directory looks like from the files below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContainerKind {
    Namespace,
    Project,
    Version,
}

/// Content tree of one managed repository.
///
/// ## Normative
/// - Getters (`get_namespace`, `get_project`, `get_version`, `get_artifact`, `get_item`) build
///   handles for well formed coordinates whether or not anything is stored there; `to_item`,
///   deletes and `artifact_info` require the item to exist.
/// - Nodes are memoized in the repository's [`ItemCache`]; the same coordinate yields the same
///   `Arc` while cached.
/// - Entries whose name starts with `.` are bookkeeping and never part of the tree.
pub struct RepositoryContent<S: Storage> {
    id: String,
    storage: Arc<S>,
    layout: Layout,
    cache: ItemCache,
}

impl<S: Storage> std::fmt::Debug for RepositoryContent<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryContent")
            .field("id", &self.id)
            .field("layout", &self.layout.id())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> RepositoryContent<S> {
    pub fn new(id: impl Into<String>, storage: Arc<S>, options: ContentOptions) -> Self {
        Self {
            id: id.into(),
            storage,
            layout: Layout::new(options.mappings),
            cache: ItemCache::new(options.cache_policy),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    fn asset_path(rel: &str) -> ContentResult<AssetPath> {
        AssetPath::parse(rel)
            .map_err(|_| LayoutError::invalid_path(rel, "not a relative repository path").into())
    }

    fn access_error(&self, path: &AssetPath, error: StorageError) -> ContentError {
        ContentError::from_storage(&self.id, path.as_str(), error)
    }

    fn not_found(&self, path: &AssetPath) -> ContentError {
        ContentError::ItemNotFound {
            repository: self.id.clone(),
            path: path.as_str().to_string(),
        }
    }

    // ---- getters -------------------------------------------------------------------------

    pub fn get_namespace(&self, namespace: &str) -> ContentResult<Arc<Namespace>> {
        let path = Self::asset_path(&self.layout.namespace_path(namespace)?)?;
        self.cache
            .get_or_try_insert_with(CacheKey::Namespace(namespace.to_string()), || {
                Ok(Arc::new(Namespace::new(namespace.to_string(), path)))
            })
    }

    pub fn get_project(&self, namespace: &str, project_id: &str) -> ContentResult<Arc<Project>> {
        let parent = self.get_namespace(namespace)?;
        let path = Self::asset_path(&self.layout.project_path(namespace, project_id)?)?;
        self.cache
            .get_or_try_insert_with(CacheKey::Project(path.clone()), || {
                Ok(Arc::new(Project::new(parent, project_id.to_string(), path)))
            })
    }

    /// Version directory handle; unique snapshot versions map to their generic directory.
    pub fn get_version(
        &self,
        namespace: &str,
        project_id: &str,
        version: &str,
    ) -> ContentResult<Arc<Version>> {
        let parent = self.get_project(namespace, project_id)?;
        let path = Self::asset_path(&self.layout.version_path(namespace, project_id, version)?)?;
        let base = path.name().to_string();
        self.cache
            .get_or_try_insert_with(CacheKey::Version(path.clone()), || {
                Ok(Arc::new(Version::new(parent, base, path)))
            })
    }

    /// Artifact addressed by `selector`, resolving generic snapshot versions against storage.
    ///
    /// Without type and extension the artifact is a `jar`.
    pub fn get_artifact(&self, selector: &ItemSelector) -> ContentResult<Arc<Artifact>> {
        let namespace = selector
            .namespace()
            .ok_or(LayoutError::MissingField("namespace"))?;
        let artifact_id = selector
            .artifact_id()
            .ok_or(LayoutError::MissingField("artifact id"))?;
        let project_id = selector.project_id().unwrap_or(artifact_id);
        let label = selector
            .version()
            .or(selector.artifact_version())
            .ok_or(LayoutError::MissingField("version"))?;
        let version = self.get_version(namespace, project_id, label)?;

        let explicit = selector
            .artifact_version()
            .or(selector.version().filter(|v| is_unique_snapshot(v)));
        let artifact_version = SnapshotResolver::new(self.storage.as_ref())
            .resolve_artifact_version(version.path(), artifact_id, version.version(), explicit);

        let mut builder = ArtifactCoordinate::builder()
            .namespace(namespace)
            .project_id(project_id)
            .artifact_id(artifact_id)
            .version(version.version())
            .artifact_version(artifact_version);
        if let Some(classifier) = selector.classifier().filter(|c| *c != "*") {
            builder = builder.classifier(classifier);
        }
        builder = match (selector.extension(), selector.artifact_type()) {
            (Some(extension), _) => builder.extension(extension),
            (None, Some(artifact_type)) => builder.artifact_type(artifact_type),
            (None, None) => builder.extension("jar"),
        };
        let coordinate = builder.build()?;

        let file_name = self.layout.file_name(&coordinate);
        let path = version
            .path()
            .resolve(&file_name)
            .map_err(|_| LayoutError::invalid_path(&file_name, "not a valid file name"))?;
        self.artifact_node(version, path)
    }

    /// Dispatch on the fields present:
    /// artifact id + version → artifact, project id + version → version,
    /// project id → project, otherwise the namespace.
    pub fn get_item(&self, selector: &ItemSelector) -> ContentResult<ContentItem> {
        let namespace = selector
            .namespace()
            .ok_or(LayoutError::MissingField("namespace"))?;
        let version = selector.version().or(selector.artifact_version());
        match (selector.artifact_id(), selector.project_id(), version) {
            (Some(_), _, Some(_)) => self.get_artifact(selector).map(Into::into),
            (None, Some(project_id), Some(version)) => self
                .get_version(namespace, project_id, version)
                .map(Into::into),
            (_, Some(project_id), None) => self.get_project(namespace, project_id).map(Into::into),
            _ => self.get_namespace(namespace).map(Into::into),
        }
    }

    pub(crate) fn artifact_node(
        &self,
        version: Arc<Version>,
        path: AssetPath,
    ) -> ContentResult<Arc<Artifact>> {
        self.cache
            .get_or_try_insert_with(CacheKey::Artifact(path.clone()), || {
                let info = self.describe(&version, path.name());
                Ok(Arc::new(Artifact::new(version, path, info)))
            })
    }

    fn describe(&self, version: &Version, file_name: &str) -> ArtifactInfo {
        let dir = version.path();
        ArtifactInfo::describe(
            self.layout.mappings(),
            version.project().id(),
            version.version(),
            file_name,
            |sibling| {
                dir.resolve(sibling)
                    .is_ok_and(|p| self.storage.exists(&p) && !self.storage.is_container(&p))
            },
        )
    }

    // ---- path → item ---------------------------------------------------------------------

    /// Item stored at `path`.
    ///
    /// Files are artifacts of their containing version directory. Directories are classified
    /// from their content: a `.pom` directly inside makes a version; otherwise the first `.pom`
    /// (or, failing that, `maven-metadata*` file) found depth first decides: two levels below
    /// makes a project, anything else a namespace.
    pub fn to_item(&self, path: &str) -> ContentResult<ContentItem> {
        let path = Self::asset_path(path)?;
        if path.is_root() {
            return Err(LayoutError::invalid_path("/", "the repository root is not an item").into());
        }
        if !self.storage.exists(&path) {
            return Err(self.not_found(&path));
        }
        if !self.storage.is_container(&path) {
            return self.artifact_at(&path).map(Into::into);
        }
        if let Some(item) = self.cached_container(&path) {
            return Ok(item);
        }
        match self.classify(&path)? {
            ContainerKind::Version => self.version_at(&path).map(Into::into),
            ContainerKind::Project => self.project_at(&path).map(Into::into),
            ContainerKind::Namespace => self.namespace_at(&path).map(Into::into),
        }
    }

    /// Name information of the artifact file stored at `path`.
    pub fn artifact_info(&self, path: &str) -> ContentResult<ArtifactInfo> {
        match self.to_item(path)? {
            ContentItem::Artifact(artifact) => Ok(artifact.info().clone()),
            other => Err(LayoutError::invalid_path(
                other.path().as_str(),
                "not an artifact file",
            )
            .into()),
        }
    }

    fn cached_container(&self, path: &AssetPath) -> Option<ContentItem> {
        let dotted = path.segments().collect::<Vec<_>>().join(".");
        [
            CacheKey::Version(path.clone()),
            CacheKey::Project(path.clone()),
            CacheKey::Namespace(dotted),
        ]
        .iter()
        .find_map(|key| self.cache.get(key))
    }

    fn namespace_at(&self, path: &AssetPath) -> ContentResult<Arc<Namespace>> {
        let dotted = path.segments().collect::<Vec<_>>().join(".");
        self.get_namespace(&dotted)
    }

    fn project_at(&self, path: &AssetPath) -> ContentResult<Arc<Project>> {
        let segments: Vec<&str> = path.segments().collect();
        match segments.split_last() {
            Some((project, namespace)) if !namespace.is_empty() => {
                self.get_project(&namespace.join("."), project)
            }
            _ => Err(LayoutError::invalid_path(path.as_str(), "no namespace above the project").into()),
        }
    }

    fn version_at(&self, path: &AssetPath) -> ContentResult<Arc<Version>> {
        let segments: Vec<&str> = path.segments().collect();
        let n = segments.len();
        if n < 3 {
            return Err(LayoutError::invalid_path(
                path.as_str(),
                "expected <namespace>/<project>/<version>",
            )
            .into());
        }
        self.get_version(&segments[..n - 2].join("."), segments[n - 2], segments[n - 1])
    }

    fn artifact_at(&self, path: &AssetPath) -> ContentResult<Arc<Artifact>> {
        let parent = match path.parent() {
            Some(parent) if parent.depth() >= 3 => parent,
            _ => {
                return Err(LayoutError::invalid_path(
                    path.as_str(),
                    "artifact files live below <namespace>/<project>/<version>",
                )
                .into());
            }
        };
        let version = self.version_at(&parent)?;
        self.artifact_node(version, path.clone())
    }

    fn classify(&self, path: &AssetPath) -> ContentResult<ContainerKind> {
        let depth = path.depth();
        let children = self.list_visible(path)?;
        let has_pom = children
            .iter()
            .any(|c| c.name().ends_with(".pom") && !self.storage.is_container(c));
        if has_pom && depth >= 3 {
            return Ok(ContainerKind::Version);
        }

        let marker = match self.find_first(path, &|name| name.ends_with(".pom"))? {
            Some(found) => Some(found),
            None => self.find_first(path, &|name| name.starts_with("maven-metadata"))?,
        };
        let levels = marker
            .as_ref()
            .and_then(|m| m.strip_prefix(path))
            .map(|rel| rel.split('/').count());
        Ok(match levels {
            Some(2) if depth >= 2 => ContainerKind::Project,
            _ => ContainerKind::Namespace,
        })
    }

    /// First file below `dir` (sorted, depth first) whose name satisfies `pred`.
    fn find_first(
        &self,
        dir: &AssetPath,
        pred: &dyn Fn(&str) -> bool,
    ) -> ContentResult<Option<AssetPath>> {
        for child in self.list_visible(dir)? {
            if self.storage.is_container(&child) {
                if let Some(found) = self.find_first(&child, pred)? {
                    return Ok(Some(found));
                }
            } else if pred(child.name()) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    pub(crate) fn list_visible(&self, dir: &AssetPath) -> ContentResult<Vec<AssetPath>> {
        match self.storage.list(dir) {
            Ok(children) => Ok(children
                .into_iter()
                .filter(|c| !c.name().starts_with('.'))
                .collect()),
            Err(StorageError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(self.access_error(dir, e)),
        }
    }

    fn child_containers(&self, dir: &AssetPath) -> ContentResult<Vec<AssetPath>> {
        Ok(self
            .list_visible(dir)?
            .into_iter()
            .filter(|c| self.storage.is_container(c))
            .collect())
    }

    pub(crate) fn version_files(&self, version: &Version) -> ContentResult<Vec<AssetPath>> {
        Ok(self
            .list_visible(version.path())?
            .into_iter()
            .filter(|c| !self.storage.is_container(c))
            .collect())
    }

    // ---- listings ------------------------------------------------------------------------

    /// Namespaces directly below `parent`, or top-level namespaces for `None`.
    pub fn get_namespaces(&self, parent: Option<&Namespace>) -> ContentResult<Vec<Arc<Namespace>>> {
        let dir = parent.map_or_else(AssetPath::root, |n| n.path().clone());
        let mut out = Vec::new();
        for child in self.child_containers(&dir)? {
            if self.classify(&child)? != ContainerKind::Namespace {
                continue;
            }
            let name = match parent {
                Some(p) => format!("{}.{}", p.namespace(), child.name()),
                None => child.name().to_string(),
            };
            out.push(self.get_namespace(&name)?);
        }
        Ok(out)
    }

    pub fn get_projects(&self, namespace: &Namespace) -> ContentResult<Vec<Arc<Project>>> {
        let mut out = Vec::new();
        for child in self.child_containers(namespace.path())? {
            if self.classify(&child)? == ContainerKind::Project {
                out.push(self.get_project(namespace.namespace(), child.name())?);
            }
        }
        Ok(out)
    }

    pub fn get_versions(&self, project: &Project) -> ContentResult<Vec<Arc<Version>>> {
        self.child_containers(project.path())?
            .iter()
            .map(|child| {
                self.get_version(project.namespace().namespace(), project.id(), child.name())
            })
            .collect()
    }

    /// Every file of a version directory, metadata and related files included.
    pub fn get_artifacts_in(&self, version: &Arc<Version>) -> ContentResult<Vec<Arc<Artifact>>> {
        self.version_files(version)?
            .into_iter()
            .map(|file| self.artifact_node(Arc::clone(version), file))
            .collect()
    }

    /// Artifacts addressed by `selector`, collected.
    pub fn get_artifacts(&self, selector: &ItemSelector) -> ContentResult<Vec<Arc<Artifact>>> {
        self.new_artifact_stream(selector)?.collect()
    }

    /// Lazy stream of the artifacts addressed by `selector`.
    ///
    /// The scope is the selector's version, else its project, else its namespace (and, with
    /// `recurse`, every namespace below it). Files are filtered by name, metadata documents are
    /// skipped and related files only included when the selector asks for them.
    pub fn new_artifact_stream(&self, selector: &ItemSelector) -> ContentResult<ArtifactStream<'_, S>> {
        let namespace = selector
            .namespace()
            .ok_or(LayoutError::MissingField("namespace"))?;
        let version = selector.version().or(selector.artifact_version().filter(|v| !v.contains('*')));
        let scope: ContentItem = match (selector.project_id(), version) {
            (Some(project_id), Some(version)) => {
                self.get_version(namespace, project_id, version)?.into()
            }
            (Some(project_id), None) => self.get_project(namespace, project_id)?.into(),
            (None, _) => self.get_namespace(namespace)?.into(),
        };
        let filter = ArtifactFilter::from_selector(selector, self.layout.mappings())?;
        Ok(ArtifactStream::new(self, filter, selector.recurse(), scope))
    }

    /// Files next to `artifact` that carry its name plus an extra extension (checksums,
    /// signatures).
    pub fn get_related_artifacts(&self, artifact: &Artifact) -> ContentResult<Vec<Arc<Artifact>>> {
        let prefix = format!("{}.", artifact.file_name());
        let mut out = Vec::new();
        for file in self.version_files(artifact.version())? {
            if !file.name().starts_with(&prefix) {
                continue;
            }
            let node = self.artifact_node(Arc::clone(artifact.version()), file)?;
            if node.kind() == depot_core::ArtifactKind::Related {
                out.push(node);
            }
        }
        Ok(out)
    }

    // ---- queries and mutation ------------------------------------------------------------

    /// True if the item addressed by `selector` is stored.
    pub fn has_content(&self, selector: &ItemSelector) -> ContentResult<bool> {
        let item = self.get_item(selector)?;
        Ok(self.storage.exists(item.path()))
    }

    /// Path of the metadata document of a project, or of one of its versions.
    pub fn metadata_path(
        &self,
        namespace: &str,
        project_id: &str,
        version: Option<&str>,
    ) -> ContentResult<AssetPath> {
        Self::asset_path(&self.layout.metadata_path(namespace, project_id, version)?)
    }

    /// Copy the local file `source` into place as `coordinate`.
    pub fn add_artifact(
        &self,
        source: &Path,
        coordinate: &ArtifactCoordinate,
    ) -> ContentResult<Arc<Artifact>> {
        let path = Self::asset_path(&self.layout.to_path(coordinate)?)?;
        self.storage
            .replace_from_file(&path, source)
            .map_err(|e| self.access_error(&path, e))?;
        if let Some(dir) = path.parent() {
            self.cache.invalidate_under(&dir);
        }
        tracing::debug!(repository = %self.id, path = %path, "artifact added");
        self.artifact_at(&path)
    }

    /// Delete an item and everything below it.
    pub fn delete_item(&self, item: &ContentItem) -> ContentResult<()> {
        let path = item.path();
        if path.is_root() {
            return Err(LayoutError::invalid_path("/", "the repository root cannot be deleted").into());
        }
        if !self.storage.exists(path) {
            return Err(self.not_found(path));
        }
        self.storage
            .delete(path)
            .map_err(|e| self.access_error(path, e))?;
        // Siblings may have been described against the deleted file.
        self.cache.invalidate_under(&path.parent().unwrap_or_else(AssetPath::root));
        tracing::info!(repository = %self.id, path = %path, "item deleted");
        Ok(())
    }

    pub fn delete_namespace(&self, namespace: &str) -> ContentResult<()> {
        let item = self.get_namespace(namespace)?.into();
        self.delete_item(&item)
    }

    pub fn delete_project(&self, namespace: &str, project_id: &str) -> ContentResult<()> {
        let item = self.get_project(namespace, project_id)?.into();
        self.delete_item(&item)
    }

    pub fn delete_version(&self, namespace: &str, project_id: &str, version: &str) -> ContentResult<()> {
        let item = self.get_version(namespace, project_id, version)?.into();
        self.delete_item(&item)
    }

    /// Delete the artifact file of `coordinate` together with its related files.
    pub fn delete_artifact(&self, coordinate: &ArtifactCoordinate) -> ContentResult<()> {
        let path = Self::asset_path(&self.layout.to_path(coordinate)?)?;
        let ContentItem::Artifact(artifact) = self.to_item(path.as_str())? else {
            return Err(LayoutError::invalid_path(path.as_str(), "not an artifact file").into());
        };
        for related in self.get_related_artifacts(&artifact)? {
            self.delete_item(&related.into())?;
        }
        self.delete_item(&artifact.into())
    }
}
