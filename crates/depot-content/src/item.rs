#![forbid(unsafe_code)]

//! Content tree nodes.
//!
//! Every node wraps a storage location and, except for [`Namespace`], a reference to its
//! parent. Nodes are shared through `Arc` and handed out by the repository's item cache, so two
//! lookups of the same coordinate return the same instance while the entry stays cached.

use std::sync::Arc;

use depot_core::ArtifactKind;
use depot_storage::AssetPath;

use crate::info::ArtifactInfo;

/// A dotted namespace (group), e.g. `org.apache.foo`.
#[derive(Debug, PartialEq, Eq)]
pub struct Namespace {
    namespace: String,
    path: AssetPath,
}

impl Namespace {
    pub(crate) fn new(namespace: String, path: AssetPath) -> Self {
        Self { namespace, path }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &AssetPath {
        &self.path
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Project {
    namespace: Arc<Namespace>,
    id: String,
    path: AssetPath,
}

impl Project {
    pub(crate) fn new(namespace: Arc<Namespace>, id: String, path: AssetPath) -> Self {
        Self {
            namespace,
            id,
            path,
        }
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &AssetPath {
        &self.path
    }
}

/// A version directory. `version` is always the base version.
#[derive(Debug, PartialEq, Eq)]
pub struct Version {
    project: Arc<Project>,
    version: String,
    path: AssetPath,
}

impl Version {
    pub(crate) fn new(project: Arc<Project>, version: String, path: AssetPath) -> Self {
        Self {
            project,
            version,
            path,
        }
    }

    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn path(&self) -> &AssetPath {
        &self.path
    }
}

/// A file inside a version directory.
#[derive(Debug, PartialEq, Eq)]
pub struct Artifact {
    version: Arc<Version>,
    path: AssetPath,
    info: ArtifactInfo,
}

impl Artifact {
    pub(crate) fn new(version: Arc<Version>, path: AssetPath, info: ArtifactInfo) -> Self {
        Self {
            version,
            path,
            info,
        }
    }

    pub fn version(&self) -> &Arc<Version> {
        &self.version
    }

    pub fn path(&self) -> &AssetPath {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path.name()
    }

    pub fn info(&self) -> &ArtifactInfo {
        &self.info
    }

    pub fn kind(&self) -> ArtifactKind {
        self.info.kind()
    }
}

/// Any node of the content tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentItem {
    Namespace(Arc<Namespace>),
    Project(Arc<Project>),
    Version(Arc<Version>),
    Artifact(Arc<Artifact>),
}

impl ContentItem {
    pub fn path(&self) -> &AssetPath {
        match self {
            Self::Namespace(n) => n.path(),
            Self::Project(p) => p.path(),
            Self::Version(v) => v.path(),
            Self::Artifact(a) => a.path(),
        }
    }

    pub fn as_artifact(&self) -> Option<&Arc<Artifact>> {
        match self {
            Self::Artifact(a) => Some(a),
            _ => None,
        }
    }

    /// Same underlying node (not just equal content).
    pub fn ptr_eq(&self, other: &ContentItem) -> bool {
        match (self, other) {
            (Self::Namespace(a), Self::Namespace(b)) => Arc::ptr_eq(a, b),
            (Self::Project(a), Self::Project(b)) => Arc::ptr_eq(a, b),
            (Self::Version(a), Self::Version(b)) => Arc::ptr_eq(a, b),
            (Self::Artifact(a), Self::Artifact(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Conversion between a concrete node type and [`ContentItem`], used by the item cache.
pub trait CacheItem: Sized {
    fn into_item(self: Arc<Self>) -> ContentItem;

    fn from_item(item: &ContentItem) -> Option<Arc<Self>>;
}

macro_rules! cache_item {
    ($ty:ident) => {
        impl CacheItem for $ty {
            fn into_item(self: Arc<Self>) -> ContentItem {
                ContentItem::$ty(self)
            }

            fn from_item(item: &ContentItem) -> Option<Arc<Self>> {
                match item {
                    ContentItem::$ty(inner) => Some(Arc::clone(inner)),
                    _ => None,
                }
            }
        }

        impl From<Arc<$ty>> for ContentItem {
            fn from(value: Arc<$ty>) -> Self {
                ContentItem::$ty(value)
            }
        }
    };
}

cache_item!(Namespace);
cache_item!(Project);
cache_item!(Version);
cache_item!(Artifact);
