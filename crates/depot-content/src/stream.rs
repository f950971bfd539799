#![forbid(unsafe_code)]

use std::{collections::VecDeque, sync::Arc, vec};

use depot_storage::{AssetPath, Storage};

use crate::{
    content::RepositoryContent,
    error::ContentResult,
    filter::ArtifactFilter,
    item::{Artifact, ContentItem, Version},
};

/// Lazy walk over the artifacts below a scope.
///
/// Directories are listed only when the walk reaches them; listing failures surface as `Err`
/// items and the walk continues with the next scope.
pub struct ArtifactStream<'a, S: Storage> {
    content: &'a RepositoryContent<S>,
    filter: ArtifactFilter,
    recurse: bool,
    pending: VecDeque<ContentItem>,
    version: Option<Arc<Version>>,
    files: vec::IntoIter<AssetPath>,
}

impl<'a, S: Storage> ArtifactStream<'a, S> {
    pub(crate) fn new(
        content: &'a RepositoryContent<S>,
        filter: ArtifactFilter,
        recurse: bool,
        scope: ContentItem,
    ) -> Self {
        Self {
            content,
            filter,
            recurse,
            pending: VecDeque::from([scope]),
            version: None,
            files: Vec::new().into_iter(),
        }
    }

    fn expand(&mut self, scope: ContentItem) -> ContentResult<()> {
        match scope {
            ContentItem::Version(version) => {
                self.files = self.content.version_files(&version)?.into_iter();
                self.version = Some(version);
            }
            ContentItem::Project(project) => {
                let versions = self.content.get_versions(&project)?;
                self.pending.extend(versions.into_iter().map(ContentItem::from));
            }
            ContentItem::Namespace(namespace) => {
                let projects = self.content.get_projects(&namespace)?;
                self.pending.extend(projects.into_iter().map(ContentItem::from));
                if self.recurse {
                    let children = self.content.get_namespaces(Some(&namespace))?;
                    self.pending.extend(children.into_iter().map(ContentItem::from));
                }
            }
            ContentItem::Artifact(_) => {}
        }
        Ok(())
    }
}

impl<S: Storage> Iterator for ArtifactStream<'_, S> {
    type Item = ContentResult<Arc<Artifact>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(version) = &self.version {
                for file in self.files.by_ref() {
                    if !self.filter.matches_name(file.name()) {
                        continue;
                    }
                    match self.content.artifact_node(Arc::clone(version), file) {
                        Ok(artifact) if self.filter.accepts_kind(artifact.kind()) => {
                            return Some(Ok(artifact));
                        }
                        Ok(_) => {}
                        Err(e) => return Some(Err(e)),
                    }
                }
                self.version = None;
            }

            let scope = self.pending.pop_front()?;
            if let Err(e) = self.expand(scope) {
                return Some(Err(e));
            }
        }
    }
}
