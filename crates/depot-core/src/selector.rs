#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::{
    coordinate::{ArtifactCoordinate, validate_namespace, validate_segment},
    error::LayoutResult,
};

/// A structured query addressing repository content without knowing exact filenames.
///
/// Any field may be absent; which fields are present decides what kind of item a
/// selector denotes (see `depot-content`). `artifact_version` may contain `*` globs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemSelector {
    namespace: Option<String>,
    project_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    artifact_version: Option<String>,
    classifier: Option<String>,
    artifact_type: Option<String>,
    extension: Option<String>,
    include_related: bool,
    recurse: bool,
}

impl ItemSelector {
    pub fn builder() -> SelectorBuilder {
        SelectorBuilder::default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn artifact_version(&self) -> Option<&str> {
        self.artifact_version.as_deref()
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn artifact_type(&self) -> Option<&str> {
        self.artifact_type.as_deref()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn include_related(&self) -> bool {
        self.include_related
    }

    pub fn recurse(&self) -> bool {
        self.recurse
    }

    pub fn has_namespace(&self) -> bool {
        self.namespace.is_some()
    }

    pub fn has_project_id(&self) -> bool {
        self.project_id.is_some()
    }

    pub fn has_artifact_id(&self) -> bool {
        self.artifact_id.is_some()
    }

    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }

    pub fn has_artifact_version(&self) -> bool {
        self.artifact_version.is_some()
    }

    /// True if any artifact-level filter (id, version, classifier, type, extension) is set.
    pub fn has_artifact_filter(&self) -> bool {
        self.artifact_id.is_some()
            || self.artifact_version.is_some()
            || self.classifier.is_some()
            || self.artifact_type.is_some()
            || self.extension.is_some()
    }
}

impl From<&ArtifactCoordinate> for ItemSelector {
    fn from(c: &ArtifactCoordinate) -> Self {
        Self {
            namespace: Some(c.namespace().to_string()),
            project_id: Some(c.project_id().to_string()),
            artifact_id: Some(c.artifact_id().to_string()),
            version: Some(c.version().to_string()),
            artifact_version: Some(c.artifact_version().to_string()),
            classifier: c.classifier().map(str::to_string),
            artifact_type: c.artifact_type().map(str::to_string),
            extension: c.extension().map(str::to_string),
            include_related: false,
            recurse: false,
        }
    }
}

/// Validating builder for [`ItemSelector`].
#[derive(Clone, Debug, Default)]
pub struct SelectorBuilder {
    inner: ItemSelector,
}

macro_rules! setter {
    ($name:ident) => {
        #[must_use]
        pub fn $name<S: Into<String>>(mut self, value: S) -> Self {
            let value = value.into();
            self.inner.$name = (!value.trim().is_empty()).then(|| value.trim().to_string());
            self
        }
    };
}

impl SelectorBuilder {
    setter!(namespace);
    setter!(project_id);
    setter!(artifact_id);
    setter!(version);
    setter!(artifact_version);
    setter!(classifier);
    setter!(artifact_type);
    setter!(extension);

    #[must_use]
    pub fn include_related(mut self, include_related: bool) -> Self {
        self.inner.include_related = include_related;
        self
    }

    #[must_use]
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.inner.recurse = recurse;
        self
    }

    /// Validate segments and derive `project_id` from `artifact_id` when absent.
    pub fn build(self) -> LayoutResult<ItemSelector> {
        let mut s = self.inner;
        if let Some(ns) = &s.namespace {
            validate_namespace(ns)?;
        }
        if s.project_id.is_none() {
            s.project_id = s.artifact_id.clone();
        }
        let segments = [
            ("project id", &s.project_id),
            ("artifact id", &s.artifact_id),
            ("version", &s.version),
            ("artifact version", &s.artifact_version),
            ("classifier", &s.classifier),
            ("extension", &s.extension),
        ];
        for (field, value) in segments {
            if let Some(v) = value {
                validate_segment(field, v)?;
            }
        }
        Ok(s)
    }
}
