#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::{
    error::{LayoutError, LayoutResult},
    version::{base_version, is_snapshot},
};

/// A fully addressed artifact.
///
/// Built through [`ArtifactCoordinate::builder`], which validates every field once.
/// Values are immutable; derived coordinates are produced with the `with_*` methods.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    namespace: String,
    project_id: String,
    artifact_id: String,
    version: String,
    artifact_version: String,
    classifier: Option<String>,
    artifact_type: Option<String>,
    extension: Option<String>,
}

impl ArtifactCoordinate {
    pub fn builder() -> CoordinateBuilder {
        CoordinateBuilder::default()
    }

    /// Dot separated namespace (group), e.g. `org.apache.foo`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Generic (directory) version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Concrete version embedded in the filename.
    pub fn artifact_version(&self) -> &str {
        &self.artifact_version
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

    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        is_snapshot(&self.version)
    }

    /// Same coordinate with a resolved concrete version.
    pub fn with_artifact_version<V: Into<String>>(&self, artifact_version: V) -> LayoutResult<Self> {
        let artifact_version = artifact_version.into();
        validate_segment("artifact version", &artifact_version)?;
        check_versions(&self.version, &artifact_version)?;
        Ok(Self {
            artifact_version,
            ..self.clone()
        })
    }
}

/// Validating builder for [`ArtifactCoordinate`].
#[derive(Clone, Debug, Default)]
pub struct CoordinateBuilder {
    namespace: Option<String>,
    project_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    artifact_version: Option<String>,
    classifier: Option<String>,
    artifact_type: Option<String>,
    extension: Option<String>,
}

impl CoordinateBuilder {
    #[must_use]
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn project_id<S: Into<String>>(mut self, project_id: S) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn artifact_id<S: Into<String>>(mut self, artifact_id: S) -> Self {
        self.artifact_id = Some(artifact_id.into());
        self
    }

    #[must_use]
    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn artifact_version<S: Into<String>>(mut self, artifact_version: S) -> Self {
        self.artifact_version = Some(artifact_version.into());
        self
    }

    #[must_use]
    pub fn classifier<S: Into<String>>(mut self, classifier: S) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    #[must_use]
    pub fn artifact_type<S: Into<String>>(mut self, artifact_type: S) -> Self {
        self.artifact_type = Some(artifact_type.into());
        self
    }

    #[must_use]
    pub fn extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Validate and build.
    ///
    /// - `artifact_id` defaults to `project_id` and vice versa;
    /// - `version` defaults to the base version of `artifact_version` and vice versa;
    /// - at least one of `artifact_type` / `extension` is required.
    pub fn build(self) -> LayoutResult<ArtifactCoordinate> {
        let namespace = non_empty(self.namespace).ok_or(LayoutError::MissingField("namespace"))?;
        validate_namespace(&namespace)?;

        let project_id = non_empty(self.project_id);
        let artifact_id = non_empty(self.artifact_id);
        let (project_id, artifact_id) = match (project_id, artifact_id) {
            (Some(p), Some(a)) => (p, a),
            (Some(p), None) => (p.clone(), p),
            (None, Some(a)) => (a.clone(), a),
            (None, None) => return Err(LayoutError::MissingField("artifact id")),
        };
        validate_segment("project id", &project_id)?;
        validate_segment("artifact id", &artifact_id)?;

        let version = non_empty(self.version);
        let artifact_version = non_empty(self.artifact_version);
        let (version, artifact_version) = match (version, artifact_version) {
            (Some(v), Some(av)) => (base_version(&v), av),
            (Some(v), None) => (base_version(&v), v),
            (None, Some(av)) => (base_version(&av), av),
            (None, None) => return Err(LayoutError::MissingField("version")),
        };
        validate_segment("version", &version)?;
        validate_segment("artifact version", &artifact_version)?;
        check_versions(&version, &artifact_version)?;

        let classifier = non_empty(self.classifier);
        if let Some(c) = &classifier {
            validate_segment("classifier", c)?;
        }
        let artifact_type = non_empty(self.artifact_type);
        let extension = non_empty(self.extension);
        if artifact_type.is_none() && extension.is_none() {
            return Err(LayoutError::MissingField("type"));
        }
        if let Some(ext) = &extension {
            validate_segment("extension", ext)?;
        }

        Ok(ArtifactCoordinate {
            namespace,
            project_id,
            artifact_id,
            version,
            artifact_version,
            classifier,
            artifact_type,
            extension,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_versions(version: &str, artifact_version: &str) -> LayoutResult<()> {
    if base_version(artifact_version) != base_version(version) {
        return Err(LayoutError::VersionMismatch {
            version: version.to_string(),
            artifact_version: artifact_version.to_string(),
        });
    }
    Ok(())
}

/// A single path segment: non-empty, no separators, not `.` or `..`.
pub(crate) fn validate_segment(field: &'static str, value: &str) -> LayoutResult<()> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.chars().any(char::is_control);
    if bad {
        return Err(LayoutError::InvalidSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_namespace(namespace: &str) -> LayoutResult<()> {
    if namespace.split('.').any(str::is_empty) {
        return Err(LayoutError::InvalidSegment {
            field: "namespace",
            value: namespace.to_string(),
        });
    }
    namespace
        .split('.')
        .try_for_each(|segment| validate_segment("namespace", segment))
}
