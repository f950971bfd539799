#![forbid(unsafe_code)]

//! Default (Maven 2) repository layout.
//!
//! ```text
//! artifact: <namespace as dirs>/<projectId>/<baseVersion>/<artifactId>-<artifactVersion>[-<classifier>].<ext>
//! metadata: <namespace as dirs>/<projectId>[/<baseVersion>]/maven-metadata.xml
//! ```

use crate::{
    coordinate::{ArtifactCoordinate, validate_namespace, validate_segment},
    error::{LayoutError, LayoutResult},
    filename::{infer_kind, parse_filename, ArtifactKind},
    mapping::ArtifactMappings,
    version::{base_version, is_generic_snapshot, release_part},
};

/// Name of the per-project / per-version metadata document.
pub const METADATA_FILENAME: &str = "maven-metadata.xml";

/// Name of the metadata copy kept for a single remote repository.
#[must_use]
pub fn repository_metadata_filename(repository_id: &str) -> String {
    format!("maven-metadata-{repository_id}.xml")
}

/// Coordinate ⇄ path codec.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    mappings: ArtifactMappings,
}

impl Layout {
    pub fn new(mappings: ArtifactMappings) -> Self {
        Self { mappings }
    }

    /// Layout identifier.
    pub fn id(&self) -> &'static str {
        "default"
    }

    pub fn mappings(&self) -> &ArtifactMappings {
        &self.mappings
    }

    /// `org.apache.foo` → `org/apache/foo`.
    pub fn namespace_path(&self, namespace: &str) -> LayoutResult<String> {
        validate_namespace(namespace)?;
        Ok(namespace.replace('.', "/"))
    }

    pub fn project_path(&self, namespace: &str, project_id: &str) -> LayoutResult<String> {
        validate_segment("project id", project_id)?;
        Ok(format!("{}/{project_id}", self.namespace_path(namespace)?))
    }

    /// Directory of `version`; unique snapshots map to their generic directory.
    pub fn version_path(
        &self,
        namespace: &str,
        project_id: &str,
        version: &str,
    ) -> LayoutResult<String> {
        validate_segment("version", version)?;
        Ok(format!(
            "{}/{}",
            self.project_path(namespace, project_id)?,
            base_version(version)
        ))
    }

    /// Metadata document path, project level when `version` is `None`.
    pub fn metadata_path(
        &self,
        namespace: &str,
        project_id: &str,
        version: Option<&str>,
    ) -> LayoutResult<String> {
        let dir = match version {
            Some(v) => self.version_path(namespace, project_id, v)?,
            None => self.project_path(namespace, project_id)?,
        };
        Ok(format!("{dir}/{METADATA_FILENAME}"))
    }

    /// Extension of `coordinate`: the explicit one, else derived from its type.
    #[must_use]
    pub fn extension(&self, coordinate: &ArtifactCoordinate) -> String {
        match (coordinate.extension(), coordinate.artifact_type()) {
            (Some(ext), _) => ext.to_string(),
            (None, Some(t)) => self.mappings.extension_for_type(t),
            (None, None) => String::new(),
        }
    }

    /// Classifier of `coordinate`: the explicit one, else implied by its type.
    #[must_use]
    pub fn classifier(&self, coordinate: &ArtifactCoordinate) -> Option<String> {
        coordinate
            .classifier()
            .map(str::to_string)
            .or_else(|| {
                coordinate
                    .artifact_type()
                    .and_then(|t| self.mappings.classifier_for_type(t))
            })
    }

    /// `artifactId-artifactVersion[-classifier].extension`
    #[must_use]
    pub fn file_name(&self, coordinate: &ArtifactCoordinate) -> String {
        let mut name = format!(
            "{}-{}",
            coordinate.artifact_id(),
            coordinate.artifact_version()
        );
        if let Some(classifier) = self.classifier(coordinate) {
            name.push('-');
            name.push_str(&classifier);
        }
        name.push('.');
        name.push_str(&self.extension(coordinate));
        name
    }

    /// Relative path of `coordinate`.
    pub fn to_path(&self, coordinate: &ArtifactCoordinate) -> LayoutResult<String> {
        let dir = self.version_path(
            coordinate.namespace(),
            coordinate.project_id(),
            coordinate.version(),
        )?;
        Ok(format!("{dir}/{}", self.file_name(coordinate)))
    }

    /// Coordinate of the artifact stored at `path`.
    ///
    /// The path must have at least four segments (one namespace segment, project, version,
    /// file) and the filename must follow the artifact grammar for that project and version.
    pub fn to_coordinate(&self, path: &str) -> LayoutResult<ArtifactCoordinate> {
        let trimmed = path.trim_start_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() < 4 {
            return Err(LayoutError::invalid_path(
                path,
                "expected <namespace>/<project>/<version>/<file>",
            ));
        }
        for segment in &segments {
            validate_segment("path segment", segment)
                .map_err(|e| LayoutError::invalid_path(path, e.to_string()))?;
        }

        let n = segments.len();
        let file_name = segments[n - 1];
        let version = segments[n - 2];
        let project_id = segments[n - 3];
        let namespace = segments[..n - 3].join(".");

        let mut parsed = parse_filename(project_id, version, file_name);
        if !parsed.well_formed
            && let Some(artifact_id) = artifact_id_in(file_name, version)
            && artifact_id != project_id
        {
            parsed = parse_filename(artifact_id, version, file_name);
        }
        match infer_kind(&parsed, file_name, |_| false) {
            ArtifactKind::Main | ArtifactKind::Related => {}
            kind => {
                return Err(LayoutError::invalid_path(
                    path,
                    format!("{file_name} is not an artifact ({kind:?})"),
                ));
            }
        }

        let artifact_type = self
            .mappings
            .type_for(parsed.classifier.as_deref(), &parsed.extension);
        let mut builder = ArtifactCoordinate::builder()
            .namespace(namespace)
            .project_id(project_id)
            .artifact_id(parsed.id)
            .version(version)
            .artifact_version(parsed.version)
            .artifact_type(artifact_type)
            .extension(parsed.extension);
        if let Some(classifier) = parsed.classifier {
            builder = builder.classifier(classifier);
        }
        builder
            .build()
            .map_err(|e| LayoutError::invalid_path(path, e.to_string()))
    }
}

/// Artifact id of a file in the directory of `version` whose id differs from the project:
/// the text before the first `-<version>` followed by a classifier or extension.
fn artifact_id_in<'a>(file_name: &'a str, version: &str) -> Option<&'a str> {
    let snapshot = is_generic_snapshot(version);
    let marker = if snapshot {
        let base = release_part(version);
        if base.is_empty() {
            return None;
        }
        format!("-{base}-")
    } else {
        format!("-{version}")
    };
    file_name
        .match_indices(&marker)
        .map(|(at, _)| at)
        .find(|&at| {
            let rest = &file_name[at + marker.len()..];
            snapshot || rest.starts_with('-') || rest.starts_with('.')
        })
        .map(|at| &file_name[..at])
        .filter(|id| !id.is_empty())
}
