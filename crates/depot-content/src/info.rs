#![forbid(unsafe_code)]

use depot_core::{ArtifactKind, ArtifactMappings, parse_filename, infer_kind};
use serde::Serialize;

/// What a file inside a version directory is, derived from its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    id: String,
    version: String,
    classifier: Option<String>,
    remainder: String,
    extension: String,
    artifact_type: String,
    kind: ArtifactKind,
    content_type: String,
}

impl ArtifactInfo {
    /// Describe `file_name` found in the `generic_version` directory of `artifact_id`.
    ///
    /// `sibling_exists` tells whether another file of the same directory exists; it decides
    /// related-file detection. Never fails: malformed names come back as
    /// [`ArtifactKind::Unknown`].
    pub fn describe(
        mappings: &ArtifactMappings,
        artifact_id: &str,
        generic_version: &str,
        file_name: &str,
        sibling_exists: impl Fn(&str) -> bool,
    ) -> Self {
        let parsed = parse_filename(artifact_id, generic_version, file_name);
        let kind = infer_kind(&parsed, file_name, sibling_exists);
        let artifact_type = match kind {
            ArtifactKind::Main => mappings.type_for(parsed.classifier.as_deref(), &parsed.extension),
            _ => parsed.extension.clone(),
        };
        Self {
            id: parsed.id,
            version: parsed.version,
            classifier: parsed.classifier,
            remainder: parsed.remainder,
            extension: parsed.extension,
            artifact_type,
            kind,
            content_type: content_type(file_name),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolved version; the timestamped one for unique snapshots.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Best-effort MIME type; empty when unknown.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

fn content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("mylib-2.3.1-sources.jar", ArtifactKind::Main, "java-source", Some("sources"))]
    #[case("mylib-2.3.1.pom", ArtifactKind::Main, "pom", None)]
    #[case("mylib-2.3.1.tar.gz", ArtifactKind::Main, "distribution-tgz", None)]
    #[case("mylib-2.3.1.jar.sha1", ArtifactKind::Related, "jar.sha1", None)]
    #[case("maven-metadata.xml", ArtifactKind::Metadata, "xml", None)]
    #[case("notes.txt", ArtifactKind::Unknown, "txt", None)]
    fn test_describe(
        #[case] file_name: &str,
        #[case] kind: ArtifactKind,
        #[case] artifact_type: &str,
        #[case] classifier: Option<&str>,
    ) {
        let info = ArtifactInfo::describe(
            &ArtifactMappings::default(),
            "mylib",
            "2.3.1",
            file_name,
            |n| n == "mylib-2.3.1.jar",
        );
        assert_eq!(info.kind(), kind);
        assert_eq!(info.artifact_type(), artifact_type);
        assert_eq!(info.classifier(), classifier);
    }

    #[test]
    fn content_type_is_best_effort() {
        let mappings = ArtifactMappings::default();
        let zip = ArtifactInfo::describe(&mappings, "lib", "1.0", "lib-1.0.zip", |_| false);
        assert_eq!(zip.content_type(), "application/zip");
        let odd = ArtifactInfo::describe(&mappings, "lib", "1.0", "lib-1.0.zzzunknown", |_| false);
        assert_eq!(odd.content_type(), "");
    }
}
