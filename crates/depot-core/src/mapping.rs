#![forbid(unsafe_code)]

//! Artifact type ⇄ (classifier, extension) mapping.
//!
//! Providers are consulted in order; the first `Some` wins. When every provider declines,
//! the mapping is the identity (type == extension, no classifier).

use std::{fmt, sync::Arc};

/// A pluggable mapping between declared artifact types and file naming.
pub trait ArtifactMappingProvider: Send + Sync {
    /// File extension used for `artifact_type`.
    fn map_type_to_extension(&self, artifact_type: &str) -> Option<String>;

    /// Classifier implied by `artifact_type` (e.g. `test-jar` implies `tests`).
    fn map_type_to_classifier(&self, artifact_type: &str) -> Option<String>;

    /// Artifact type for a file carrying `classifier` and `extension`.
    fn map_classifier_and_extension_to_type(
        &self,
        classifier: Option<&str>,
        extension: &str,
    ) -> Option<String>;
}

/// Built-in mappings for the common packaging types.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultArtifactMappingProvider;

impl ArtifactMappingProvider for DefaultArtifactMappingProvider {
    fn map_type_to_extension(&self, artifact_type: &str) -> Option<String> {
        let ext = match artifact_type {
            "test-jar" | "java-source" | "ejb-client" | "javadoc" | "maven-plugin" | "ejb"
            | "aspect" => "jar",
            "distribution-tgz" => "tar.gz",
            "distribution-zip" => "zip",
            _ => return None,
        };
        Some(ext.to_string())
    }

    // Exact names only, after trimming and lowercasing.
    fn map_type_to_classifier(&self, artifact_type: &str) -> Option<String> {
        let classifier = match artifact_type.trim().to_ascii_lowercase().as_str() {
            "javadoc" => "javadoc",
            "test-jar" => "tests",
            "ejb-client" => "client",
            "java-source" => "sources",
            _ => return None,
        };
        Some(classifier.to_string())
    }

    fn map_classifier_and_extension_to_type(
        &self,
        classifier: Option<&str>,
        extension: &str,
    ) -> Option<String> {
        let artifact_type = match (classifier, extension) {
            (Some("tests"), "jar") => "test-jar",
            (Some("sources"), "jar") => "java-source",
            (Some("client"), "jar") => "ejb-client",
            (Some("javadoc"), "jar") => "javadoc",
            (_, "tar.gz") => "distribution-tgz",
            _ => return None,
        };
        Some(artifact_type.to_string())
    }
}

/// Ordered list of mapping providers.
#[derive(Clone)]
pub struct ArtifactMappings {
    providers: Vec<Arc<dyn ArtifactMappingProvider>>,
}

impl fmt::Debug for ArtifactMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactMappings")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl Default for ArtifactMappings {
    fn default() -> Self {
        Self::new(vec![Arc::new(DefaultArtifactMappingProvider)])
    }
}

impl ArtifactMappings {
    /// Mappings consulted exactly in the given order.
    pub fn new(providers: Vec<Arc<dyn ArtifactMappingProvider>>) -> Self {
        Self { providers }
    }

    /// Put `provider` in front of the existing ones.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ArtifactMappingProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    #[must_use]
    pub fn extension_for_type(&self, artifact_type: &str) -> String {
        self.providers
            .iter()
            .find_map(|p| p.map_type_to_extension(artifact_type))
            .unwrap_or_else(|| artifact_type.to_string())
    }

    #[must_use]
    pub fn classifier_for_type(&self, artifact_type: &str) -> Option<String> {
        self.providers
            .iter()
            .find_map(|p| p.map_type_to_classifier(artifact_type))
    }

    #[must_use]
    pub fn type_for(&self, classifier: Option<&str>, extension: &str) -> String {
        self.providers
            .iter()
            .find_map(|p| p.map_classifier_and_extension_to_type(classifier, extension))
            .unwrap_or_else(|| extension.to_string())
    }
}
