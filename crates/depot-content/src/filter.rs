#![forbid(unsafe_code)]

//! Filename filter built from a selector.

use depot_core::{
    ArtifactKind, ArtifactMappings, ItemSelector, LayoutError, LayoutResult, is_generic_snapshot,
    release_part,
};
use regex::Regex;

const ID_CHARS: &str = r"[A-Za-z0-9_\-.]";
const ANY_CLASSIFIER: &str = r"(-[A-Za-z0-9._]+)?";
const ANY_EXTENSION: &str = r"(tar\.gz|tar\.bz2|[A-Za-z][A-Za-z0-9]*)";
const RELATED_SUFFIX: &str = r"(\.[A-Za-z0-9]+)?";
const SNAPSHOT_TOKEN: &str = r"(SNAPSHOT|\d{8}\.\d{6}-\d+)";

/// Decides which files of a version directory a selector addresses.
#[derive(Clone, Debug)]
pub struct ArtifactFilter {
    pattern: Option<Regex>,
    include_related: bool,
}

impl ArtifactFilter {
    pub fn from_selector(selector: &ItemSelector, mappings: &ArtifactMappings) -> LayoutResult<Self> {
        let pattern = if selector.has_artifact_filter() {
            Some(build_pattern(selector, mappings)?)
        } else {
            None
        };
        Ok(Self {
            pattern,
            include_related: selector.include_related(),
        })
    }

    pub fn matches_name(&self, file_name: &str) -> bool {
        self.pattern.as_ref().is_none_or(|p| p.is_match(file_name))
    }

    /// Metadata documents never pass; related files only when asked for.
    pub fn accepts_kind(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Metadata | ArtifactKind::RepositoryMetadata => false,
            ArtifactKind::Related => self.include_related,
            ArtifactKind::Main | ArtifactKind::Unknown => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}

/// `1.0-*` → escaped `1.0-` followed by a run of id characters.
fn glob_to_regex(glob: &str) -> String {
    glob.split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(&format!("{ID_CHARS}*"))
}

fn build_pattern(selector: &ItemSelector, mappings: &ArtifactMappings) -> LayoutResult<Regex> {
    let mut pattern = String::from("^");

    match selector.artifact_id() {
        Some(id) => pattern.push_str(&glob_to_regex(id)),
        None => {
            pattern.push_str(ID_CHARS);
            pattern.push('+');
        }
    }
    pattern.push('-');

    match (selector.artifact_version(), selector.version()) {
        (Some(artifact_version), _) => pattern.push_str(&glob_to_regex(artifact_version)),
        (None, Some(version)) if is_generic_snapshot(version) => {
            let base = release_part(version);
            if !base.is_empty() {
                pattern.push_str(&regex::escape(base));
                pattern.push('-');
            }
            pattern.push_str(SNAPSHOT_TOKEN);
        }
        (None, Some(version)) => pattern.push_str(&regex::escape(version)),
        (None, None) => {
            pattern.push_str(ID_CHARS);
            pattern.push('+');
        }
    }

    let implied = selector
        .artifact_type()
        .and_then(|t| mappings.classifier_for_type(t));
    match (selector.classifier(), implied) {
        (Some("*"), _) => pattern.push_str(ANY_CLASSIFIER),
        (Some(classifier), _) => {
            pattern.push('-');
            pattern.push_str(&regex::escape(classifier));
        }
        (None, Some(classifier)) => {
            pattern.push('-');
            pattern.push_str(&regex::escape(&classifier));
        }
        (None, None) if selector.artifact_type().is_none() => pattern.push_str(ANY_CLASSIFIER),
        (None, None) => {}
    }

    pattern.push_str(r"\.");
    match (selector.extension(), selector.artifact_type()) {
        (Some("*"), _) | (None, None) => pattern.push_str(ANY_EXTENSION),
        (Some(extension), _) => pattern.push_str(&regex::escape(extension)),
        (None, Some(artifact_type)) => {
            pattern.push_str(&regex::escape(&mappings.extension_for_type(artifact_type)));
        }
    }

    if selector.include_related() {
        pattern.push_str(RELATED_SUFFIX);
    }
    pattern.push('$');

    tracing::trace!(pattern, "artifact filter");
    Regex::new(&pattern).map_err(|e| LayoutError::InvalidSegment {
        field: "selector",
        value: e.to_string(),
    })
}
