#![forbid(unsafe_code)]

//! Decomposition of artifact filenames inside a version directory.
//!
//! The expected grammar is `<id>-<version>[-<classifier>].<ext>[.<ext>…]`.
//! The parser never fails: names that do not follow the grammar are split on a best-effort
//! basis and flagged as not well formed, which maps to [`ArtifactKind::Unknown`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    layout::METADATA_FILENAME,
    version::{is_generic_snapshot, release_part},
};

static CLASSIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([^.]+)(\..*)$").expect("classifier pattern is valid"));

static SNAPSHOT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(SNAPSHOT|\d{8}\.\d{6}-\d+)(.*)$").expect("snapshot token pattern is valid")
});

static COMMON_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(jar|war|ear|dar|tar|zip|pom|xml)$").expect("extension pattern is valid")
});

static REPOSITORY_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^maven-metadata-[A-Za-z0-9_.-]+\.xml$")
        .expect("repository metadata pattern is valid")
});

/// What a file in a version directory is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// A primary artifact file (jar, pom, sources, …).
    Main,
    /// `maven-metadata.xml`.
    Metadata,
    /// A per-remote metadata copy, `maven-metadata-<repositoryId>.xml`.
    RepositoryMetadata,
    /// A sibling of another file carrying an extra extension (checksum, signature).
    Related,
    /// The name did not follow the artifact grammar.
    Unknown,
}

/// Result of splitting a filename against an expected id and generic version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFilename {
    pub id: String,
    /// Resolved version (the timestamped one for unique snapshots). Empty when unknown.
    pub version: String,
    pub classifier: Option<String>,
    /// Everything after `id-version[-classifier]`, starting with `.` for well formed names.
    pub remainder: String,
    /// Extension without the leading dot. Compound for well formed names (`tar.gz`, `jar.sha1`).
    pub extension: String,
    pub well_formed: bool,
}

impl ParsedFilename {
    fn unknown(id: String, version: String, remainder: String, file_name: &str) -> Self {
        Self {
            id,
            version,
            classifier: None,
            remainder,
            extension: last_extension(file_name).to_string(),
            well_formed: false,
        }
    }
}

fn last_extension(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Split `postfix` (text following `id-version`) into classifier and remainder.
fn split_classifier(postfix: &str) -> (Option<String>, String) {
    match CLASSIFIER.captures(postfix) {
        Some(caps) => (Some(caps[1].to_string()), caps[2].to_string()),
        None => (None, postfix.to_string()),
    }
}

/// True when `text` is `.` followed by an extension, which starts with a letter.
fn starts_extension(text: &str) -> bool {
    text.strip_prefix('.')
        .is_some_and(|ext| ext.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn well_formed(id: &str, version: String, postfix: &str) -> ParsedFilename {
    let (classifier, remainder) = split_classifier(postfix);
    let extension = remainder.strip_prefix('.').unwrap_or(&remainder).to_string();
    ParsedFilename {
        id: id.to_string(),
        version,
        classifier,
        well_formed: starts_extension(&remainder),
        remainder,
        extension,
    }
}

/// Best-effort id when the expected prefix is missing: everything before `-<version>`.
fn guess_id(file_name: &str, version: &str) -> String {
    match file_name.split_once(&format!("-{version}")) {
        Some((id, _)) if !version.is_empty() => id.to_string(),
        _ => file_name.to_string(),
    }
}

/// Strip trailing common extensions from a guessed version (`1.1.jar` → `1.1`).
fn strip_common_extensions(mut guess: &str) -> &str {
    while let Some((head, ext)) = guess.rsplit_once('.') {
        if !COMMON_EXTENSION.is_match(&ext.to_ascii_lowercase()) {
            break;
        }
        guess = head;
    }
    guess
}

/// Parse `file_name` found in the directory of `generic_version` of `artifact_id`.
#[must_use]
pub fn parse_filename(artifact_id: &str, generic_version: &str, file_name: &str) -> ParsedFilename {
    if is_generic_snapshot(generic_version) {
        parse_snapshot(artifact_id, generic_version, file_name)
    } else {
        parse_release(artifact_id, generic_version, file_name)
    }
}

fn parse_snapshot(artifact_id: &str, generic_version: &str, file_name: &str) -> ParsedFilename {
    let base = release_part(generic_version);
    let prefix = if base.is_empty() {
        format!("{artifact_id}-")
    } else {
        format!("{artifact_id}-{base}-")
    };

    let Some(version_postfix) = file_name.strip_prefix(&prefix) else {
        tracing::trace!(file_name, "name does not start with the snapshot prefix");
        let remainder = file_name
            .rfind('.')
            .map_or_else(String::new, |i| file_name[i..].to_string());
        return ParsedFilename::unknown(
            guess_id(file_name, base),
            String::new(),
            remainder,
            file_name,
        );
    };

    match SNAPSHOT_TOKEN.captures(version_postfix) {
        Some(caps) => {
            let token = &caps[1];
            let version = if base.is_empty() {
                token.to_string()
            } else {
                format!("{base}-{token}")
            };
            well_formed(artifact_id, version, &caps[2])
        }
        None => {
            tracing::trace!(file_name, "name does not carry a snapshot token");
            let guess = strip_common_extensions(version_postfix);
            let version = if base.is_empty() {
                guess.to_string()
            } else {
                format!("{base}-{guess}")
            };
            ParsedFilename::unknown(
                artifact_id.to_string(),
                version,
                version_postfix.to_string(),
                file_name,
            )
        }
    }
}

fn parse_release(artifact_id: &str, version: &str, file_name: &str) -> ParsedFilename {
    let prefix = format!("{artifact_id}-{version}");
    if let Some(postfix) = file_name.strip_prefix(&prefix)
        && (postfix.starts_with('-') || starts_extension(postfix))
    {
        return well_formed(artifact_id, version.to_string(), postfix);
    }

    if let Some(postfix) = file_name.strip_prefix(&format!("{artifact_id}-")) {
        tracing::trace!(file_name, version, "name carries a different version");
        let guess = strip_common_extensions(postfix);
        let remainder = postfix[guess.len()..].to_string();
        return ParsedFilename::unknown(
            artifact_id.to_string(),
            guess.to_string(),
            remainder,
            file_name,
        );
    }

    tracing::trace!(file_name, "name does not match the artifact grammar");
    let remainder = file_name
        .rfind('.')
        .map_or_else(String::new, |i| file_name[i..].to_string());
    ParsedFilename::unknown(guess_id(file_name, version), String::new(), remainder, file_name)
}

/// True for per-remote metadata copies (`maven-metadata-<repositoryId>.xml`).
#[must_use]
pub fn is_repository_metadata(file_name: &str) -> bool {
    REPOSITORY_METADATA.is_match(file_name)
}

/// Name of the file a related file refers to (the name minus its final extension).
#[must_use]
pub fn related_referent(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(head, _)| head).filter(|h| !h.is_empty())
}

/// Decide the [`ArtifactKind`] of `file_name`.
///
/// `sibling_exists` answers whether a file with the given name exists in the same directory.
pub fn infer_kind(
    parsed: &ParsedFilename,
    file_name: &str,
    sibling_exists: impl Fn(&str) -> bool,
) -> ArtifactKind {
    if file_name == METADATA_FILENAME {
        return ArtifactKind::Metadata;
    }
    if is_repository_metadata(file_name) {
        return ArtifactKind::RepositoryMetadata;
    }

    let referent = related_referent(file_name);
    if !parsed.well_formed {
        // Checksums of metadata documents sit next to them without following the grammar.
        return match referent {
            Some(r)
                if (r == METADATA_FILENAME || is_repository_metadata(r)) && sibling_exists(r) =>
            {
                ArtifactKind::Related
            }
            _ => ArtifactKind::Unknown,
        };
    }

    if parsed.remainder.matches('.').count() >= 2
        && let Some(r) = referent
        && sibling_exists(r)
    {
        return ArtifactKind::Related;
    }
    ArtifactKind::Main
}
