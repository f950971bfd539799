#![forbid(unsafe_code)]

//! # depot-core
//!
//! Artifact identity for depot: everything that can be decided from names alone, without
//! touching storage.
//!
//! ## Layout (normative)
//!
//! ```text
//! <namespace as dirs>/<projectId>/<baseVersion>/<artifactId>-<artifactVersion>[-<classifier>].<ext>
//! <namespace as dirs>/<projectId>[/<baseVersion>]/maven-metadata.xml
//! ```
//!
//! The version directory is always the base version: snapshots live under their generic
//! `…-SNAPSHOT` label, never under a timestamp.
//!
//! ## Failure model
//!
//! Constructing a coordinate or mapping a path that does not fit the layout yields a
//! [`LayoutError`]. Parsing a filename never fails; malformed names degrade to
//! [`ArtifactKind::Unknown`].

mod coordinate;
mod error;
mod filename;
mod layout;
mod mapping;
mod metadata;
mod selector;
mod version;

pub use coordinate::{ArtifactCoordinate, CoordinateBuilder};
pub use error::{LayoutError, LayoutResult, MetadataError, MetadataResult};
pub use filename::{
    ArtifactKind, ParsedFilename, infer_kind, is_repository_metadata, parse_filename,
    related_referent,
};
pub use layout::{Layout, METADATA_FILENAME, repository_metadata_filename};
pub use mapping::{ArtifactMappingProvider, ArtifactMappings, DefaultArtifactMappingProvider};
pub use metadata::{
    Plugin, Plugins, RepositoryMetadata, Snapshot, SnapshotVersionEntry, SnapshotVersions,
    Versioning, Versions,
};
pub use selector::{ItemSelector, SelectorBuilder};
pub use version::{
    SNAPSHOT, SnapshotVersion, base_version, compare_versions, is_generic_snapshot, is_snapshot,
    is_unique_snapshot, release_part,
};
