#![forbid(unsafe_code)]

//! # depot-content
//!
//! Content tree of a managed repository: Namespace → Project → Version → Artifact over a
//! [`Storage`](depot_storage::Storage) backend.
//!
//! ## Public contract
//!
//! [`RepositoryContent`] is the entry point. It resolves selectors and paths to
//! [`ContentItem`]s, lists and streams artifacts, and adds or deletes content.
//!
//! ## Identity
//!
//! Nodes are memoized per repository in an [`ItemCache`]; two lookups of the same coordinate
//! return the same `Arc` while the entry is cached. Eviction is transparent.

mod cache;
mod content;
mod error;
mod filter;
mod info;
mod item;
mod options;
mod resolver;
mod stream;

pub use cache::{CacheKey, CachePolicy, ItemCache};
pub use content::RepositoryContent;
pub use error::{ContentError, ContentResult};
pub use filter::ArtifactFilter;
pub use info::ArtifactInfo;
pub use item::{Artifact, CacheItem, ContentItem, Namespace, Project, Version};
pub use options::ContentOptions;
pub use resolver::SnapshotResolver;
pub use stream::ArtifactStream;
