#![forbid(unsafe_code)]

//! # Depot
//!
//! Facade crate for a Maven-layout artifact repository that proxies remote repositories.
//!
//! ## Quick start
//!
//! ```ignore
//! use depot::prelude::*;
//!
//! let config = DepotConfig::load("/etc/depot/internal.json")?;
//! let depot = Depot::new(&config)?;
//!
//! let selector = ItemSelector::builder()
//!     .namespace("com.example")
//!     .artifact_id("lib")
//!     .version("1.0-SNAPSHOT")
//!     .build()?;
//! if let Some(artifact) = depot.fetch_artifact(&selector)? {
//!     println!("{}", artifact.path());
//! }
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod core {
    pub use depot_core::*;
}

pub mod storage {
    pub use depot_storage::*;
}

pub mod content {
    pub use depot_content::*;
}

pub mod proxy {
    pub use depot_proxy::*;
}

// ── Depot ───────────────────────────────────────────────────────────────

mod config;
mod error;
mod repository;

pub use config::{DepotConfig, RemoteConfig};
pub use error::{DepotError, DepotResult};
pub use repository::Depot;

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use depot_content::{Artifact, ArtifactInfo, ContentItem, RepositoryContent};
    pub use depot_core::{ArtifactCoordinate, ArtifactKind, ItemSelector, Layout};
    pub use depot_proxy::{ChecksumPolicy, FetchOutcome, FetchedFile, UpdatePolicy};
    pub use depot_storage::AssetPath;

    pub use crate::{Depot, DepotConfig, DepotError, DepotResult, RemoteConfig};
}
