#![forbid(unsafe_code)]

//! `depot-storage`
//!
//! Storage backends for depot repositories.
//!
//! Repositories are addressed by [`AssetPath`]s relative to a backend root. [`FsStorage`]
//! maps them onto a directory and provides:
//! - sorted listings,
//! - crash-safe writes (uniquely named `<name>.<random>.tmp` staging file, then rename),
//! - deletes guarded against resolving outside of the root.

mod backend;
mod error;
mod fs;
mod path;

pub use backend::Storage;
pub use error::{StorageError, StorageResult};
pub use fs::FsStorage;
pub use path::AssetPath;
