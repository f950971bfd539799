//! All integration tests for depot
#![expect(
    clippy::unwrap_used,
    reason = "integration test crate — unwraps are acceptable in test code"
)]

mod common;
mod depot;
mod depot_content;
mod depot_core;
mod depot_proxy;
mod depot_storage;
