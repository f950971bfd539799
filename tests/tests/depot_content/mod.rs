//! Integration tests for depot-content

mod navigation;
mod related;
mod snapshots;
