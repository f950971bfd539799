//! Integration tests for depot-proxy

mod failure_cache;
mod two_sources;
