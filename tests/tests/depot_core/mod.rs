//! Integration tests for depot-core

mod layout_round_trip;
mod metadata_merge;
