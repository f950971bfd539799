//! Integration tests for depot-storage

mod atomic;
#[cfg(unix)]
mod path_guard;
