//! Integration tests for the depot facade

mod config_file;
