#![forbid(unsafe_code)]

//! # depot-proxy
//!
//! Fills a local repository from remote ones.
//!
//! [`ProxyFetcher`] walks an ordered list of [`ProxiedSource`]s, each wrapping a [`Remote`]
//! transport, its update and checksum policies, path filters and a [`FailureCache`].
//! Metadata documents are fetched from every source and merged.

mod checksum;
mod error;
mod failures;
mod fetcher;
mod index;
mod options;
mod pattern;
mod policy;
mod remote;
mod source;

pub use crate::{
    checksum::{ChecksumKind, ChecksumReport, ChecksumStatus, parse_checksum},
    error::{PolicyParseError, ProxyError, ProxyResult, TransportError, TransportResult},
    failures::{FailureCache, FailureRecord},
    fetcher::{FetchOutcome, FetchedFile, ProxyFetcher},
    index::{INDEX_DIR, LastCheckedIndex},
    options::ProxyOptions,
    pattern::PathPattern,
    policy::{ChecksumPolicy, UpdatePolicy},
    remote::{FsRemote, Remote},
    source::ProxiedSource,
};
