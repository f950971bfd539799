use std::sync::Arc;

use depot_proxy::{
    ChecksumStatus, FetchOutcome, FsRemote, ProxiedSource, ProxyFetcher, ProxyOptions,
    UpdatePolicy,
};
use depot_storage::{AssetPath, FsStorage, Storage};
use rstest::*;
use tempfile::TempDir;

use crate::common::{has_staging_files, temp_dir, tracing_setup, write_tree};

const JAR: &str = "com/x/lib/1.0/lib-1.0.jar";

struct Scenario {
    local: TempDir,
    _first: TempDir,
    _second: TempDir,
    fetcher: ProxyFetcher<FsStorage>,
}

#[fixture]
fn scenario(#[from(tracing_setup)] _tracing: (), temp_dir: TempDir) -> Scenario {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_tree(
        second.path(),
        &[
            (JAR, b"bytes from second"),
            ("com/x/lib/1.0/lib-1.0.pom", b"<project/>"),
        ],
    );
    let sources = vec![
        ProxiedSource::new("first", Arc::new(FsRemote::new(first.path()).unwrap()))
            .with_update_policy(UpdatePolicy::Never),
        ProxiedSource::new("second", Arc::new(FsRemote::new(second.path()).unwrap())),
    ];
    let storage = Arc::new(FsStorage::new("internal", temp_dir.path()).unwrap());
    Scenario {
        fetcher: ProxyFetcher::new(storage, sources, ProxyOptions::default()),
        local: temp_dir,
        _first: first,
        _second: second,
    }
}

#[rstest]
fn second_source_fills_the_repository(scenario: Scenario) {
    let path = AssetPath::parse(JAR).unwrap();
    let outcome = scenario.fetcher.fetch(&path).unwrap();

    let file = outcome.found().unwrap();
    assert_eq!(file.source(), Some("second"));
    assert_eq!(file.local(), scenario.local.path().join(JAR));
    assert_eq!(
        std::fs::read(scenario.local.path().join(JAR)).unwrap(),
        b"bytes from second"
    );
    assert!(!has_staging_files(scenario.local.path()));

    let first = scenario.fetcher.source("first").unwrap();
    assert!(first.failures().is_cached_failure(JAR));
    let record = first.failures().get(JAR).unwrap();
    assert_eq!(record.policy(), UpdatePolicy::Never);
    assert!(scenario.fetcher.source("second").unwrap().failures().is_empty());
}

#[rstest]
fn missing_upstream_checksums_are_reported(scenario: Scenario) {
    let path = AssetPath::parse(JAR).unwrap();
    let file = scenario.fetcher.fetch(&path).unwrap().into_found().unwrap();
    assert_eq!(file.checksums().sha1, ChecksumStatus::Missing);
    assert_eq!(file.checksums().md5, ChecksumStatus::Missing);
    assert!(!scenario.fetcher.storage().exists(&AssetPath::parse("com/x/lib/1.0/lib-1.0.jar.sha1").unwrap()));
}

#[rstest]
fn unknown_paths_are_not_found(scenario: Scenario) {
    let path = AssetPath::parse("com/x/lib/2.0/lib-2.0.jar").unwrap();
    assert_eq!(scenario.fetcher.fetch(&path).unwrap(), FetchOutcome::NotFound);
    for source in scenario.fetcher.sources() {
        assert!(source.failures().is_cached_failure("com/x/lib/2.0/lib-2.0.jar"));
    }
}
