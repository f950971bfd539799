use depot::{Depot, DepotConfig, DepotError};
use depot_core::RepositoryMetadata;
use depot_proxy::{ChecksumKind, ProxyError};
use rstest::*;
use tempfile::TempDir;
use url::Url;

use crate::common::{has_staging_files, temp_dir, tracing_setup, write_tree};

const META: &str = "com/x/lib/maven-metadata.xml";

fn metadata(versions: &[&str], last_updated: &str) -> Vec<u8> {
    let versions: String = versions
        .iter()
        .map(|v| format!("<version>{v}</version>"))
        .collect();
    format!(
        "<metadata><groupId>com.x</groupId><artifactId>lib</artifactId><versioning>\
         <versions>{versions}</versions><lastUpdated>{last_updated}</lastUpdated>\
         </versioning></metadata>"
    )
    .into_bytes()
}

fn write_config(dir: &TempDir, local: &TempDir, remotes: &[(&str, &TempDir, bool)]) -> DepotConfig {
    let remotes: Vec<String> = remotes
        .iter()
        .map(|(id, root, hard_fail)| {
            let url = Url::from_directory_path(root.path()).unwrap();
            format!(r#"{{ "id": "{id}", "url": "{url}", "hard_fail": {hard_fail} }}"#)
        })
        .collect();
    let json = format!(
        r#"{{ "id": "internal", "root": {root:?}, "remotes": [{remotes}] }}"#,
        root = local.path().display().to_string(),
        remotes = remotes.join(", "),
    );
    let path = dir.path().join("depot.json");
    std::fs::write(&path, json).unwrap();
    DepotConfig::load(&path).unwrap()
}

#[rstest]
fn metadata_from_all_remotes_is_merged(#[from(tracing_setup)] _tracing: (), temp_dir: TempDir) {
    let local = TempDir::new().unwrap();
    let central = TempDir::new().unwrap();
    let mirror = TempDir::new().unwrap();
    write_tree(central.path(), &[(META, &metadata(&["1.0", "1.1"], "20230101000000"))]);
    write_tree(mirror.path(), &[(META, &metadata(&["1.1", "2.0"], "20230201000000"))]);

    let config = write_config(
        &temp_dir,
        &local,
        &[("central", &central, false), ("mirror", &mirror, false)],
    );
    let depot = Depot::new(&config).unwrap();

    let file = depot.fetch(META).unwrap().into_found().unwrap();
    let body = std::fs::read(file.local()).unwrap();
    let merged = RepositoryMetadata::from_slice(&body).unwrap();
    assert_eq!(merged.versions(), ["1.0", "1.1", "2.0"]);
    assert_eq!(merged.last_updated(), Some("20230201000000"));

    let sha1 = std::fs::read_to_string(local.path().join(format!("{META}.sha1"))).unwrap();
    assert_eq!(sha1, ChecksumKind::Sha1.compute(&body));
    assert!(local.path().join("com/x/lib/maven-metadata-central.xml").is_file());
    assert!(local.path().join("com/x/lib/maven-metadata-mirror.xml").is_file());
    assert!(!has_staging_files(local.path()));
}

#[rstest]
fn hard_failing_remote_aborts(temp_dir: TempDir) {
    let local = TempDir::new().unwrap();
    let broken = TempDir::new().unwrap();
    let mirror = TempDir::new().unwrap();
    write_tree(mirror.path(), &[("com/x/lib/1.0/lib-1.0.jar", b"jar")]);
    // A directory in place of the file is an I/O failure, not a miss.
    std::fs::create_dir_all(broken.path().join("com/x/lib/1.0/lib-1.0.jar")).unwrap();

    let config = write_config(
        &temp_dir,
        &local,
        &[("broken", &broken, true), ("mirror", &mirror, false)],
    );
    let depot = Depot::new(&config).unwrap();

    let err = depot.fetch("com/x/lib/1.0/lib-1.0.jar").unwrap_err();
    assert!(
        matches!(
            &err,
            DepotError::Proxy(ProxyError::Transport { source_id, .. }) if source_id == "broken"
        ),
        "{err:?}"
    );
    assert!(!local.path().join("com/x/lib/1.0/lib-1.0.jar").exists());
}
