use std::sync::Arc;

use depot_content::{ContentOptions, RepositoryContent};
use depot_core::ItemSelector;
use depot_storage::FsStorage;
use rstest::*;
use tempfile::TempDir;

use crate::common::{temp_dir, write_tree};

fn content(dir: &TempDir) -> RepositoryContent<FsStorage> {
    let storage = Arc::new(FsStorage::new("internal", dir.path()).unwrap());
    RepositoryContent::new("internal", storage, ContentOptions::new())
}

fn snapshot_selector() -> ItemSelector {
    ItemSelector::builder()
        .namespace("com.x")
        .artifact_id("lib")
        .version("1.0-SNAPSHOT")
        .build()
        .unwrap()
}

#[rstest]
fn newest_unique_snapshot_is_selected(temp_dir: TempDir) {
    write_tree(
        temp_dir.path(),
        &[
            ("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230101.120000-3.jar", b"a"),
            ("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230102.080000-1.jar", b"b"),
            ("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230101.120000-3.pom", b"p"),
        ],
    );
    let content = content(&temp_dir);

    let artifact = content.get_artifact(&snapshot_selector()).unwrap();
    assert_eq!(artifact.file_name(), "lib-1.0-20230102.080000-1.jar");
    assert_eq!(artifact.info().version(), "1.0-20230102.080000-1");
}

#[rstest]
fn resolution_is_deterministic(temp_dir: TempDir) {
    write_tree(
        temp_dir.path(),
        &[
            ("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230102.080000-2.jar", b"a"),
            ("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230102.080000-10.jar", b"b"),
            ("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230102.080000-9.jar", b"c"),
        ],
    );

    for _ in 0..3 {
        let fresh = content(&temp_dir);
        let artifact = fresh.get_artifact(&snapshot_selector()).unwrap();
        assert_eq!(artifact.file_name(), "lib-1.0-20230102.080000-10.jar");
    }
}

#[rstest]
fn explicit_artifact_version_is_kept(temp_dir: TempDir) {
    write_tree(
        temp_dir.path(),
        &[("com/x/lib/1.0-SNAPSHOT/lib-1.0-20230102.080000-1.jar", b"b")],
    );
    let selector = ItemSelector::builder()
        .namespace("com.x")
        .artifact_id("lib")
        .version("1.0-SNAPSHOT")
        .artifact_version("1.0-20230101.120000-3")
        .build()
        .unwrap();

    let artifact = content(&temp_dir).get_artifact(&selector).unwrap();
    assert_eq!(artifact.file_name(), "lib-1.0-20230101.120000-3.jar");
}
