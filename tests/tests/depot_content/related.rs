use std::sync::Arc;

use depot_content::{ContentOptions, RepositoryContent};
use depot_core::{ArtifactCoordinate, ArtifactKind};
use depot_storage::FsStorage;
use rstest::*;
use tempfile::TempDir;

use crate::common::{temp_dir, write_tree};

const SHA1: &str = "com/x/lib/1.0/lib-1.0.jar.sha1";

#[rstest]
fn related_kind_follows_the_referent(temp_dir: TempDir) {
    write_tree(
        temp_dir.path(),
        &[
            ("com/x/lib/1.0/lib-1.0.pom", b"<project/>"),
            ("com/x/lib/1.0/lib-1.0.jar", b"jar"),
            (SHA1, b"0123"),
        ],
    );
    let storage = Arc::new(FsStorage::new("internal", temp_dir.path()).unwrap());
    let content = RepositoryContent::new("internal", storage, ContentOptions::new());
    assert_eq!(content.artifact_info(SHA1).unwrap().kind(), ArtifactKind::Related);

    let jar = content.to_item("com/x/lib/1.0/lib-1.0.jar").unwrap();
    content.delete_item(&jar).unwrap();
    assert_ne!(content.artifact_info(SHA1).unwrap().kind(), ArtifactKind::Related);

    let staged = TempDir::new().unwrap();
    let source = staged.path().join("lib.jar");
    std::fs::write(&source, b"jar again").unwrap();
    let coordinate = ArtifactCoordinate::builder()
        .namespace("com.x")
        .artifact_id("lib")
        .version("1.0")
        .artifact_type("jar")
        .build()
        .unwrap();
    content.add_artifact(&source, &coordinate).unwrap();
    assert_eq!(content.artifact_info(SHA1).unwrap().kind(), ArtifactKind::Related);
}

#[rstest]
fn related_artifacts_of_a_main_file(temp_dir: TempDir) {
    write_tree(
        temp_dir.path(),
        &[
            ("com/x/lib/1.0/lib-1.0.pom", b"<project/>"),
            ("com/x/lib/1.0/lib-1.0.jar", b"jar"),
            ("com/x/lib/1.0/lib-1.0.jar.md5", b"0123"),
            (SHA1, b"0123"),
            ("com/x/lib/1.0/lib-1.0.pom.sha1", b"0123"),
        ],
    );
    let storage = Arc::new(FsStorage::new("internal", temp_dir.path()).unwrap());
    let content = RepositoryContent::new("internal", storage, ContentOptions::new());

    let jar = content.to_item("com/x/lib/1.0/lib-1.0.jar").unwrap();
    let related = content
        .get_related_artifacts(jar.as_artifact().unwrap())
        .unwrap();
    let names: Vec<&str> = related.iter().map(|a| a.file_name()).collect();
    assert_eq!(names, ["lib-1.0.jar.md5", "lib-1.0.jar.sha1"]);
}
