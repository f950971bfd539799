use std::sync::Arc;

use depot_content::{ContentError, ContentItem, ContentOptions, RepositoryContent};
use depot_core::ItemSelector;
use depot_storage::FsStorage;
use rstest::*;
use tempfile::TempDir;

use crate::common::{temp_dir, write_tree};

struct Repo {
    _dir: TempDir,
    content: RepositoryContent<FsStorage>,
}

#[fixture]
fn repo(temp_dir: TempDir) -> Repo {
    write_tree(
        temp_dir.path(),
        &[
            ("com/x/lib/maven-metadata.xml", b"<metadata/>"),
            ("com/x/lib/1.0/lib-1.0.pom", b"<project/>"),
            ("com/x/lib/1.0/lib-1.0.jar", b"jar"),
            ("com/x/lib/1.0/lib-1.0-sources.jar", b"src"),
            ("com/x/lib/1.1/lib-1.1.pom", b"<project/>"),
            ("com/x/tools/cli/2.0/cli-2.0.pom", b"<project/>"),
            ("com/x/tools/cli/2.0/cli-2.0.jar", b"jar"),
        ],
    );
    let storage = Arc::new(FsStorage::new("internal", temp_dir.path()).unwrap());
    Repo {
        content: RepositoryContent::new("internal", storage, ContentOptions::new()),
        _dir: temp_dir,
    }
}

#[rstest]
#[case("com", "namespace")]
#[case("com/x", "namespace")]
#[case("com/x/lib", "project")]
#[case("com/x/lib/1.0", "version")]
#[case("com/x/tools", "namespace")]
#[case("com/x/tools/cli", "project")]
#[case("com/x/lib/1.0/lib-1.0.jar", "artifact")]
fn paths_are_classified(repo: Repo, #[case] path: &str, #[case] kind: &str) {
    let item = repo.content.to_item(path).unwrap();
    let actual = match item {
        ContentItem::Namespace(_) => "namespace",
        ContentItem::Project(_) => "project",
        ContentItem::Version(_) => "version",
        ContentItem::Artifact(_) => "artifact",
    };
    assert_eq!(actual, kind, "{path}");
}

#[rstest]
fn missing_items_are_not_found(repo: Repo) {
    let err = repo.content.to_item("com/x/lib/9.9").unwrap_err();
    assert!(matches!(err, ContentError::ItemNotFound { .. }), "{err:?}");
}

#[rstest]
fn tree_listing(repo: Repo) {
    let namespace = repo.content.get_namespace("com.x").unwrap();
    let projects: Vec<String> = repo
        .content
        .get_projects(&namespace)
        .unwrap()
        .iter()
        .map(|p| p.id().to_string())
        .collect();
    assert_eq!(projects, ["lib"]);

    let lib = repo.content.get_project("com.x", "lib").unwrap();
    let versions: Vec<String> = repo
        .content
        .get_versions(&lib)
        .unwrap()
        .iter()
        .map(|v| v.version().to_string())
        .collect();
    assert_eq!(versions, ["1.0", "1.1"]);
}

#[rstest]
fn recursive_stream_covers_sub_namespaces(repo: Repo) {
    let selector = ItemSelector::builder()
        .namespace("com.x")
        .extension("jar")
        .recurse(true)
        .build()
        .unwrap();
    let mut names: Vec<String> = repo
        .content
        .new_artifact_stream(&selector)
        .unwrap()
        .map(|a| a.unwrap().file_name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["cli-2.0.jar", "lib-1.0-sources.jar", "lib-1.0.jar"]);
}
