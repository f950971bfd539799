use std::{os::unix::fs::symlink, sync::Arc};

use depot_content::{ContentError, ContentOptions, RepositoryContent};
use depot_storage::{AssetPath, FsStorage, Storage, StorageError};
use rstest::*;
use tempfile::TempDir;

use crate::common::{temp_dir, write_tree};

#[rstest]
fn deletes_never_leave_the_repository(temp_dir: TempDir) {
    let outside = TempDir::new().unwrap();
    write_tree(outside.path(), &[("keep/lib-1.0.jar", b"precious")]);

    let storage = Arc::new(FsStorage::new("internal", temp_dir.path()).unwrap());
    std::fs::create_dir_all(temp_dir.path().join("com/x/lib")).unwrap();
    symlink(outside.path().join("keep"), temp_dir.path().join("com/x/lib/1.0")).unwrap();

    let linked = AssetPath::parse("com/x/lib/1.0").unwrap();
    assert!(matches!(
        storage.delete(&linked),
        Err(StorageError::PathEscape { .. })
    ));

    let content = RepositoryContent::new("internal", Arc::clone(&storage), ContentOptions::new());
    let err = content.delete_version("com.x", "lib", "1.0").unwrap_err();
    assert!(matches!(err, ContentError::ContentAccess { .. }), "{err:?}");
    assert_eq!(
        std::fs::read(outside.path().join("keep/lib-1.0.jar")).unwrap(),
        b"precious"
    );
}
