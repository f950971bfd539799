use std::{sync::Arc, thread, time::Duration};

use depot_storage::{AssetPath, FsStorage, Storage};
use rstest::*;
use tempfile::TempDir;

use crate::common::{has_staging_files, temp_dir};

#[rstest]
#[timeout(Duration::from_secs(10))]
fn concurrent_writers_leave_one_complete_file(temp_dir: TempDir) {
    let storage = Arc::new(FsStorage::new("internal", temp_dir.path()).unwrap());
    let path = AssetPath::parse("com/x/lib/1.0/lib-1.0.jar").unwrap();

    let writers: Vec<_> = (0u8..8)
        .map(|i| {
            let storage = Arc::clone(&storage);
            let path = path.clone();
            thread::spawn(move || storage.write_atomic(&path, &[i; 4096]).unwrap())
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let data = storage.read(&path).unwrap();
    assert_eq!(data.len(), 4096);
    assert!(data.iter().all(|b| *b == data[0]));
    assert!(!has_staging_files(temp_dir.path()));
}

#[rstest]
#[case("com/x/lib", &["1.0", "1.1", "maven-metadata.xml"])]
#[case("com/x/lib/1.0", &["lib-1.0.jar", "lib-1.0.pom"])]
fn listings_are_sorted(temp_dir: TempDir, #[case] dir: &str, #[case] expected: &[&str]) {
    let storage = FsStorage::new("internal", temp_dir.path()).unwrap();
    for file in [
        "com/x/lib/1.1/lib-1.1.pom",
        "com/x/lib/maven-metadata.xml",
        "com/x/lib/1.0/lib-1.0.pom",
        "com/x/lib/1.0/lib-1.0.jar",
    ] {
        storage
            .write_atomic(&AssetPath::parse(file).unwrap(), b"x")
            .unwrap();
    }

    let names: Vec<String> = storage
        .list(&AssetPath::parse(dir).unwrap())
        .unwrap()
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(names, expected);
}
