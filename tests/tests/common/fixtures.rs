use std::path::{Path, PathBuf};

use rstest::*;
use tempfile::TempDir;

/// Common fixture for temporary directory
#[fixture]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Fixture returning both TempDir and PathBuf
#[fixture]
pub fn temp_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().to_path_buf();
    (dir, path)
}

#[fixture]
pub fn tracing_setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Write `files` below `root`, creating directories as needed.
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (path, data) in files {
        let target = root.join(path);
        std::fs::create_dir_all(target.parent().expect("file has a parent"))
            .expect("Failed to create directories");
        std::fs::write(&target, data).expect("Failed to write fixture file");
    }
}

/// True if any `*.tmp` file is left anywhere below `dir`.
pub fn has_staging_files(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|entries| {
        entries.flatten().any(|entry| {
            let path = entry.path();
            path.extension().is_some_and(|ext| ext == "tmp")
                || (path.is_dir() && has_staging_files(&path))
        })
    })
}
