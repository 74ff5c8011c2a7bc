use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary site directory
pub fn create_test_site() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test markdown file, and any missing parent directories, inside the site
pub fn create_test_file(site: &TempDir, relative: &str, content: &str) -> PathBuf {
    let file_path = site.path().join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
