//! Test fixtures and helpers

use crate::config::IndexConfig;
use crate::index::IndexedEntry;
use speedy_types::ResultKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Index config that only walks `root` and skips application directories.
pub fn config_for(root: &Path) -> IndexConfig {
    IndexConfig {
        roots: vec![root.to_string_lossy().into_owned()],
        include_applications: false,
        ..IndexConfig::default()
    }
}

pub fn file_entry(path: &str, name: &str) -> IndexedEntry {
    IndexedEntry::new(path, name, ResultKind::File)
}

pub fn folder_entry(path: &str, name: &str) -> IndexedEntry {
    IndexedEntry::new(path, name, ResultKind::Folder)
}

pub fn app_entry(path: &str, name: &str) -> IndexedEntry {
    IndexedEntry::new(path, name, ResultKind::Application)
}

/// A small home-like tree:
///
/// ```text
/// Documents/report-2024.pdf
/// Documents/reports/
/// Documents/reports/q1.txt
/// Music/
/// tools/reporter.exe
/// .cache/report.tmp
/// ```
pub fn sample_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("Documents/reports")).unwrap();
    fs::create_dir_all(root.join("Music")).unwrap();
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::write(root.join("Documents/report-2024.pdf"), "pdf").unwrap();
    fs::write(root.join("Documents/reports/q1.txt"), "q1").unwrap();
    fs::write(root.join("tools/reporter.exe"), "bin").unwrap();
    fs::write(root.join(".cache/report.tmp"), "tmp").unwrap();
    dir
}
