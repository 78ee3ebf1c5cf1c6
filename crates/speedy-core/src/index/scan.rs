//! Filesystem and application discovery.

use super::IndexedEntry;
use crate::config::IndexConfig;
use crate::platform;
use speedy_types::ResultKind;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Entries are handed to the sink in batches of this size so searches can
/// see partial results while a large tree is still being walked.
const BATCH_SIZE: usize = 512;

/// Walk every configured root, then the platform application directories.
///
/// Returns the number of entries passed to `sink`.
pub fn scan(config: &IndexConfig, mut sink: impl FnMut(Vec<IndexedEntry>)) -> usize {
    let mut total = 0;

    for root in config.resolved_roots() {
        total += scan_root(&root, config.max_depth, config.include_hidden, &mut sink);
    }

    if config.include_applications {
        for dir in platform::application_dirs() {
            total += scan_applications(&dir, &mut sink);
        }
    }

    total
}

/// Walk one root up to `max_depth`. The root itself is not indexed.
pub fn scan_root(
    root: &Path,
    max_depth: usize,
    include_hidden: bool,
    sink: &mut impl FnMut(Vec<IndexedEntry>),
) -> usize {
    if !root.exists() {
        warn!("Index root does not exist: {}", root.display());
        return 0;
    }

    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut total = 0;

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| include_hidden || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let Some(indexed) = classify(&entry) else {
            continue;
        };
        batch.push(indexed);

        if batch.len() >= BATCH_SIZE {
            total += batch.len();
            sink(std::mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE)));
        }
    }

    if !batch.is_empty() {
        total += batch.len();
        sink(batch);
    }

    debug!("Indexed {} entries under {}", total, root.display());
    total
}

/// Collect application entries from one application directory.
pub fn scan_applications(dir: &Path, sink: &mut impl FnMut(Vec<IndexedEntry>)) -> usize {
    if !dir.exists() {
        return 0;
    }

    let extension = platform::application_extension();
    let apps: Vec<IndexedEntry> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(3)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| has_extension(e.path(), extension))
        .filter_map(|e| application_entry(e.path()))
        .collect();

    let count = apps.len();
    if count > 0 {
        debug!("Found {} applications in {}", count, dir.display());
        sink(apps);
    }
    count
}

fn application_entry(path: &Path) -> Option<IndexedEntry> {
    let name = if has_extension(path, "desktop") {
        let content = std::fs::read_to_string(path).ok()?;
        platform::desktop_entry_name(path, &content)?
    } else {
        path.file_stem()?.to_string_lossy().into_owned()
    };

    Some(IndexedEntry::new(
        path.to_string_lossy().into_owned(),
        name,
        ResultKind::Application,
    ))
}

fn classify(entry: &DirEntry) -> Option<IndexedEntry> {
    let file_type = entry.file_type();
    let kind = if file_type.is_dir() {
        ResultKind::Folder
    } else if file_type.is_file() {
        if has_extension(entry.path(), "exe") {
            ResultKind::Application
        } else {
            ResultKind::File
        }
    } else {
        return None;
    };

    Some(IndexedEntry::new(
        entry.path().to_string_lossy().into_owned(),
        entry.file_name().to_string_lossy().into_owned(),
        kind,
    ))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn collect(root: &Path, max_depth: usize, include_hidden: bool) -> Vec<IndexedEntry> {
        let mut all = Vec::new();
        scan_root(root, max_depth, include_hidden, &mut |batch| all.extend(batch));
        all
    }

    #[test]
    fn test_scan_root_classifies_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("reports")).unwrap();
        fs::write(dir.path().join("reports/q1.txt"), "x").unwrap();
        fs::write(dir.path().join("setup.EXE"), "x").unwrap();

        let entries = collect(dir.path(), 5, false);

        let kind_of = |name: &str| entries.iter().find(|e| e.name == name).map(|e| e.kind);
        assert_eq!(kind_of("reports"), Some(ResultKind::Folder));
        assert_eq!(kind_of("q1.txt"), Some(ResultKind::File));
        assert_eq!(kind_of("setup.EXE"), Some(ResultKind::Application));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_scan_root_respects_depth() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("a/b/c/deep.txt"), "x").unwrap();

        let entries = collect(dir.path(), 2, false);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a"));
        assert!(names.contains(&"b"));
    }

    #[test]
    fn test_scan_root_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config"), "x").unwrap();
        fs::write(dir.path().join("visible.txt"), "x").unwrap();

        let entries = collect(dir.path(), 5, false);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "visible.txt");

        let entries = collect(dir.path(), 5, true);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_scan_root_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let entries = collect(&dir.path().join("missing"), 5, false);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_scan_root_batches_large_trees() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..(BATCH_SIZE + 10) {
            fs::write(dir.path().join(format!("f{i}.txt")), "").unwrap();
        }

        let mut batches = Vec::new();
        let total = scan_root(dir.path(), 1, false, &mut |batch| batches.push(batch.len()));

        assert_eq!(total, BATCH_SIZE + 10);
        assert_eq!(batches, vec![BATCH_SIZE, 10]);
    }

    #[test]
    fn test_application_entry_from_desktop_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org.gnome.Calculator.desktop");
        fs::write(&path, "[Desktop Entry]\nType=Application\nName=Calculator\n").unwrap();

        let entry = application_entry(&path).unwrap();
        assert_eq!(entry.name, "Calculator");
        assert_eq!(entry.kind, ResultKind::Application);
    }

    #[test]
    fn test_application_entry_uses_stem_for_bundles() {
        let entry = application_entry(Path::new("/Applications/Safari.app")).unwrap();
        assert_eq!(entry.name, "Safari");
    }
}
