use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Usage recorded for one activated path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub access_count: u32,
    /// Unix seconds of the last activation
    pub last_accessed: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsageFile {
    version: u32,
    #[serde(default)]
    entries: HashMap<String, UsageRecord>,
}

/// Activation history, persisted as JSON so ranking survives restarts.
///
/// A log without a backing file keeps records in memory only.
#[derive(Debug, Default)]
pub struct UsageLog {
    path: Option<PathBuf>,
    entries: HashMap<String, UsageRecord>,
}

impl UsageLog {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the log stored at `path`. A missing or unreadable file starts an
    /// empty log that will be written back to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let mut log = Self {
            path: Some(path.to_path_buf()),
            entries: HashMap::new(),
        };

        if !path.exists() {
            debug!("No usage log at {}", path.display());
            return Ok(log);
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<UsageFile>(&content) {
            Ok(file) => {
                info!("Loaded usage for {} paths", file.entries.len());
                log.entries = file.entries;
            }
            Err(e) => warn!(
                "Failed to parse usage log: {} (at line {}, column {})",
                e,
                e.line(),
                e.column()
            ),
        }
        Ok(log)
    }

    /// Write the log to its backing file, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be written.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = UsageFile {
            version: 1,
            entries: self.entries.clone(),
        };
        let content = serde_json::to_string(&file)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        debug!("Saved usage for {} paths", self.entries.len());
        Ok(())
    }

    /// Count one activation of `path` at `now_secs` and return the new record.
    pub fn record(&mut self, path: &str, now_secs: u64) -> UsageRecord {
        let record = self.entries.entry(path.to_string()).or_default();
        record.access_count = record.access_count.saturating_add(1);
        record.last_accessed = now_secs;
        *record
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<UsageRecord> {
        self.entries.get(path).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_and_stamps() {
        let mut log = UsageLog::in_memory();
        log.record("/a", 10);
        let record = log.record("/a", 20);

        assert_eq!(record.access_count, 2);
        assert_eq!(record.last_accessed, 20);
        assert_eq!(log.get("/a"), Some(record));
        assert_eq!(log.get("/b"), None);
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut log = UsageLog::in_memory();
        log.record("/a", 1);
        log.save().unwrap();
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = UsageLog::load(&dir.path().join("usage.json")).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("usage.json");

        let mut log = UsageLog::load(&path).unwrap();
        log.record("/home/u/notes.md", 1_700_000_000);
        log.save().unwrap();

        let reloaded = UsageLog::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get("/home/u/notes.md"),
            Some(UsageRecord {
                access_count: 1,
                last_accessed: 1_700_000_000,
            })
        );
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let log = UsageLog::load(&path).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_file_format_is_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");

        let mut log = UsageLog::load(&path).unwrap();
        log.record("/a", 5);
        log.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"accessCount\":1"));
        assert!(content.contains("\"lastAccessed\":5"));
    }
}
