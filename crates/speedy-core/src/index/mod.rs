//! Default search engine: an in-memory index of files, folders and
//! applications.

mod cache;
mod scan;
mod store;
mod usage;

pub use cache::QueryCache;
pub use scan::{scan, scan_applications, scan_root};
pub use store::IndexStore;
pub use usage::{UsageLog, UsageRecord};

use crate::config::IndexConfig;
use crate::engine::{BoxFuture, SearchEngine};
use crate::{Error, Result};
use futures_util::FutureExt;
use speedy_types::{ResultKind, SearchResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// A single indexed path with usage data.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    pub path: String,
    pub name: String,
    pub kind: ResultKind,
    pub access_count: u32,
    /// Unix seconds of the last activation, 0 if never activated
    pub last_accessed: u64,
}

impl IndexedEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: ResultKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            access_count: 0,
            last_accessed: 0,
        }
    }

    #[must_use]
    pub fn to_result(&self) -> SearchResult {
        SearchResult::new(self.path.clone(), self.name.clone(), self.kind)
    }

    fn apply_usage(&mut self, usage: UsageRecord) {
        self.access_count = usage.access_count;
        self.last_accessed = usage.last_accessed;
    }
}

/// Counts reported by `speedy-tui index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub files: usize,
    pub folders: usize,
    pub applications: usize,
    /// False while the initial scan is still running
    pub complete: bool,
}

impl IndexStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.files + self.folders + self.applications
    }
}

struct Shared {
    config: IndexConfig,
    store: RwLock<IndexStore>,
    cache: Mutex<QueryCache>,
    usage: Mutex<UsageLog>,
    complete: AtomicBool,
}

/// Cheaply cloneable handle to a shared index.
#[derive(Clone)]
pub struct IndexEngine {
    shared: Arc<Shared>,
}

impl IndexEngine {
    /// Engine whose activation history lives in memory only.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self::with_usage(config, UsageLog::in_memory())
    }

    /// Engine that ranks with, and records into, `usage`.
    #[must_use]
    pub fn with_usage(config: IndexConfig, usage: UsageLog) -> Self {
        let cache = QueryCache::new(config.cache_ttl());
        Self {
            shared: Arc::new(Shared {
                config,
                store: RwLock::new(IndexStore::new()),
                cache: Mutex::new(cache),
                usage: Mutex::new(usage),
                complete: AtomicBool::new(false),
            }),
        }
    }

    /// Build an engine over a fixed set of entries, marked complete.
    #[must_use]
    pub fn from_entries(config: IndexConfig, entries: Vec<IndexedEntry>) -> Self {
        let engine = Self::new(config);
        engine.load_entries(entries);
        engine
    }

    /// Index a fixed set of entries instead of scanning, and mark the index
    /// complete.
    pub fn load_entries(&self, entries: Vec<IndexedEntry>) {
        self.insert(entries);
        self.shared.complete.store(true, Ordering::Release);
        self.clear_cache();
    }

    /// Scan the configured roots and application directories.
    ///
    /// The walk runs on the blocking pool; entries become searchable batch
    /// by batch while it runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the scan task panics.
    pub async fn build(&self) -> Result<usize> {
        let engine = self.clone();
        let total = tokio::task::spawn_blocking(move || {
            scan(&engine.shared.config, |batch| engine.insert(batch))
        })
        .await
        .map_err(|e| Error::Engine(format!("index scan failed: {e}")))?;

        self.shared.complete.store(true, Ordering::Release);
        self.clear_cache();
        info!("Index complete: {} entries", total);
        Ok(total)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shared.complete.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let complete = self.is_complete();
        let Ok(store) = self.shared.store.read() else {
            return IndexStats {
                complete,
                ..IndexStats::default()
            };
        };
        IndexStats {
            files: store.count(ResultKind::File),
            folders: store.count(ResultKind::Folder),
            applications: store.count(ResultKind::Application),
            complete,
        }
    }

    /// Synchronous search, served from the query cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the index lock was poisoned.
    pub fn search_now(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();

        if let Some(hit) = self.cache_lookup(query) {
            debug!("Query cache hit for {:?}", query);
            return Ok(hit);
        }

        let results = {
            let store = self
                .shared
                .store
                .read()
                .map_err(|_| Error::Engine("index lock poisoned".to_string()))?;
            store.search(query, self.shared.config.max_results, now_secs())
        };

        // Partial results from an unfinished scan must not be cached
        if self.is_complete()
            && !results.is_empty()
            && let Ok(mut cache) = self.shared.cache.lock()
        {
            cache.insert(query, results.clone());
        }

        Ok(results)
    }

    fn insert(&self, mut entries: Vec<IndexedEntry>) {
        if let Ok(usage) = self.shared.usage.lock()
            && !usage.is_empty()
        {
            for entry in &mut entries {
                if let Some(record) = usage.get(&entry.path) {
                    entry.apply_usage(record);
                }
            }
        }

        match self.shared.store.write() {
            Ok(mut store) => store.extend(entries),
            Err(_) => warn!("Index lock poisoned, dropping {} entries", entries.len()),
        }
    }

    fn cache_lookup(&self, query: &str) -> Option<Vec<SearchResult>> {
        self.shared.cache.lock().ok()?.get(query)
    }

    fn clear_cache(&self) {
        if let Ok(mut cache) = self.shared.cache.lock() {
            cache.clear();
        }
    }
}

impl SearchEngine for IndexEngine {
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<SearchResult>>> {
        let engine = self.clone();
        async move {
            tokio::task::spawn_blocking(move || engine.search_now(&query))
                .await
                .map_err(|e| Error::Engine(format!("search task failed: {e}")))?
        }
        .boxed()
    }

    fn record_activation(&self, result: &SearchResult) {
        let now = now_secs();

        match self.shared.usage.lock() {
            Ok(mut usage) => {
                usage.record(&result.path, now);
                if let Err(e) = usage.save() {
                    warn!("Failed to save usage log: {}", e);
                }
            }
            Err(_) => warn!("Usage lock poisoned, activation not persisted"),
        }

        let recorded = match self.shared.store.write() {
            Ok(mut store) => store.record_activation(&result.path, now),
            Err(_) => false,
        };

        if recorded {
            // Ranking changed, cached orderings are stale
            self.clear_cache();
        } else {
            debug!("Activation of unindexed path {}", result.path);
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
