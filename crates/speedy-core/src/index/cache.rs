use speedy_types::SearchResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Upper bound on cached queries; the cache is flushed when exceeded
const MAX_ENTRIES: usize = 256;

/// Time-bounded cache of query results.
#[derive(Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: HashMap<String, (Instant, Vec<SearchResult>)>,
}

impl QueryCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fresh results for `query`, if any.
    #[must_use]
    pub fn get(&self, query: &str) -> Option<Vec<SearchResult>> {
        let (stored_at, results) = self.entries.get(query)?;
        (stored_at.elapsed() < self.ttl).then(|| results.clone())
    }

    pub fn insert(&mut self, query: &str, results: Vec<SearchResult>) {
        if self.ttl.is_zero() {
            return;
        }
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.clear();
        }
        self.entries
            .insert(query.to_string(), (Instant::now(), results));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
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
    use speedy_types::ResultKind;

    fn results() -> Vec<SearchResult> {
        vec![SearchResult::new("/a", "a", ResultKind::File)]
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = QueryCache::new(Duration::from_secs(300));
        cache.insert("abc", results());
        assert_eq!(cache.get("abc"), Some(results()));
        assert_eq!(cache.get("abd"), None);
    }

    #[test]
    fn test_expired_entry_misses() {
        let mut cache = QueryCache::new(Duration::from_millis(1));
        cache.insert("abc", results());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("abc"), None);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let mut cache = QueryCache::new(Duration::ZERO);
        cache.insert("abc", results());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_flushes_when_full() {
        let mut cache = QueryCache::new(Duration::from_secs(300));
        for i in 0..MAX_ENTRIES {
            cache.insert(&format!("q{i}"), results());
        }
        assert_eq!(cache.len(), MAX_ENTRIES);
        cache.insert("one-more", results());
        assert_eq!(cache.len(), 1);
    }
}
