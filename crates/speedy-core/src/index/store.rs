use super::IndexedEntry;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use speedy_types::{ResultKind, SearchResult};
use std::collections::HashMap;
use tracing::debug;

/// Share of the final score taken by recorded activations
const USAGE_WEIGHT: f64 = 0.1;

/// Weighted activations beyond this no longer raise the usage bonus
const USAGE_SATURATION: f64 = 40.0;

const HOUR_SECS: u64 = 60 * 60;

/// In-memory store of indexed entries, deduplicated by path.
#[derive(Debug, Default)]
pub struct IndexStore {
    entries: Vec<IndexedEntry>,
    by_path: HashMap<String, usize>,
}

impl IndexStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert entries. An entry whose path is already indexed replaces the
    /// name and kind but keeps its usage data.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = IndexedEntry>) {
        for entry in entries {
            if let Some(&idx) = self.by_path.get(&entry.path) {
                let existing = &mut self.entries[idx];
                existing.name = entry.name;
                existing.kind = entry.kind;
            } else {
                self.by_path.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&IndexedEntry> {
        self.by_path.get(path).map(|&idx| &self.entries[idx])
    }

    /// Count entries of one kind
    #[must_use]
    pub fn count(&self, kind: ResultKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Record a successful activation. Returns false for unknown paths.
    pub fn record_activation(&mut self, path: &str, now_secs: u64) -> bool {
        let Some(&idx) = self.by_path.get(path) else {
            return false;
        };
        let entry = &mut self.entries[idx];
        entry.access_count = entry.access_count.saturating_add(1);
        entry.last_accessed = now_secs;
        true
    }

    /// Fuzzy-match `query` against entry names.
    ///
    /// Scores are normalized against the best raw match of this query, then
    /// blended with a usage bonus weighted by how recently (relative to
    /// `now_secs`) each entry was activated, so the top result scores close
    /// to 1.0. Ties are broken by kind (applications first), then by shorter
    /// name.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize, now_secs: u64) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Smart,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        let raw: Vec<(&IndexedEntry, u32)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let haystack = Utf32Str::new(&entry.name, &mut buf);
                pattern
                    .score(haystack, &mut matcher)
                    .map(|score| (entry, score))
            })
            .collect();

        let Some(best) = raw.iter().map(|(_, score)| *score).max() else {
            return Vec::new();
        };
        debug!("Query {:?} matched {} entries", query, raw.len());

        let mut scored: Vec<(&IndexedEntry, f64)> = raw
            .into_iter()
            .map(|(entry, score)| {
                let usage = usage_weight(entry.access_count, entry.last_accessed, now_secs);
                (entry, blend_score(score, best, usage))
            })
            .collect();

        scored.sort_by(|(a, a_score), (b, b_score)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
                .then_with(|| a.name.len().cmp(&b.name.len()))
                .then_with(|| a.name.cmp(&b.name))
        });
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(entry, score)| entry.to_result().with_score(score))
            .collect()
    }
}

/// Activation count scaled by recency, in `[0, 1]`.
// Counts are u32 and the multiplier is small; precision loss is irrelevant
#[allow(clippy::cast_precision_loss)]
fn usage_weight(access_count: u32, last_accessed: u64, now_secs: u64) -> f64 {
    if access_count == 0 {
        return 0.0;
    }

    let age = now_secs.saturating_sub(last_accessed);
    let recency = if age < HOUR_SECS {
        4.0
    } else if age < 24 * HOUR_SECS {
        2.0
    } else if age < 7 * 24 * HOUR_SECS {
        1.0
    } else {
        0.5
    };

    (f64::from(access_count) * recency / USAGE_SATURATION).min(1.0)
}

fn blend_score(raw: u32, best: u32, usage: f64) -> f64 {
    let relevance = if best == 0 {
        1.0
    } else {
        f64::from(raw) / f64::from(best)
    };
    (relevance * (1.0 - USAGE_WEIGHT) + usage * USAGE_WEIGHT).clamp(0.0, 1.0)
}
