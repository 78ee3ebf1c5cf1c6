//! Shared types for Speedy launcher components.
//!
//! This crate provides the types exchanged between the search engine
//! (speedy-core) and the overlay (speedy-tui). All types are serializable so
//! engines can be backed by a cache, a subprocess or a remote index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a result points at. Decides both the icon and how it is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    File,
    Folder,
    #[serde(rename = "app", alias = "application")]
    Application,
}

impl ResultKind {
    /// Stable identifier used in JSON and log output
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::File => "file",
            ResultKind::Folder => "folder",
            ResultKind::Application => "app",
        }
    }

    /// Tie-break rank when two results score the same (lower sorts first)
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            ResultKind::Application => 0,
            ResultKind::Folder => 1,
            ResultKind::File => 2,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry returned by a search engine. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Filesystem path or shell identifier, unique within one response
    pub path: String,

    /// Display label
    pub name: String,

    #[serde(rename = "type", alias = "kind")]
    pub kind: ResultKind,

    /// Relevance in `[0, 1]`; `None` means unscored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchResult {
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: ResultKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            score: None,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Score limited to `[0, 1]`. Non-finite scores are treated as unscored.
    #[must_use]
    pub fn clamped_score(&self) -> Option<f64> {
        self.score
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 1.0))
    }
}


#[cfg(test)]
mod proptest_score_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamped_score_stays_in_unit_range(score in proptest::num::f64::ANY) {
            let result = SearchResult::new("p", "n", ResultKind::File).with_score(score);
            if let Some(s) = result.clamped_score() {
                prop_assert!((0.0..=1.0).contains(&s));
            }
        }
    }
}
