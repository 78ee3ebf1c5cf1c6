//! Test module for speedy-core
//!
//! Covers configuration loading and validation, and the index engine end to
//! end (scan, search, cache, activation tracking).

// Test modules use exact float comparisons
#![allow(clippy::float_cmp)]

mod fixtures;
