//! Core library for the Speedy launcher.
//!
//! Provides the two collaborator contracts the overlay talks to
//! ([`SearchEngine`] and [`Shell`]), their default implementations
//! ([`IndexEngine`] and [`SystemShell`]) and the configuration layer.

pub mod config;

// Exposed for benchmarks - not part of stable API
#[doc(hidden)]
pub mod index;

pub(crate) mod platform;

mod engine;
mod error;
mod shell;

#[cfg(test)]
mod tests;

pub use engine::{BoxFuture, SearchEngine, Shell};
pub use error::{Error, Result};
pub use index::{IndexEngine, IndexStats, UsageLog};
pub use shell::SystemShell;

pub use speedy_types::*;
