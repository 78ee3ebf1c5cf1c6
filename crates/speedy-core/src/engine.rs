//! Collaborator contracts consumed by the overlay.
//!
//! Both traits hand back `'static` boxed futures so callers can move them
//! into spawned tasks without borrowing the implementor.

use crate::Result;
use speedy_types::SearchResult;

pub use futures_util::future::BoxFuture;

/// Resolves a query string to ranked results.
pub trait SearchEngine: Send + Sync {
    /// Search for `query`. Results come back in display order.
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<SearchResult>>>;

    /// Called after a result was opened or launched successfully.
    fn record_activation(&self, _result: &SearchResult) {}
}

/// Opens files and folders and launches applications.
pub trait Shell: Send + Sync {
    /// Open a file or folder with the platform default handler.
    fn open(&self, path: String) -> BoxFuture<'static, Result<()>>;

    /// Start the application identified by `path`.
    fn launch(&self, path: String) -> BoxFuture<'static, Result<()>>;
}
