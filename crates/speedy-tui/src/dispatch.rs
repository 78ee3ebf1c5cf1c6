//! Routes an activated result to the shell.

use speedy_core::{ResultKind, Result, SearchResult, Shell};
use tracing::info;

/// How a result is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Start the application
    Launch,
    /// Open with the default handler
    Open,
}

#[must_use]
pub fn route(kind: ResultKind) -> Route {
    match kind {
        ResultKind::Application => Route::Launch,
        ResultKind::File | ResultKind::Folder => Route::Open,
    }
}

/// Activate `result` through exactly one of [`Shell::launch`] or [`Shell::open`].
///
/// # Errors
///
/// Propagates the shell's error unchanged.
pub async fn dispatch(shell: &dyn Shell, result: &SearchResult) -> Result<()> {
    let route = route(result.kind);
    info!("Activating {} via {:?}", result.path, route);
    match route {
        Route::Launch => shell.launch(result.path.clone()).await,
        Route::Open => shell.open(result.path.clone()).await,
    }
}
