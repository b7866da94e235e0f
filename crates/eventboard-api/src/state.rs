//! Shared application state for the API server.

use std::sync::Arc;

use eventboard_core::Board;

/// Shared state for the Axum application.
///
/// Cloned into every handler through Axum's `State` extractor. All clones
/// share one [`Board`].
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store, its lock, and its change notifier.
    pub board: Arc<Board>,
}

impl AppState {
    /// Wrap an existing board.
    pub const fn new(board: Arc<Board>) -> Self {
        Self { board }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(Board::default()))
    }
}
