//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::{BoardGameImageStore, BoardGameStore, InMemoryStore};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Holds the stores behind their traits; the concrete implementations are
/// chosen by whoever builds the state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Board game persistence.
    pub board_games: Arc<dyn BoardGameStore>,
    /// Image persistence.
    pub images: Arc<dyn BoardGameImageStore>,
}

impl AppState {
    /// Creates the state from explicit store implementations.
    #[must_use]
    pub fn new(board_games: Arc<dyn BoardGameStore>, images: Arc<dyn BoardGameImageStore>) -> Self {
        Self {
            board_games,
            images,
        }
    }

    /// Creates a state where both stores share one fresh [`InMemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            board_games: Arc::clone(&store) as Arc<dyn BoardGameStore>,
            images: store,
        }
    }
}
