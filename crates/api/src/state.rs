//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use intake::ChatOrchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Chat intake orchestrator.
    pub chat: Arc<ChatOrchestrator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, chat: ChatOrchestrator) -> Self {
        Self {
            db,
            chat: Arc::new(chat),
        }
    }
}
