//! Shared application state

use std::sync::Arc;

use ai_chatbot_core::core::Config;

use crate::db::DatabaseHandle;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Database connection state
    pub database: DatabaseHandle,
}

impl AppState {
    /// Bundle configuration and database handle
    pub fn new(config: Config, database: DatabaseHandle) -> Self {
        Self {
            config: Arc::new(config),
            database,
        }
    }
}
