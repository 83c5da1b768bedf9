//! Application state management

use mongodb::{Client, Database};

/// Live handle to the configured store
#[derive(Clone)]
pub enum Store {
    Mongo { client: Client, db: Database },
    Memory,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub store: Store,
}
