use std::sync::Arc;

use commander_core::{MemoryStore, RecordStore, Result};
use commander_store::SqliteStore;

use crate::config::{Backend, DatabaseSettings};

/// Application state shared across handlers
///
/// Only the store is shared; every request opens its own unit of work.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Open the store selected by the database settings
    ///
    /// # Errors
    /// `Storage` if the SQLite database cannot be opened or prepared.
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match settings.backend {
            Backend::Memory => Arc::new(MemoryStore::new()),
            Backend::Sqlite => Arc::new(SqliteStore::connect(&settings.connection_string)?),
        };

        tracing::info!(backend = ?settings.backend, "record store opened");
        Ok(Self::new(store))
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }
}
