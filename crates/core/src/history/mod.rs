//! Keyword and selection history.
//!
//! Two append-only, deduplicated collections persisted independently.
//! [`HistoryStore`] owns the dedup and bootstrap rules; a
//! [`HistoryBackend`] only knows how to read and fully rewrite one
//! collection at a time.

mod json_file;
mod memory;
mod sqlite;
mod store;
mod types;

pub use json_file::{JsonFileBackend, KEYWORD_FILE, SELECTION_FILE};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use store::HistoryStore;
pub use types::*;

use std::sync::Arc;

use tracing::info;

use crate::config::{HistoryBackendKind, HistoryConfig};

/// Durable storage for the two history collections.
///
/// Writes replace the whole collection and must leave the previous
/// contents intact when they fail. The store serializes calls per
/// collection, so implementations need not guard against concurrent
/// read-modify-write of the same collection.
pub trait HistoryBackend: Send + Sync {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Create an empty durable representation if none exists.
    ///
    /// Returns `true` when one was created.
    fn ensure(&self, collection: Collection) -> Result<bool, StorageFault>;

    fn read_keywords(&self) -> Result<Vec<KeywordRecord>, StorageFault>;

    fn read_selections(&self) -> Result<Vec<SelectionRecord>, StorageFault>;

    fn write_keywords(&self, records: &[KeywordRecord]) -> Result<(), StorageFault>;

    fn write_selections(&self, records: &[SelectionRecord]) -> Result<(), StorageFault>;
}

/// Build a store over the configured backend.
pub fn open_history_store(config: &HistoryConfig) -> Result<HistoryStore, StorageFault> {
    let backend: Arc<dyn HistoryBackend> = match config.backend {
        HistoryBackendKind::Json => Arc::new(JsonFileBackend::new(&config.dir)),
        HistoryBackendKind::Sqlite => Arc::new(SqliteBackend::new(&config.sqlite_path())?),
    };
    info!("History backend: {}", backend.describe());
    Ok(HistoryStore::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_json_store_bootstraps_files() {
        let dir = TempDir::new().unwrap();
        let config = HistoryConfig {
            backend: HistoryBackendKind::Json,
            dir: dir.path().join("history"),
            sqlite_path: None,
        };

        let store = open_history_store(&config).unwrap();
        let loaded = store.load_all();

        assert!(!loaded.is_degraded());
        assert!(config.dir.join(KEYWORD_FILE).exists());
        assert!(config.dir.join(SELECTION_FILE).exists());
    }

    #[test]
    fn test_open_sqlite_store() {
        let dir = TempDir::new().unwrap();
        let config = HistoryConfig {
            backend: HistoryBackendKind::Sqlite,
            dir: dir.path().to_path_buf(),
            sqlite_path: None,
        };

        let store = open_history_store(&config).unwrap();
        assert!(store.record_keyword(Some("dune")).is_recorded());
        assert!(dir.path().join("history.db").exists());
    }
}
