use booksearch_core::{BookCatalog, Config, HistoryStore, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn BookCatalog>,
    history: Arc<HistoryStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn BookCatalog>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            history,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &dyn BookCatalog {
        self.catalog.as_ref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}
