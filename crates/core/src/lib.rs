pub mod catalog;
pub mod config;
pub mod history;
pub mod interactive;
pub mod testing;

pub use catalog::{
    BookCatalog, BookDetails, CatalogError, CatalogSource, CombinedCatalog, SearchResult,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, HistoryBackendKind, SanitizedConfig,
};
pub use history::{
    open_history_store, History, HistoryBackend, HistoryStore, KeywordRecord, LoadOutcome,
    RecordOutcome, SelectionRecord, StorageFault,
};
pub use interactive::{
    render_details, BrowseOutcome, HistoryKind, Prompter, SearchOutcome, SearchSession,
    SessionError, TerminalPrompter,
};
