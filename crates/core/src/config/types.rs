use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::{CatalogSource, GoogleBooksConfig, OpenLibraryConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    3000
}

/// Where history is persisted
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackendKind {
    #[default]
    Json,
    Sqlite,
}

/// History storage configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HistoryConfig {
    #[serde(default)]
    pub backend: HistoryBackendKind,
    /// Directory holding the JSON files (and the default SQLite file).
    #[serde(default = "default_history_dir")]
    pub dir: PathBuf,
    /// SQLite database file (default: `<dir>/history.db`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,
}

impl HistoryConfig {
    pub fn sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| self.dir.join("history.db"))
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackendKind::default(),
            dir: default_history_dir(),
            sqlite_path: None,
        }
    }
}

fn default_history_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("booksearch"))
        .unwrap_or_else(|| PathBuf::from("mock_database"))
}

/// Catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CatalogConfig {
    /// Catalogs to query, in result order.
    #[serde(default = "default_sources")]
    pub sources: Vec<CatalogSource>,
    /// Results requested per source for one search.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default)]
    pub google: GoogleBooksConfig,
    #[serde(default)]
    pub open_library: OpenLibraryConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            default_limit: default_limit(),
            google: GoogleBooksConfig::default(),
            open_library: OpenLibraryConfig::default(),
        }
    }
}

fn default_sources() -> Vec<CatalogSource> {
    vec![CatalogSource::Google]
}

fn default_limit() -> u32 {
    10
}

/// Config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub catalog: SanitizedCatalogConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub sources: Vec<CatalogSource>,
    pub default_limit: u32,
    pub google_api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            history: config.history.clone(),
            catalog: SanitizedCatalogConfig {
                sources: config.catalog.sources.clone(),
                default_limit: config.catalog.default_limit,
                google_api_key_configured: config.catalog.google.api_key.is_some(),
            },
        }
    }
}
