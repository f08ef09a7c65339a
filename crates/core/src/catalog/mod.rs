//! Remote book catalogs: Google Books and Open Library.
//!
//! Each client translates its wire format into the normalized
//! [`SearchResult`] / [`BookDetails`] shapes before anything downstream
//! sees it, so callers never branch on the source's response layout.

mod combined;
mod google;
mod openlibrary;
mod types;

pub use combined::CombinedCatalog;
pub use google::{GoogleBooksClient, GoogleBooksConfig, GOOGLE_MAX_RESULTS};
pub use openlibrary::{OpenLibraryClient, OpenLibraryConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// The single failure kind a catalog reports.
///
/// Transport errors, non-2xx statuses and unparseable payloads all collapse
/// into `Unavailable`; no retry is attempted.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{catalog} catalog unavailable: {reason}")]
    Unavailable {
        catalog: CatalogSource,
        reason: String,
    },
}

impl CatalogError {
    pub fn unavailable(catalog: CatalogSource, reason: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            catalog,
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(catalog: CatalogSource, err: reqwest::Error) -> Self {
        Self::unavailable(catalog, format!("request failed: {}", err))
    }

    pub(crate) fn status(catalog: CatalogSource, status: u16, body: String) -> Self {
        let body = body.trim();
        if body.is_empty() {
            Self::unavailable(catalog, format!("HTTP {}", status))
        } else {
            Self::unavailable(catalog, format!("HTTP {} - {}", status, body))
        }
    }

    pub(crate) fn parse(catalog: CatalogSource, err: impl std::fmt::Display) -> Self {
        Self::unavailable(catalog, format!("failed to parse response: {}", err))
    }

    /// The catalog that failed.
    pub fn catalog(&self) -> CatalogSource {
        match self {
            CatalogError::Unavailable { catalog, .. } => *catalog,
        }
    }
}

/// A remote catalog that can be searched by keyword and queried by id.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Search by keyword. An upstream "no matches" is `Ok(vec![])`.
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, CatalogError>;

    /// Fetch full details for one item.
    ///
    /// `source` selects the catalog when several are configured; `None`
    /// means the default catalog.
    async fn get_details(
        &self,
        id: &str,
        source: Option<CatalogSource>,
    ) -> Result<BookDetails, CatalogError>;
}

/// Title used when a catalog record carries none.
pub(crate) const UNTITLED: &str = "Untitled";

/// Upper bound on how much of an error body ends up in a message.
const ERROR_BODY_LIMIT: usize = 200;

pub(crate) fn user_agent() -> String {
    format!("booksearch/{}", env!("CARGO_PKG_VERSION"))
}

/// Turn a non-2xx response into `CatalogError::Unavailable`.
pub(crate) async fn ensure_success(
    catalog: CatalogSource,
    response: reqwest::Response,
) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(ERROR_BODY_LIMIT)
        .collect();
    warn!("{} returned HTTP {}", catalog, status.as_u16());
    Err(CatalogError::status(catalog, status.as_u16(), body))
}

/// A raw search hit before normalization, tagged by origin.
pub(crate) enum CatalogResult {
    Google(google::Volume),
    OpenLibrary(openlibrary::SearchDoc),
}

impl From<CatalogResult> for SearchResult {
    fn from(result: CatalogResult) -> Self {
        match result {
            CatalogResult::Google(volume) => volume.into_search_result(),
            CatalogResult::OpenLibrary(doc) => doc.into_search_result(),
        }
    }
}
