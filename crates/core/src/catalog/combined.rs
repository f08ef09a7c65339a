//! Catalog that merges several sources into one result list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    BookCatalog, BookDetails, CatalogError, CatalogSource, GoogleBooksClient, OpenLibraryClient,
    SearchResult,
};
use crate::config::CatalogConfig;

/// Delegates to the configured catalogs in order.
///
/// Searches run one source after another and concatenate results; a source
/// that fails is skipped as long as at least one other source answers.
pub struct CombinedCatalog {
    sources: Vec<(CatalogSource, Arc<dyn BookCatalog>)>,
}

impl CombinedCatalog {
    pub fn new(sources: Vec<(CatalogSource, Arc<dyn BookCatalog>)>) -> Self {
        Self { sources }
    }

    /// Build the clients listed in `config.sources`, in that order.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut sources: Vec<(CatalogSource, Arc<dyn BookCatalog>)> = Vec::new();
        for source in &config.sources {
            let client: Arc<dyn BookCatalog> = match source {
                CatalogSource::Google => {
                    info!("Initializing Google Books client");
                    Arc::new(GoogleBooksClient::new(config.google.clone())?)
                }
                CatalogSource::OpenLibrary => {
                    info!("Initializing Open Library client");
                    Arc::new(OpenLibraryClient::new(config.open_library.clone())?)
                }
            };
            sources.push((*source, client));
        }
        Ok(Self::new(sources))
    }

    /// Sources in query order.
    pub fn sources(&self) -> Vec<CatalogSource> {
        self.sources.iter().map(|(s, _)| *s).collect()
    }

    fn client_for(&self, source: Option<CatalogSource>) -> Result<&dyn BookCatalog, CatalogError> {
        let found = match source {
            Some(wanted) => self.sources.iter().find(|(s, _)| *s == wanted),
            None => self.sources.first(),
        };
        found.map(|(_, c)| c.as_ref()).ok_or_else(|| {
            let catalog = source.unwrap_or(CatalogSource::Google);
            CatalogError::unavailable(catalog, "catalog not configured")
        })
    }
}

#[async_trait]
impl BookCatalog for CombinedCatalog {
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let mut merged = Vec::new();
        let mut last_error = None;
        let mut answered = false;

        for (source, client) in &self.sources {
            match client.search(keyword, limit, offset).await {
                Ok(results) => {
                    answered = true;
                    merged.extend(results);
                }
                Err(e) => {
                    warn!("Search on {} failed: {}", source, e);
                    last_error = Some(e);
                }
            }
        }

        match (answered, last_error) {
            (true, _) => Ok(merged),
            (false, Some(e)) => Err(e),
            (false, None) => Err(CatalogError::unavailable(
                CatalogSource::Google,
                "no catalog configured",
            )),
        }
    }

    async fn get_details(
        &self,
        id: &str,
        source: Option<CatalogSource>,
    ) -> Result<BookDetails, CatalogError> {
        self.client_for(source)?.get_details(id, source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockCatalog};

    fn combined(google: &Arc<MockCatalog>, openlibrary: &Arc<MockCatalog>) -> CombinedCatalog {
        CombinedCatalog::new(vec![
            (CatalogSource::Google, Arc::clone(google) as Arc<dyn BookCatalog>),
            (
                CatalogSource::OpenLibrary,
                Arc::clone(openlibrary) as Arc<dyn BookCatalog>,
            ),
        ])
    }

    #[tokio::test]
    async fn test_search_merges_in_source_order() {
        let google = Arc::new(MockCatalog::new());
        let openlibrary = Arc::new(MockCatalog::new());
        google
            .add_book(fixtures::google_book("g1", "Dune", "Frank Herbert"))
            .await;
        openlibrary
            .add_book(fixtures::openlibrary_book("OL1W", "Dune", "Frank Herbert"))
            .await;

        let results = combined(&google, &openlibrary)
            .search("dune", 10, 0)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, CatalogSource::Google);
        assert_eq!(results[1].source, CatalogSource::OpenLibrary);
    }

    #[tokio::test]
    async fn test_search_tolerates_one_failing_source() {
        let google = Arc::new(MockCatalog::new());
        let openlibrary = Arc::new(MockCatalog::new());
        google
            .set_next_error(CatalogError::unavailable(CatalogSource::Google, "down"))
            .await;
        openlibrary
            .add_book(fixtures::openlibrary_book("OL1W", "Dune", "Frank Herbert"))
            .await;

        let results = combined(&google, &openlibrary)
            .search("dune", 10, 0)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "OL1W");
    }

    #[tokio::test]
    async fn test_search_fails_when_every_source_fails() {
        let google = Arc::new(MockCatalog::new());
        let openlibrary = Arc::new(MockCatalog::new());
        google
            .set_next_error(CatalogError::unavailable(CatalogSource::Google, "down"))
            .await;
        openlibrary
            .set_next_error(CatalogError::unavailable(
                CatalogSource::OpenLibrary,
                "down",
            ))
            .await;

        let result = combined(&google, &openlibrary).search("dune", 10, 0).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_details_dispatch_on_source() {
        let google = Arc::new(MockCatalog::new());
        let openlibrary = Arc::new(MockCatalog::new());
        google
            .add_book(fixtures::google_book("X", "Google copy", "A"))
            .await;
        openlibrary
            .add_book(fixtures::openlibrary_book("X", "Open Library copy", "A"))
            .await;
        let catalog = combined(&google, &openlibrary);

        let default = catalog.get_details("X", None).await.unwrap();
        assert_eq!(default.title, "Google copy");

        let ol = catalog
            .get_details("X", Some(CatalogSource::OpenLibrary))
            .await
            .unwrap();
        assert_eq!(ol.title, "Open Library copy");
    }

    #[tokio::test]
    async fn test_details_for_unconfigured_source() {
        let google = Arc::new(MockCatalog::new());
        let catalog = CombinedCatalog::new(vec![(
            CatalogSource::Google,
            Arc::clone(&google) as Arc<dyn BookCatalog>,
        )]);

        let err = catalog
            .get_details("OL1W", Some(CatalogSource::OpenLibrary))
            .await
            .unwrap_err();
        assert_eq!(err.catalog(), CatalogSource::OpenLibrary);
    }

    #[test]
    fn test_from_config_respects_order() {
        let config = CatalogConfig {
            sources: vec![CatalogSource::OpenLibrary, CatalogSource::Google],
            ..Default::default()
        };
        let catalog = CombinedCatalog::from_config(&config).unwrap();
        assert_eq!(
            catalog.sources(),
            vec![CatalogSource::OpenLibrary, CatalogSource::Google]
        );
    }
}
