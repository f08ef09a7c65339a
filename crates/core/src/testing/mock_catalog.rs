//! Mock book catalog for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{BookCatalog, BookDetails, CatalogError, CatalogSource, SearchResult};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedQuery {
    Search {
        keyword: String,
        limit: u32,
        offset: u32,
    },
    GetDetails {
        id: String,
        source: Option<CatalogSource>,
    },
}

/// Mock implementation of [`BookCatalog`].
///
/// Books added with [`MockCatalog::add_book`] are searchable by a
/// case-insensitive substring of their title or any author. Every query is
/// recorded, and [`MockCatalog::set_next_error`] makes the next call fail.
#[derive(Debug, Default)]
pub struct MockCatalog {
    books: Arc<RwLock<Vec<BookDetails>>>,
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book; insertion order is the search result order.
    pub async fn add_book(&self, book: BookDetails) {
        self.books.write().await.push(book);
    }

    pub async fn set_books(&self, books: Vec<BookDetails>) {
        *self.books.write().await = books;
    }

    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedQuery) {
        self.queries.write().await.push(query);
    }
}

fn summarize(book: &BookDetails) -> SearchResult {
    SearchResult {
        id: book.id.clone(),
        source: book.source,
        title: book.title.clone(),
        authors: book.authors.clone(),
        publisher: book.publisher.clone(),
        published_date: book.published_date.clone(),
        description: book.description.clone(),
        page_count: book.page_count,
        categories: book.categories.clone(),
        thumbnail: book.images.as_ref().and_then(|i| i.thumbnail.clone()),
        language: book.language.clone(),
        preview_link: book.preview_link.clone(),
    }
}

#[async_trait]
impl BookCatalog for MockCatalog {
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        self.record(RecordedQuery::Search {
            keyword: keyword.to_string(),
            limit,
            offset,
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let needle = keyword.to_lowercase();
        let books = self.books.read().await;
        Ok(books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle)
                    || b.authors.iter().any(|a| a.to_lowercase().contains(&needle))
            })
            .skip(offset as usize)
            .take(limit as usize)
            .map(summarize)
            .collect())
    }

    async fn get_details(
        &self,
        id: &str,
        source: Option<CatalogSource>,
    ) -> Result<BookDetails, CatalogError> {
        self.record(RecordedQuery::GetDetails {
            id: id.to_string(),
            source,
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.books
            .read()
            .await
            .iter()
            .find(|b| b.id == id && source.map_or(true, |s| b.source == s))
            .cloned()
            .ok_or_else(|| {
                CatalogError::unavailable(
                    source.unwrap_or(CatalogSource::Google),
                    format!("HTTP 404 - volume {} not found", id),
                )
            })
    }
}
