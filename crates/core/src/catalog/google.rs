//! Google Books API client.
//!
//! Anonymous access works for search and volume lookups; an API key only
//! raises the quota.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{
    authors_or_unknown, BookDetails, CatalogSource, ImageLinks, IndustryIdentifier, SaleInfo,
    SearchResult,
};
use super::{ensure_success, BookCatalog, CatalogError, CatalogResult};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Largest page the volumes endpoint accepts.
pub const GOOGLE_MAX_RESULTS: u32 = 40;

/// Google Books client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoogleBooksConfig {
    /// Base URL (default: https://www.googleapis.com/books/v1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout; the transport default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(config: GoogleBooksConfig) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(super::user_agent());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::transport(CatalogSource::Google, e))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    fn with_key(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params
    }
}

#[async_trait]
impl BookCatalog for GoogleBooksClient {
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let url = format!("{}/volumes", self.base_url);
        let limit = limit.clamp(1, GOOGLE_MAX_RESULTS);

        debug!(
            "Google Books search: q='{}', maxResults={}, startIndex={}",
            keyword, limit, offset
        );

        let params = self.with_key(vec![
            ("q", keyword.to_string()),
            ("maxResults", limit.to_string()),
            ("startIndex", offset.to_string()),
        ]);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CatalogError::transport(CatalogSource::Google, e))?;
        let response = ensure_success(CatalogSource::Google, response).await?;

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(CatalogSource::Google, e))?;

        Ok(body
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|v| CatalogResult::Google(v).into())
            .collect())
    }

    async fn get_details(
        &self,
        id: &str,
        _source: Option<CatalogSource>,
    ) -> Result<BookDetails, CatalogError> {
        let url = format!("{}/volumes/{}", self.base_url, urlencoding::encode(id));

        debug!("Google Books volume lookup: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&self.with_key(Vec::new()))
            .send()
            .await
            .map_err(|e| CatalogError::transport(CatalogSource::Google, e))?;
        let response = ensure_success(CatalogSource::Google, response).await?;

        let volume: Volume = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(CatalogSource::Google, e))?;

        Ok(volume.into_details())
    }
}

// ============================================================================
// Google Books API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Absent when nothing matched.
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Volume {
    id: String,
    #[serde(default)]
    volume_info: VolumeInfo,
    #[serde(default)]
    sale_info: Option<SaleInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    authors: Option<Vec<String>>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    industry_identifiers: Option<Vec<IndustryIdentifier>>,
    #[serde(default)]
    page_count: Option<u32>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    average_rating: Option<f32>,
    #[serde(default)]
    ratings_count: Option<u32>,
    #[serde(default)]
    image_links: Option<ImageLinks>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    preview_link: Option<String>,
    #[serde(default)]
    info_link: Option<String>,
}

impl Volume {
    pub(crate) fn into_search_result(self) -> SearchResult {
        let info = self.volume_info;
        SearchResult {
            id: self.id,
            source: CatalogSource::Google,
            title: info.title.unwrap_or_else(|| super::UNTITLED.to_string()),
            authors: authors_or_unknown(info.authors),
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            page_count: info.page_count,
            categories: info.categories.unwrap_or_default(),
            thumbnail: info.image_links.and_then(|links| links.thumbnail),
            language: info.language,
            preview_link: info.preview_link,
        }
    }

    fn into_details(self) -> BookDetails {
        let info = self.volume_info;
        BookDetails {
            id: self.id,
            source: CatalogSource::Google,
            title: info.title.unwrap_or_else(|| super::UNTITLED.to_string()),
            subtitle: info.subtitle,
            authors: authors_or_unknown(info.authors),
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            industry_identifiers: info.industry_identifiers.unwrap_or_default(),
            page_count: info.page_count,
            categories: info.categories.unwrap_or_default(),
            average_rating: info.average_rating,
            ratings_count: info.ratings_count,
            images: info.image_links,
            language: info.language,
            preview_link: info.preview_link,
            info_link: info.info_link,
            sale_info: self.sale_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 2,
        "items": [
            {
                "id": "A1",
                "volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert"],
                    "publisher": "Ace",
                    "publishedDate": "1990-09-01",
                    "pageCount": 535,
                    "categories": ["Fiction"],
                    "imageLinks": {
                        "smallThumbnail": "http://books.google.com/s.jpg",
                        "thumbnail": "http://books.google.com/t.jpg"
                    },
                    "language": "en",
                    "previewLink": "http://books.google.com/books?id=A1"
                }
            },
            {
                "id": "B2",
                "volumeInfo": { "title": "Dune Messiah" }
            }
        ]
    }"#;

    #[test]
    fn test_search_response_parsing() {
        let body: VolumesResponse = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        let results: Vec<SearchResult> = body
            .items
            .unwrap()
            .into_iter()
            .map(|v| CatalogResult::Google(v).into())
            .collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "A1");
        assert_eq!(results[0].source, CatalogSource::Google);
        assert_eq!(results[0].page_count, Some(535));
        assert_eq!(
            results[0].thumbnail.as_deref(),
            Some("http://books.google.com/t.jpg")
        );
        assert_eq!(results[1].authors, vec!["Unknown"]);
        assert!(results[1].categories.is_empty());
    }

    #[test]
    fn test_search_response_without_items() {
        let body: VolumesResponse =
            serde_json::from_str(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(body.items.is_none());
    }

    #[test]
    fn test_volume_details_parsing() {
        let volume: Volume = serde_json::from_str(
            r#"{
                "id": "A1",
                "volumeInfo": {
                    "title": "Dune",
                    "subtitle": "Deluxe Edition",
                    "authors": ["Frank Herbert"],
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "0441172717"},
                        {"type": "ISBN_13", "identifier": "9780441172719"}
                    ],
                    "averageRating": 4.5,
                    "ratingsCount": 120,
                    "infoLink": "http://books.google.com/info"
                },
                "saleInfo": {
                    "country": "US",
                    "saleability": "FOR_SALE",
                    "isEbook": true,
                    "listPrice": {"amount": 9.99, "currencyCode": "USD"}
                }
            }"#,
        )
        .unwrap();

        let details = volume.into_details();
        assert_eq!(details.subtitle.as_deref(), Some("Deluxe Edition"));
        assert_eq!(details.isbn(), Some("9780441172719"));
        assert_eq!(details.average_rating, Some(4.5));
        assert_eq!(details.ratings_count, Some(120));

        let sale = details.sale_info.unwrap();
        assert!(sale.is_ebook);
        assert_eq!(sale.list_price.unwrap().currency_code, "USD");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = GoogleBooksClient::new(GoogleBooksConfig {
            base_url: Some("http://localhost:9999/books/v1/".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/books/v1");
    }
}
