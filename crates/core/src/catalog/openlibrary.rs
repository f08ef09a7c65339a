//! Open Library API client.
//!
//! Search hits are works; their ids are the work key without the
//! `/works/` prefix (e.g. `OL45883W`). Work records only reference their
//! authors, so a detail lookup issues one extra request per author.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{authors_or_unknown, BookDetails, CatalogSource, ImageLinks, SearchResult};
use super::{ensure_success, BookCatalog, CatalogError, CatalogResult};

const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
const SITE_URL: &str = "https://openlibrary.org";
const COVERS_URL: &str = "https://covers.openlibrary.org/b/id";
const WORK_PREFIX: &str = "/works/";

/// Open Library client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OpenLibraryConfig {
    /// Base URL (default: https://openlibrary.org).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Open Library API client.
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: OpenLibraryConfig) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(super::user_agent());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::transport(CatalogSource::OpenLibrary, e))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { client, base_url })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::transport(CatalogSource::OpenLibrary, e))?;
        let response = ensure_success(CatalogSource::OpenLibrary, response).await?;

        response
            .json()
            .await
            .map_err(|e| CatalogError::parse(CatalogSource::OpenLibrary, e))
    }

    /// Authors whose lookup fails are left out.
    async fn author_names(&self, refs: &[AuthorRef]) -> Vec<String> {
        let mut names = Vec::with_capacity(refs.len());
        for author_ref in refs {
            let key = &author_ref.author.key;
            let url = format!("{}{}.json", self.base_url, key);
            debug!("Open Library author lookup: {}", key);
            match self.get_json::<AuthorRecord>(&url).await {
                Ok(AuthorRecord { name: Some(name) }) => names.push(name),
                Ok(_) => {}
                Err(e) => warn!("Skipping author {}: {}", key, e),
            }
        }
        names
    }
}

#[async_trait]
impl BookCatalog for OpenLibraryClient {
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let url = format!("{}/search.json", self.base_url);

        debug!(
            "Open Library search: q='{}', limit={}, offset={}",
            keyword, limit, offset
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", keyword.to_string()),
                ("limit", limit.max(1).to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::transport(CatalogSource::OpenLibrary, e))?;
        let response = ensure_success(CatalogSource::OpenLibrary, response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(CatalogSource::OpenLibrary, e))?;

        Ok(body
            .docs
            .into_iter()
            .map(|doc| CatalogResult::OpenLibrary(doc).into())
            .collect())
    }

    async fn get_details(
        &self,
        id: &str,
        _source: Option<CatalogSource>,
    ) -> Result<BookDetails, CatalogError> {
        let work_id = id.trim_start_matches(WORK_PREFIX);
        let url = format!(
            "{}/works/{}.json",
            self.base_url,
            urlencoding::encode(work_id)
        );

        debug!("Open Library work lookup: id={}", work_id);

        let work: WorkRecord = self.get_json(&url).await?;
        let authors = self.author_names(&work.authors).await;

        Ok(work.into_details(work_id, authors))
    }
}

fn cover_url(cover_id: i64, size: char) -> String {
    format!("{}/{}-{}.jpg", COVERS_URL, cover_id, size)
}

// ============================================================================
// Open Library API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchDoc {
    key: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Option<Vec<String>>,
    #[serde(default)]
    publisher: Vec<String>,
    #[serde(default)]
    first_publish_year: Option<i32>,
    #[serde(default)]
    number_of_pages_median: Option<u32>,
    #[serde(default)]
    subject: Vec<String>,
    #[serde(default)]
    language: Vec<String>,
    #[serde(default)]
    cover_i: Option<i64>,
}

impl SearchDoc {
    pub(crate) fn into_search_result(self) -> SearchResult {
        let id = self.key.trim_start_matches(WORK_PREFIX).to_string();
        SearchResult {
            preview_link: Some(format!("{}{}{}", SITE_URL, WORK_PREFIX, id)),
            id,
            source: CatalogSource::OpenLibrary,
            title: self.title.unwrap_or_else(|| super::UNTITLED.to_string()),
            authors: authors_or_unknown(self.author_name),
            publisher: self.publisher.into_iter().next(),
            published_date: self.first_publish_year.map(|y| y.to_string()),
            description: None,
            page_count: self.number_of_pages_median,
            categories: self.subject,
            thumbnail: self.cover_i.filter(|c| *c > 0).map(|c| cover_url(c, 'M')),
            language: self.language.into_iter().next(),
        }
    }
}

/// Work descriptions are either a bare string or a typed text object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    fn into_string(self) -> String {
        match self {
            TextValue::Plain(s) | TextValue::Typed { value: s } => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    description: Option<TextValue>,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    covers: Vec<i64>,
    #[serde(default)]
    authors: Vec<AuthorRef>,
    #[serde(default)]
    first_publish_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    author: KeyRef,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct AuthorRecord {
    #[serde(default)]
    name: Option<String>,
}

impl WorkRecord {
    fn into_details(self, work_id: &str, authors: Vec<String>) -> BookDetails {
        // Negative ids mark removed covers.
        let images = self
            .covers
            .iter()
            .copied()
            .find(|c| *c > 0)
            .map(|c| ImageLinks {
                small_thumbnail: Some(cover_url(c, 'S')),
                thumbnail: Some(cover_url(c, 'M')),
                small: Some(cover_url(c, 'S')),
                medium: Some(cover_url(c, 'M')),
                large: Some(cover_url(c, 'L')),
            });
        let link = format!("{}{}{}", SITE_URL, WORK_PREFIX, work_id);

        BookDetails {
            id: work_id.to_string(),
            source: CatalogSource::OpenLibrary,
            title: self.title.unwrap_or_else(|| super::UNTITLED.to_string()),
            subtitle: self.subtitle,
            authors: authors_or_unknown(Some(authors)),
            publisher: None,
            published_date: self.first_publish_date,
            description: self.description.map(TextValue::into_string),
            industry_identifiers: Vec::new(),
            page_count: None,
            categories: self.subjects,
            average_rating: None,
            ratings_count: None,
            images,
            language: None,
            preview_link: Some(link.clone()),
            info_link: Some(link),
            sale_info: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_doc_normalization() {
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "numFound": 1,
                "docs": [{
                    "key": "/works/OL893415W",
                    "title": "Dune",
                    "author_name": ["Frank Herbert"],
                    "publisher": ["Chilton Books", "Ace"],
                    "first_publish_year": 1965,
                    "number_of_pages_median": 604,
                    "language": ["eng"],
                    "cover_i": 11481354
                }]
            }"#,
        )
        .unwrap();

        let result: SearchResult = CatalogResult::OpenLibrary(
            body.docs.into_iter().next().unwrap(),
        )
        .into();

        assert_eq!(result.id, "OL893415W");
        assert_eq!(result.source, CatalogSource::OpenLibrary);
        assert_eq!(result.publisher.as_deref(), Some("Chilton Books"));
        assert_eq!(result.published_date.as_deref(), Some("1965"));
        assert_eq!(result.language.as_deref(), Some("eng"));
        assert_eq!(
            result.thumbnail.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11481354-M.jpg")
        );
        assert_eq!(
            result.preview_link.as_deref(),
            Some("https://openlibrary.org/works/OL893415W")
        );
    }

    #[test]
    fn test_search_doc_without_authors() {
        let doc: SearchDoc = serde_json::from_str(r#"{"key": "/works/OL1W"}"#).unwrap();
        let result = doc.into_search_result();
        assert_eq!(result.authors, vec!["Unknown"]);
        assert_eq!(result.title, "Untitled");
    }

    #[test]
    fn test_work_description_variants() {
        let plain: WorkRecord =
            serde_json::from_str(r#"{"title": "A", "description": "plain text"}"#).unwrap();
        let typed: WorkRecord = serde_json::from_str(
            r#"{"title": "B", "description": {"type": "/type/text", "value": "typed text"}}"#,
        )
        .unwrap();

        assert_eq!(
            plain.into_details("OL1W", vec![]).description.as_deref(),
            Some("plain text")
        );
        assert_eq!(
            typed.into_details("OL2W", vec![]).description.as_deref(),
            Some("typed text")
        );
    }

    #[test]
    fn test_work_details_covers_and_authors() {
        let work: WorkRecord = serde_json::from_str(
            r#"{
                "title": "Dune",
                "covers": [-1, 42],
                "subjects": ["Science fiction"],
                "authors": [{"author": {"key": "/authors/OL79034A"}, "type": {"key": "/type/author_role"}}]
            }"#,
        )
        .unwrap();
        assert_eq!(work.authors[0].author.key, "/authors/OL79034A");

        let details = work.into_details("OL893415W", vec!["Frank Herbert".to_string()]);
        let images = details.images.unwrap();
        assert_eq!(
            images.large.as_deref(),
            Some("https://covers.openlibrary.org/b/id/42-L.jpg")
        );
        assert_eq!(details.authors, vec!["Frank Herbert"]);
        assert_eq!(details.categories, vec!["Science fiction"]);
    }

    #[tokio::test]
    async fn test_failed_author_lookup_is_skipped() {
        // Nothing listens on port 1, so every lookup fails to connect.
        let client = OpenLibraryClient::new(OpenLibraryConfig {
            base_url: Some("http://127.0.0.1:1".to_string()),
            timeout_secs: Some(5),
        })
        .unwrap();
        let refs = vec![AuthorRef {
            author: KeyRef {
                key: "/authors/OL79034A".to_string(),
            },
        }];

        let names = client.author_names(&refs).await;
        assert!(names.is_empty());

        let work: WorkRecord = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        let details = work.into_details("OL893415W", names);
        assert_eq!(details.authors, vec!["Unknown"]);
    }
}
