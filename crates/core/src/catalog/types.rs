//! Normalized catalog types shared by every backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Author placeholder used when a catalog omits authorship.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// The catalog a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogSource {
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "openlibrary")]
    OpenLibrary,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Google => "google",
            CatalogSource::OpenLibrary => "openlibrary",
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(CatalogSource::Google),
            "openlibrary" | "open_library" => Ok(CatalogSource::OpenLibrary),
            other => Err(format!("unknown catalog source: {}", other)),
        }
    }
}

/// A single search hit, normalized across catalogs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Identifier that can be passed back to `get_details`.
    pub id: String,
    pub source: CatalogSource,
    pub title: String,
    /// Never empty; defaults to [`UNKNOWN_AUTHOR`].
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
}

impl SearchResult {
    /// Text shown to a user picking among results.
    pub fn display_label(&self) -> String {
        format!("{} by {}", self.title, self.authors.join(", "))
    }
}

/// An ISBN or other industry identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndustryIdentifier {
    /// e.g. `ISBN_10`, `ISBN_13`, `OTHER`.
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// Cover image links at the sizes a catalog provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount: f64,
    pub currency_code: String,
}

/// Licensing and availability metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// e.g. `FOR_SALE`, `NOT_FOR_SALE`, `FREE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saleability: Option<String>,
    #[serde(default)]
    pub is_ebook: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_link: Option<String>,
}

/// Full details for one catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub id: String,
    pub source: CatalogSource,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_info: Option<SaleInfo>,
}

impl BookDetails {
    /// First ISBN-13, falling back to ISBN-10.
    pub fn isbn(&self) -> Option<&str> {
        ["ISBN_13", "ISBN_10"].iter().find_map(|kind| {
            self.industry_identifiers
                .iter()
                .find(|i| i.kind == *kind)
                .map(|i| i.identifier.as_str())
        })
    }
}

/// Replace an absent or empty author list with the placeholder.
pub(crate) fn authors_or_unknown(authors: Option<Vec<String>>) -> Vec<String> {
    match authors {
        Some(list) if !list.is_empty() => list,
        _ => vec![UNKNOWN_AUTHOR.to_string()],
    }
}
