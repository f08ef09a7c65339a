//! Testing utilities and mock implementations.
//!
//! Mocks for the catalog and prompt seams, so sessions and HTTP handlers
//! can be exercised without network access or a terminal.
//!
//! # Example
//!
//! ```rust,ignore
//! use booksearch_core::testing::{fixtures, MockCatalog, ScriptedPrompter};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_book(fixtures::google_book("A1", "Dune", "Frank Herbert")).await;
//!
//! let mut prompter = ScriptedPrompter::new().pick_index(0);
//! ```

mod mock_catalog;
mod scripted_prompter;

pub use mock_catalog::{MockCatalog, RecordedQuery};
pub use scripted_prompter::{RecordedPrompt, ScriptedAnswer, ScriptedPrompter};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{BookDetails, CatalogSource, ImageLinks, IndustryIdentifier};

    fn book(source: CatalogSource, id: &str, title: &str, author: &str) -> BookDetails {
        BookDetails {
            id: id.to_string(),
            source,
            title: title.to_string(),
            subtitle: None,
            authors: vec![author.to_string()],
            publisher: None,
            published_date: None,
            description: Some(format!("A book called {}.", title)),
            industry_identifiers: Vec::new(),
            page_count: None,
            categories: Vec::new(),
            average_rating: None,
            ratings_count: None,
            images: None,
            language: Some("en".to_string()),
            preview_link: None,
            info_link: None,
            sale_info: None,
        }
    }

    /// Create a Google Books volume with reasonable defaults.
    pub fn google_book(id: &str, title: &str, author: &str) -> BookDetails {
        let mut details = book(CatalogSource::Google, id, title, author);
        details.publisher = Some("Chilton Books".to_string());
        details.published_date = Some("1965-08-01".to_string());
        details.page_count = Some(412);
        details.categories = vec!["Fiction".to_string()];
        details.industry_identifiers = vec![IndustryIdentifier {
            kind: "ISBN_13".to_string(),
            identifier: "9780441013593".to_string(),
        }];
        details.preview_link = Some(format!("https://books.google.com/books?id={}", id));
        details.images = Some(ImageLinks {
            thumbnail: Some(format!(
                "https://books.google.com/books/content?id={}&img=1",
                id
            )),
            ..Default::default()
        });
        details
    }

    /// Create an Open Library work with reasonable defaults.
    pub fn openlibrary_book(id: &str, title: &str, author: &str) -> BookDetails {
        let mut details = book(CatalogSource::OpenLibrary, id, title, author);
        details.published_date = Some("1965".to_string());
        details.categories = vec!["Science fiction".to_string()];
        details.preview_link = Some(format!("https://openlibrary.org/works/{}", id));
        details
    }
}
