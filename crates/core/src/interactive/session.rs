use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::{choose, Choice, PromptError, Prompter};
use crate::catalog::{BookCatalog, BookDetails, CatalogError};
use crate::history::{Collection, HistoryStore};

/// Which history collection to browse.
pub type HistoryKind = Collection;

/// Errors that end an interactive session step.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Result of one keyword search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NoResults,
    Selected(BookDetails),
}

/// Result of browsing the history.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseOutcome {
    /// The user chose "Exit" from the history menu.
    Exited,
    /// The chosen collection has no entries.
    Empty,
    /// A past keyword was searched again.
    Searched(SearchOutcome),
    /// A past selection's details were fetched again.
    Viewed(BookDetails),
}

/// Search-select-detail flow with history recording.
pub struct SearchSession {
    catalog: Arc<dyn BookCatalog>,
    history: Arc<HistoryStore>,
    limit: u32,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn BookCatalog>, history: Arc<HistoryStore>, limit: u32) -> Self {
        Self {
            catalog,
            history,
            limit,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Search, let the user pick a result, and fetch its details.
    ///
    /// The keyword is recorded only when the search returns something; the
    /// selection is recorded as soon as it is picked.
    pub async fn search<P>(
        &self,
        keyword: &str,
        prompter: &mut P,
    ) -> Result<SearchOutcome, SessionError>
    where
        P: Prompter + ?Sized,
    {
        if keyword.is_empty() {
            return Err(SessionError::EmptyKeyword);
        }

        let results = self.catalog.search(keyword, self.limit, 0).await?;
        debug!("Search for {:?} returned {} results", keyword, results.len());
        if results.is_empty() {
            return Ok(SearchOutcome::NoResults);
        }

        self.history.record_keyword(Some(keyword));

        let choices = results
            .into_iter()
            .map(|r| Choice::new(r.display_label(), r))
            .collect();
        let picked = choose(prompter, "Select a book:", choices)?;

        self.history
            .record_selection(Some(picked.id.as_str()), Some(picked.source));

        let details = self
            .catalog
            .get_details(&picked.id, Some(picked.source))
            .await?;
        Ok(SearchOutcome::Selected(details))
    }

    /// Browse past keywords or selections.
    ///
    /// With no `kind`, the user first picks between keywords, selections
    /// and exit.
    pub async fn browse_history<P>(
        &self,
        kind: Option<HistoryKind>,
        prompter: &mut P,
    ) -> Result<BrowseOutcome, SessionError>
    where
        P: Prompter + ?Sized,
    {
        let kind = match kind {
            Some(kind) => kind,
            None => {
                let menu = vec![
                    Choice::new("Keywords", Some(Collection::Keywords)),
                    Choice::new("Selections", Some(Collection::Selections)),
                    Choice::new("Exit", None),
                ];
                match choose(prompter, "View search history:", menu)? {
                    Some(kind) => kind,
                    None => return Ok(BrowseOutcome::Exited),
                }
            }
        };

        let history = self.history.load_all().history;
        match kind {
            Collection::Keywords => {
                if history.keywords.is_empty() {
                    return Ok(BrowseOutcome::Empty);
                }
                let choices = history
                    .keywords
                    .into_iter()
                    .map(|k| Choice::new(k.as_str().to_string(), k))
                    .collect();
                let keyword = choose(prompter, "Select a keyword:", choices)?;
                let outcome = self.search(keyword.as_str(), prompter).await?;
                Ok(BrowseOutcome::Searched(outcome))
            }
            Collection::Selections => {
                if history.selections.is_empty() {
                    return Ok(BrowseOutcome::Empty);
                }
                let choices = history
                    .selections
                    .into_iter()
                    .map(|s| Choice::new(s.to_string(), s))
                    .collect();
                let selection = choose(prompter, "Select a book:", choices)?;
                let details = self
                    .catalog
                    .get_details(selection.id(), selection.source())
                    .await?;
                Ok(BrowseOutcome::Viewed(details))
            }
        }
    }
}
