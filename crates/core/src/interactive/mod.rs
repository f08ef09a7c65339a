//! Interactive search and history browsing.
//!
//! The session drives the catalog and the history store; a [`Prompter`]
//! stands in for the human picking from lists, so the flow runs the same
//! against a terminal or a script.

mod render;
mod session;
mod terminal;

pub use render::render_details;
pub use session::{BrowseOutcome, HistoryKind, SearchOutcome, SearchSession, SessionError};
pub use terminal::TerminalPrompter;

use thiserror::Error;

/// Errors from asking the user to choose.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input ended before an answer was given.
    #[error("input closed before a choice was made")]
    Closed,

    #[error("nothing to choose from")]
    NoChoices,

    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A labelled value offered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Presents a list of labels and returns the index picked.
pub trait Prompter {
    fn select(&mut self, message: &str, labels: &[String]) -> Result<usize, PromptError>;
}

/// Ask `prompter` to pick one of `choices` and return its value.
pub fn choose<T, P>(
    prompter: &mut P,
    message: &str,
    choices: Vec<Choice<T>>,
) -> Result<T, PromptError>
where
    P: Prompter + ?Sized,
{
    if choices.is_empty() {
        return Err(PromptError::NoChoices);
    }
    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
    let index = prompter.select(message, &labels)?;

    choices
        .into_iter()
        .nth(index)
        .map(|c| c.value)
        .ok_or_else(|| PromptError::InvalidAnswer(format!("choice {} out of range", index)))
}
