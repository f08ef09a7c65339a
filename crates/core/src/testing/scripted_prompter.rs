//! Scripted prompter for testing interactive flows.

use std::collections::VecDeque;

use crate::interactive::{PromptError, Prompter};

/// One scripted answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedAnswer {
    /// Pick the first choice whose label equals this text.
    Label(String),
    /// Pick by zero-based position.
    Index(usize),
}

/// A prompt that was shown, for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPrompt {
    pub message: String,
    pub labels: Vec<String>,
}

/// Mock implementation of [`Prompter`].
///
/// Answers come from a queue; once it runs dry every prompt fails with
/// [`PromptError::Closed`], the same as a terminal reaching end of input.
///
/// # Example
///
/// ```rust,ignore
/// let mut prompter = ScriptedPrompter::new().pick("Children of Dune by Frank Herbert");
/// let outcome = session.search("dune", &mut prompter).await?;
/// assert_eq!(prompter.prompts()[0].message, "Select a book:");
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<ScriptedAnswer>,
    prompts: Vec<RecordedPrompt>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer that picks a choice by label.
    pub fn pick(mut self, label: impl Into<String>) -> Self {
        self.answers.push_back(ScriptedAnswer::Label(label.into()));
        self
    }

    /// Queue an answer that picks a choice by position.
    pub fn pick_index(mut self, index: usize) -> Self {
        self.answers.push_back(ScriptedAnswer::Index(index));
        self
    }

    pub fn prompts(&self) -> &[RecordedPrompt] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, message: &str, labels: &[String]) -> Result<usize, PromptError> {
        self.prompts.push(RecordedPrompt {
            message: message.to_string(),
            labels: labels.to_vec(),
        });

        if labels.is_empty() {
            return Err(PromptError::NoChoices);
        }

        match self.answers.pop_front() {
            None => Err(PromptError::Closed),
            Some(ScriptedAnswer::Index(index)) if index < labels.len() => Ok(index),
            Some(ScriptedAnswer::Index(index)) => Err(PromptError::InvalidAnswer(format!(
                "index {} out of {} choices",
                index,
                labels.len()
            ))),
            Some(ScriptedAnswer::Label(label)) => labels
                .iter()
                .position(|l| *l == label)
                .ok_or(PromptError::InvalidAnswer(label)),
        }
    }
}
