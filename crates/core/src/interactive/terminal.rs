use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::{PromptError, Prompter};

/// Numbered-list prompt over any line reader and writer.
///
/// Answers are 1-based. Invalid answers re-prompt; end of input is
/// [`PromptError::Closed`].
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn select(&mut self, message: &str, labels: &[String]) -> Result<usize, PromptError> {
        if labels.is_empty() {
            return Err(PromptError::NoChoices);
        }

        writeln!(self.output, "{}", message)?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, label)?;
        }

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PromptError::Closed);
            }

            match line.trim().parse::<usize>() {
                Ok(n) if (1..=labels.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}.",
                    labels.len()
                )?,
            }
        }
    }
}
