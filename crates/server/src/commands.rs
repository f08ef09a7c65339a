//! CLI command bodies, written against any prompter and output so they
//! can run without a terminal.

use std::io::Write;

use anyhow::Result;
use booksearch_core::{
    render_details, BrowseOutcome, HistoryKind, Prompter, SearchOutcome, SearchSession,
};

pub const NO_RESULTS: &str = "No results found.";
pub const NO_HISTORY: &str = "No history available.";

fn print_search<W: Write>(outcome: &SearchOutcome, out: &mut W) -> Result<()> {
    match outcome {
        SearchOutcome::NoResults => writeln!(out, "{}", NO_RESULTS)?,
        SearchOutcome::Selected(details) => write!(out, "{}", render_details(details))?,
    }
    Ok(())
}

/// `booksearch search <keyword>`
pub async fn search<P, W>(
    session: &SearchSession,
    keyword: &str,
    prompter: &mut P,
    out: &mut W,
) -> Result<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let outcome = session.search(keyword, prompter).await?;
    print_search(&outcome, out)
}

/// `booksearch history [keywords|selections]`
pub async fn history<P, W>(
    session: &SearchSession,
    kind: Option<HistoryKind>,
    prompter: &mut P,
    out: &mut W,
) -> Result<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    match session.browse_history(kind, prompter).await? {
        BrowseOutcome::Exited => {}
        BrowseOutcome::Empty => writeln!(out, "{}", NO_HISTORY)?,
        BrowseOutcome::Searched(outcome) => print_search(&outcome, out)?,
        BrowseOutcome::Viewed(details) => write!(out, "{}", render_details(&details))?,
    }
    Ok(())
}
