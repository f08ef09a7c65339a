use std::path::PathBuf;

use booksearch_core::HistoryKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Search book catalogs and revisit past searches.
#[derive(Debug, Parser)]
#[command(name = "booksearch", version)]
pub struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(short, long, global = true, env = "BOOKSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for books and pick one to see its details.
    Search {
        /// Search terms.
        keyword: String,
    },
    /// Browse past keywords or selections.
    History {
        #[arg(value_enum)]
        kind: Option<HistoryArg>,
    },
    /// Serve the HTTP API.
    Serve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryArg {
    Keywords,
    Selections,
}

impl From<HistoryArg> for HistoryKind {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Keywords => HistoryKind::Keywords,
            HistoryArg::Selections => HistoryKind::Selections,
        }
    }
}

impl Command {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Serve => "info,tower_http=debug",
            _ => "warn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["booksearch", "search", "dune"]).unwrap();
        assert!(matches!(cli.command, Command::Search { ref keyword } if keyword == "dune"));
    }

    #[test]
    fn test_parse_history_kind_and_global_config() {
        let cli =
            Cli::try_parse_from(["booksearch", "history", "selections", "--config", "b.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("b.toml")));
        assert!(matches!(
            cli.command,
            Command::History {
                kind: Some(HistoryArg::Selections)
            }
        ));
    }

    #[test]
    fn test_missing_or_unknown_command_is_error() {
        assert!(Cli::try_parse_from(["booksearch"]).is_err());
        assert!(Cli::try_parse_from(["booksearch", "frobnicate"]).is_err());
        assert!(Cli::try_parse_from(["booksearch", "history", "everything"]).is_err());
    }
}
