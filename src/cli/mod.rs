pub mod categories;
pub mod demo;
pub mod init;
pub mod report;
pub mod summarize;
pub mod track;

use clap::{Parser, Subcommand};

use crate::reports::SortKey;

#[derive(Parser)]
#[command(name = "expenses", about = "Track a session's expenses: list by day, total, break down by category.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive expense form (default).
    Track {
        /// Initial list order
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
    /// Summarize a CSV of expenses (description,amount,date[,category]).
    Summarize {
        /// Path to the CSV file
        file: String,
        /// List order
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
    /// Print a report for a set of sample expenses.
    Demo {
        /// List order
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
    /// List the configured categories.
    Categories,
    /// Write the default settings file.
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Whether the command takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Commands::Track { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["expenses"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_sort_values() {
        let cli = Cli::try_parse_from(["expenses", "demo", "--sort", "amount-asc"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Demo { sort: Some(SortKey::AmountAsc) })
        ));
        assert!(Cli::try_parse_from(["expenses", "demo", "--sort", "sideways"]).is_err());
    }

    #[test]
    fn test_summarize_requires_file() {
        assert!(Cli::try_parse_from(["expenses", "summarize"]).is_err());
        let cli = Cli::try_parse_from(["expenses", "summarize", "may.csv"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summarize { ref file, sort: None }) if file == "may.csv"));
    }

    #[test]
    fn test_only_track_is_interactive() {
        assert!(Commands::Track { sort: None }.is_interactive());
        assert!(!Commands::Categories.is_interactive());
    }
}
