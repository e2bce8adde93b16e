//! Command-line interface for safetylog.
//!
//! This module provides the CLI structure for the `safelog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, DeleteCommand, ExportCommand, FilterArg,
    ImportCommand, ListCommand, OutputFormat, RatingArg, ViewCommand,
};

/// safelog - Record safety observations on this device
///
/// Keeps a local log of positive and negative safety observations with
/// optional photos, and exports it as JSON for sharing or backup.
#[derive(Debug, Parser)]
#[command(name = "safelog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new observation
    Add(AddCommand),

    /// List observations
    List(ListCommand),

    /// Show one observation in detail
    View(ViewCommand),

    /// Delete one observation
    Delete(DeleteCommand),

    /// Delete every observation
    Clear(ClearCommand),

    /// Export all observations as JSON
    Export(ExportCommand),

    /// Replace all observations with the contents of a JSON export
    Import(ImportCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "safelog");
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["safelog", "-q", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["safelog", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);

        let cli = Cli::try_parse_from(["safelog", "-v", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Verbose);

        let cli = Cli::try_parse_from(["safelog", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "safelog",
            "add",
            "--title",
            "Wet floor",
            "--rating",
            "negative",
            "--photo",
            "/tmp/floor.jpg",
        ])
        .unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(add.title, "Wet floor");
        assert_eq!(add.rating, RatingArg::Negative);
        assert_eq!(add.photo, Some(PathBuf::from("/tmp/floor.jpg")));
        assert!(add.description.is_none());
    }

    #[test]
    fn test_parse_add_defaults_to_positive() {
        let cli = Cli::try_parse_from(["safelog", "add", "-t", "Good lifting"]).unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(add.rating, RatingArg::Positive);
    }

    #[test]
    fn test_parse_list_filter() {
        let cli = Cli::try_parse_from(["safelog", "list", "--filter", "negative"]).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(list.filter, FilterArg::Negative);
        assert_eq!(list.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_delete_with_yes() {
        let cli = Cli::try_parse_from(["safelog", "delete", "abc", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Delete(DeleteCommand { yes: true, .. })));
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(["safelog", "import", "backup.json"]).unwrap();
        assert!(matches!(cli.command, Command::Import(_)));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["safelog", "-c", "/custom/config.toml", "list"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_unknown_rating_rejected() {
        assert!(Cli::try_parse_from(["safelog", "add", "-t", "x", "-r", "meh"]).is_err());
    }
}
