//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for recording a new observation.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Short summary of what was observed
    #[arg(short, long)]
    pub title: String,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Whether the observation is positive or negative
    #[arg(short, long, value_enum, default_value = "positive")]
    pub rating: RatingArg,

    /// Photo to attach (scaled down and embedded)
    #[arg(short, long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

/// Arguments for listing observations.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Which ratings to show
    #[arg(short, long, value_enum, default_value = "all")]
    pub filter: FilterArg,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for showing one observation.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Id of the observation
    pub id: String,

    /// Write a printable HTML page to this file
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Save the record as observation-<id>.json in this directory
    #[arg(long, value_name = "DIR")]
    pub json: Option<PathBuf>,
}

/// Arguments for deleting one observation.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the observation
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for deleting every observation.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for exporting the collection.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file, `-` for stdout (defaults to the configured file name)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for importing a collection.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file previously written by `export`
    pub file: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Rating argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RatingArg {
    /// Safe behaviour or condition
    Positive,
    /// Unsafe behaviour or condition
    Negative,
}

impl From<RatingArg> for crate::observation::Rating {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Positive => Self::Positive,
            RatingArg::Negative => Self::Negative,
        }
    }
}

/// Filter argument for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Every observation
    All,
    /// Positive observations only
    Positive,
    /// Negative observations only
    Negative,
}

impl From<FilterArg> for crate::listing::Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Positive => Self::Positive,
            FilterArg::Negative => Self::Negative,
        }
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
    /// Standalone HTML page
    Html,
}
