//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::error::Result;
use crate::location::Coordinates;

/// Coordinates given on the command line.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees (overrides the configuration)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees (overrides the configuration)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    /// The coordinates, if both were given.
    ///
    /// # Errors
    ///
    /// Returns an error if the values are out of range.
    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinates::checked(lat, lon).map(Some),
            _ => Ok(None),
        }
    }
}

/// Arguments for a single refresh.
#[derive(Debug, Args)]
pub struct NowCommand {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub location: LocationArgs,

    /// Print the reading as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for the interactive display.
#[derive(Debug, Args)]
pub struct WatchCommand {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub location: LocationArgs,
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
