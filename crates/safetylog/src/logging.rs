//! Logging configuration for safetylog.
//!
//! Every `safelog` command is a single short action, so log lines are
//! compact and carry no timestamp. `RUST_LOG` overrides the flag-derived
//! level.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only errors.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Info and above.
    Verbose,
    /// Everything, including debug output.
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Quiet => Self::ERROR,
            Verbosity::Normal => Self::WARN,
            Verbosity::Verbose => Self::INFO,
            Verbosity::Trace => Self::DEBUG,
        }
    }
}

/// Initialize the logging system on stderr, leaving stdout to listings and
/// exports.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("safetylog={}", LevelFilter::from(verbosity)))
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
