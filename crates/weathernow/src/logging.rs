//! Logging configuration for weathernow.
//!
//! `wxnow watch` runs for a long time, so log lines keep their timestamps.
//! At the highest verbosity the HTTP client's own events are let through as
//! well, with targets shown to tell them apart.

use tracing::Level;
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
    /// Debug output, including the HTTP client.
    Trace,
}

impl Verbosity {
    /// Derive the verbosity from the `-v` count and the `-q` flag.
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Trace => Level::DEBUG,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directives(self) -> String {
        let level = self.level();
        if self == Self::Trace {
            format!("weathernow={level},reqwest={level}")
        } else {
            format!("weathernow={level}")
        }
    }
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over `verbosity`. Log lines go to stderr so
/// the rendered display on stdout stays clean.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity == Verbosity::Trace),
    );

    // A subscriber may already be installed.
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(3, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(2, true), Verbosity::Quiet);
    }

    #[test]
    fn test_directives() {
        assert_eq!(Verbosity::Quiet.directives(), "weathernow=ERROR");
        assert_eq!(Verbosity::Normal.directives(), "weathernow=WARN");
        assert_eq!(
            Verbosity::Trace.directives(),
            "weathernow=DEBUG,reqwest=DEBUG"
        );
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in [Verbosity::Quiet, Verbosity::Verbose, Verbosity::Trace] {
            assert!(EnvFilter::try_new(verbosity.directives()).is_ok());
        }
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Trace);
    }
}
