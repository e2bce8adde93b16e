//! Error types for weathernow.
//!
//! A refresh can fail while locating the device, while talking to one of the
//! two services, or before it starts because the configuration is unusable.
//! [`Error::notice`] turns any of them into the single line shown to the user.

use thiserror::Error;

/// Fallback message when a network failure carries nothing more useful.
pub const GENERIC_FAILURE: &str = "Unable to get weather. Check permissions and connectivity.";

/// The main error type for weathernow operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Location Errors ===
    /// No source of coordinates is available at all.
    #[error("Geolocation is not supported on this device")]
    LocationUnsupported,

    /// The locator did not produce a fix in time.
    #[error("Timed out waiting for a location fix after {timeout_secs} s")]
    LocationTimeout {
        /// The timeout that expired.
        timeout_secs: u64,
    },

    /// Coordinates outside the valid latitude/longitude ranges.
    #[error("Invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },

    // === Network Errors ===
    /// The request could not be sent or the response could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A service answered with a non-success status.
    #[error("Failed to fetch {service} (HTTP {status})")]
    UpstreamStatus {
        /// Which service answered.
        service: &'static str,
        /// The HTTP status code.
        status: u16,
    },

    /// A refresh ended without a reading; carries the message it stored.
    #[error("{message}")]
    RefreshFailed {
        /// Classification of the underlying failure.
        kind: ErrorKind,
        /// The message shown for the failed refresh.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Terminal or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for weathernow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The device position could not be determined.
    Location,
    /// A service could not be reached or refused the request.
    Network,
    /// Configuration could not be loaded.
    Config,
    /// Local I/O or encoding failed.
    Io,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LocationUnsupported
            | Self::LocationTimeout { .. }
            | Self::InvalidCoordinates { .. } => ErrorKind::Location,
            Self::Http(_) | Self::UpstreamStatus { .. } => ErrorKind::Network,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
            Self::RefreshFailed { kind, .. } => *kind,
        }
    }

    /// The message shown to the user for this error.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Http(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }

    /// Check if this error came from locating the device.
    #[must_use]
    pub fn is_location(&self) -> bool {
        self.kind() == ErrorKind::Location
    }

    /// Check if this error came from a remote service.
    #[must_use]
    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_errors() {
        assert!(Error::LocationUnsupported.is_location());
        assert!(Error::LocationTimeout { timeout_secs: 15 }.is_location());
        assert_eq!(
            Error::LocationTimeout { timeout_secs: 15 }.to_string(),
            "Timed out waiting for a location fix after 15 s"
        );
    }

    #[test]
    fn test_upstream_status_notice() {
        let err = Error::UpstreamStatus {
            service: "weather",
            status: 503,
        };
        assert!(err.is_network());
        assert_eq!(err.notice(), "Failed to fetch weather (HTTP 503)");
    }

    #[test]
    fn test_config_helper() {
        let err = Error::config("bad value");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.to_string(), "invalid configuration: bad value");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_refresh_failed_keeps_kind() {
        let err = Error::RefreshFailed {
            kind: ErrorKind::Location,
            message: "Geolocation is not supported on this device".into(),
        };
        assert!(err.is_location());
        assert_eq!(err.notice(), "Geolocation is not supported on this device");
    }

    #[test]
    fn test_unsupported_notice() {
        assert_eq!(
            Error::LocationUnsupported.notice(),
            "Geolocation is not supported on this device"
        );
    }
}
