//! Error types for safetylog.
//!
//! Every failure the observation log can hit falls into one of a handful of
//! kinds (see [`ErrorKind`]). Each kind has exactly one user-facing notice,
//! returned by [`Error::notice`], so the command layer never invents its own
//! wording.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for safetylog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// User input was rejected before any state changed.
    #[error("{0}")]
    Validation(String),

    // === Storage Errors ===
    /// Failed to open or create the database backing the storage slot.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The serialized collection does not fit in the storage slot.
    #[error("storage quota exceeded: {size} bytes exceeds the {quota} byte limit")]
    StorageQuota {
        /// Size of the rejected payload in bytes.
        size: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    // === Media Errors ===
    /// A photo could not be read, decoded or re-encoded.
    #[error("could not process image {path}: {message}")]
    Media {
        /// The file that was selected.
        path: PathBuf,
        /// Description of the failing stage.
        message: String,
    },

    // === Import Errors ===
    /// An import file was rejected as a whole.
    #[error("import rejected: {0}")]
    Import(String),

    // === Lookup Errors ===
    /// No observation has the requested id.
    #[error("no observation with id {0}")]
    NotFound(String),

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
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for safetylog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], one per user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input; nothing changed.
    Validation,
    /// The storage slot could not be read or written.
    Storage,
    /// A photo could not be processed.
    Media,
    /// An import file was rejected.
    Import,
    /// The requested record does not exist.
    NotFound,
    /// Configuration could not be loaded.
    Config,
    /// Anything else touching the file system or JSON encoding.
    Io,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a media error for the given file.
    #[must_use]
    pub fn media(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Media {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an import error.
    #[must_use]
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import(message.into())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DatabaseOpen { .. }
            | Self::Storage(_)
            | Self::DatabaseMigration { .. }
            | Self::StorageQuota { .. } => ErrorKind::Storage,
            Self::Media { .. } => ErrorKind::Media,
            Self::Import(_) => ErrorKind::Import,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::Io(_) | Self::DirectoryCreate { .. } | Self::Json(_) => ErrorKind::Io,
        }
    }

    /// The message shown to the user for this error.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::StorageQuota { .. } => {
                "Storage quota exceeded. Consider exporting and clearing some entries.".to_string()
            }
            Self::Media { .. } => "Could not process the image. Try a different file.".to_string(),
            Self::Import(_) => {
                "Failed to import file. Ensure it is a previously exported JSON.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error came from the storage slot.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_is_message() {
        let err = Error::validation("Title is required.");
        assert_eq!(err.to_string(), "Title is required.");
        assert_eq!(err.notice(), "Title is required.");
        assert!(err.is_validation());
    }

    #[test]
    fn test_quota_notice() {
        let err = Error::StorageQuota {
            size: 10,
            quota: 5,
        };
        assert!(err.is_storage());
        assert!(err.to_string().contains("10 bytes"));
        assert!(err.notice().starts_with("Storage quota exceeded"));
    }

    #[test]
    fn test_media_error() {
        let err = Error::media("/tmp/cat.png", "invalid image");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/cat.png"));
        assert!(msg.contains("invalid image"));
        assert_eq!(err.kind(), ErrorKind::Media);
        assert_eq!(
            err.notice(),
            "Could not process the image. Try a different file."
        );
    }

    #[test]
    fn test_import_error() {
        let err = Error::import("not a JSON array");
        assert_eq!(err.kind(), ErrorKind::Import);
        assert!(err.to_string().contains("not a JSON array"));
        assert!(err.notice().contains("previously exported JSON"));
    }

    #[test]
    fn test_not_found() {
        let err = Error::NotFound("abc".to_string());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.notice(), "no observation with id abc");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(err.is_storage());
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "quality out of range".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("quality out of range"));
    }
}
