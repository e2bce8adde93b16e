//! Storage layer for safetylog.
//!
//! The whole observation collection lives in one key-value slot as a single
//! JSON array. The slot is a row in an `SQLite` table, so a save is one
//! statement and either lands completely or not at all.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::observation::Observation;

/// Persistent home of the observation collection.
#[derive(Debug)]
pub struct ObservationStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Slot key the collection is stored under.
    key: String,
    /// Largest payload, in bytes, the slot accepts.
    quota_bytes: usize,
}

impl ObservationStore {
    /// Open or create a store at the given path.
    ///
    /// Creates parent directories and initializes the schema when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>, quota_bytes: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening observation store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn,
            key: key.into(),
            quota_bytes,
        })
    }

    /// Create an in-memory store, used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(key: impl Into<String>, quota_bytes: usize) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            key: key.into(),
            quota_bytes,
        })
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Slot key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the raw slot contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn read_raw(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Replace the raw slot contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageQuota`] when `value` is larger than the quota,
    /// or a storage error if the write fails.
    pub fn write_raw(&self, value: &str) -> Result<()> {
        if value.len() > self.quota_bytes {
            return Err(Error::StorageQuota {
                size: value.len(),
                quota: self.quota_bytes,
            });
        }

        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![self.key, value],
        )?;
        Ok(())
    }

    /// Load the collection.
    ///
    /// Never fails: a missing slot, an unreadable database, unparsable JSON
    /// or a non-array payload all yield an empty collection.
    #[must_use]
    pub fn load(&self) -> Vec<Observation> {
        match self.read_raw() {
            Ok(Some(raw)) => decode_collection(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load observations: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the whole collection in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the payload exceeds the quota
    /// or the write is rejected. The caller's collection is left as is.
    pub fn save(&self, observations: &[Observation]) -> Result<()> {
        let payload = serde_json::to_string(observations)?;
        if let Err(e) = self.write_raw(&payload) {
            error!("Failed to save observations: {}", e);
            return Err(e);
        }
        info!(
            "Saved {} observations ({} bytes)",
            observations.len(),
            payload.len()
        );
        Ok(())
    }
}

/// Decode a persisted payload, degrading to an empty collection.
///
/// Array elements that are not valid records are skipped.
#[must_use]
pub fn decode_collection(raw: &str) -> Vec<Observation> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Stored observations are not valid JSON: {}", e);
            return Vec::new();
        }
    };

    let serde_json::Value::Array(items) = value else {
        warn!("Stored observations are not a JSON array, ignoring");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<Observation>(item) {
                Ok(obs) => Some(obs),
                Err(e) => {
                    warn!("Skipping stored observation #{}: {}", index, e);
                    None
                }
            },
        )
        .collect()
}
