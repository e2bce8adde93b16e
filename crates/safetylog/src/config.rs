//! Configuration management for safetylog.
//!
//! Configuration is loaded with figment from (later sources override
//! earlier):
//! 1. Default values
//! 2. TOML config file at `~/.config/safetylog/config.toml`
//! 3. Environment variables prefixed with `SAFETYLOG_`, using `__` between
//!    nesting levels (e.g. `SAFETYLOG_PHOTOS__MAX_WIDTH=1024`)

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::media::{PhotoPipeline, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use crate::storage::ObservationStore;
use crate::transfer::EXPORT_FILE_NAME;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "safetylog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "observations.db";

/// Default storage slot key.
pub const DEFAULT_SLOT_KEY: &str = "safety_observations_v1";

/// Default storage quota, matching the usual browser local storage limit.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Photo processing configuration.
    pub photos: PhotoConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/safetylog/observations.db`
    pub database_path: Option<PathBuf>,
    /// Key of the slot holding the collection.
    pub slot_key: String,
    /// Largest serialized collection the slot accepts, in bytes.
    pub quota_bytes: usize,
}

/// Photo processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Photos wider than this are scaled down.
    pub max_width: u32,
    /// JPEG quality, 1 to 100.
    pub quality: u8,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when no output is given.
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SAFETYLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.slot_key must not be empty".to_string(),
            });
        }

        if self.storage.quota_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "storage.quota_bytes must be greater than 0".to_string(),
            });
        }

        if self.photos.max_width == 0 {
            return Err(Error::ConfigValidation {
                message: "photos.max_width must be greater than 0".to_string(),
            });
        }

        if !(1..=100).contains(&self.photos.quality) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "photos.quality must be between 1 and 100, got {}",
                    self.photos.quality
                ),
            });
        }

        if self.export.file_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.file_name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Open the observation store described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_store(&self) -> Result<ObservationStore> {
        ObservationStore::open(
            self.database_path(),
            self.storage.slot_key.clone(),
            self.storage.quota_bytes,
        )
    }

    /// Photo pipeline described by this configuration.
    #[must_use]
    pub fn photo_pipeline(&self) -> PhotoPipeline {
        PhotoPipeline::new(self.photos.max_width, self.photos.quality)
    }
}
