//! Configuration management for weathernow.
//!
//! Configuration is loaded with figment from (later sources override
//! earlier):
//! 1. Default values
//! 2. TOML config file at `~/.config/weathernow/config.toml`
//! 3. Environment variables prefixed with `WXNOW_`, using `__` between
//!    nesting levels (e.g. `WXNOW_LOCATION__LATITUDE=48.85`)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::{Coordinates, PositionOptions};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name.
const APP_DIR_NAME: &str = "weathernow";

/// Default reverse geocoding service.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Default forecast service.
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the device is.
    pub location: LocationConfig,
    /// Remote services.
    pub services: ServicesConfig,
}

/// Location configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Latitude of the device, if known.
    pub latitude: Option<f64>,
    /// Longitude of the device, if known.
    pub longitude: Option<f64>,
    /// Request the most precise fix available.
    pub high_accuracy: bool,
    /// Reuse a fix for up to this many seconds.
    pub maximum_age_secs: u64,
    /// Give up waiting for a fix after this many seconds.
    pub timeout_secs: u64,
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of the reverse geocoding service.
    pub geocoder_url: String,
    /// Base URL of the forecast service.
    pub forecast_url: String,
    /// Preferred language for place names.
    pub language: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let options = PositionOptions::default();
        Self {
            latitude: None,
            longitude: None,
            high_accuracy: options.high_accuracy,
            maximum_age_secs: options.maximum_age.as_secs(),
            timeout_secs: options.timeout.as_secs(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            language: "en".to_string(),
            user_agent: concat!("weathernow/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl LocationConfig {
    /// Configured coordinates, when both halves are set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured values are out of range.
    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::checked(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    /// Position options described by this configuration.
    #[must_use]
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            maximum_age: Duration::from_secs(self.maximum_age_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl ServicesConfig {
    /// Build the HTTP client shared by both services.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .build()?)
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
            .merge(Env::prefixed("WXNOW_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let location = &self.location;
        if location.latitude.is_some() != location.longitude.is_some() {
            return Err(Error::config(
                "location.latitude and location.longitude must be set together",
            ));
        }
        location
            .coordinates()
            .map_err(|e| Error::config(format!("location: {e}")))?;

        if location.timeout_secs == 0 {
            return Err(Error::config(
                "location.timeout_secs must be greater than 0",
            ));
        }

        for (name, url) in [
            ("services.geocoder_url", &self.services.geocoder_url),
            ("services.forecast_url", &self.services.forecast_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| Error::config(format!("{name} is not a valid URL: {e}")))?;
        }

        if self.services.language.trim().is_empty() {
            return Err(Error::config("services.language must not be empty"));
        }

        Ok(())
    }
}
