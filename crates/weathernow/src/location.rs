//! Device position and place names.
//!
//! Coordinates come from a [`Locator`]. [`LocationResolver`] wraps it with the
//! usual position options: a cached fix is reused while it is younger than
//! `maximum_age`, and a fresh request gives up after `timeout`.
//!
//! Place names are a best-effort lookup: [`resolve_place_name`] never fails
//! and substitutes [`FALLBACK_PLACE`] for any error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Place name used when the lookup fails or returns nothing usable.
pub const FALLBACK_PLACE: &str = "Your location";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Degrees north, `-90..=90`.
    pub latitude: f64,
    /// Degrees east, `-180..=180`.
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinates`] for out-of-range or non-finite
    /// values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(Error::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.latitude, self.longitude)
    }
}

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask the locator for its most precise fix.
    pub high_accuracy: bool,
    /// Oldest cached fix that may be reused.
    pub maximum_age: Duration,
    /// How long to wait for a fresh fix.
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::from_secs(300),
            timeout: Duration::from_secs(15),
        }
    }
}

/// A source of device coordinates.
#[async_trait]
pub trait Locator: Send + Sync {
    /// Produce one position reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationUnsupported`] when no position source exists.
    async fn locate(&self, options: &PositionOptions) -> Result<Coordinates>;
}

/// Locator backed by fixed coordinates from the configuration or the
/// command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredLocator {
    coordinates: Option<Coordinates>,
}

impl ConfiguredLocator {
    /// Create a locator; `None` means the device has no position source.
    #[must_use]
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Locator for ConfiguredLocator {
    async fn locate(&self, _options: &PositionOptions) -> Result<Coordinates> {
        self.coordinates.ok_or(Error::LocationUnsupported)
    }
}

/// Applies [`PositionOptions`] on top of a [`Locator`].
#[derive(Debug)]
pub struct LocationResolver<L> {
    locator: L,
    options: PositionOptions,
    last_fix: Option<(Coordinates, Instant)>,
}

impl<L: Locator> LocationResolver<L> {
    /// Create a resolver with no cached fix.
    pub fn new(locator: L, options: PositionOptions) -> Self {
        Self {
            locator,
            options,
            last_fix: None,
        }
    }

    /// The options this resolver applies.
    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Current coordinates, from the cache when fresh enough.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationTimeout`] if the locator does not answer in
    /// time, or whatever error the locator reports.
    pub async fn current_position(&mut self) -> Result<Coordinates> {
        if let Some((coordinates, taken_at)) = self.last_fix {
            if taken_at.elapsed() <= self.options.maximum_age {
                debug!("Reusing cached position {}", coordinates);
                return Ok(coordinates);
            }
        }

        let coordinates =
            tokio::time::timeout(self.options.timeout, self.locator.locate(&self.options))
                .await
                .map_err(|_| Error::LocationTimeout {
                    timeout_secs: self.options.timeout.as_secs(),
                })??;

        debug!("New position fix {}", coordinates);
        self.last_fix = Some((coordinates, Instant::now()));
        Ok(coordinates)
    }
}

/// A service that names the place at some coordinates.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Look up a human-readable name.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup service fails.
    async fn lookup(&self, coordinates: Coordinates) -> Result<String>;
}

/// Name the place at `coordinates`, or [`FALLBACK_PLACE`] on any failure.
pub async fn resolve_place_name<P>(places: &P, coordinates: Coordinates) -> String
where
    P: PlaceLookup + ?Sized,
{
    match places.lookup(coordinates).await {
        Ok(name) => name,
        Err(e) => {
            warn!("Place name lookup failed: {}", e);
            FALLBACK_PLACE.to_string()
        }
    }
}

/// Reverse geocoding response, reduced to the fields used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseResponse {
    /// Structured address parts.
    #[serde(default)]
    pub address: Option<Address>,
    /// Full formatted address.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Address parts, from most to least populous settlement type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    /// City name.
    #[serde(default)]
    pub city: Option<String>,
    /// Town name.
    #[serde(default)]
    pub town: Option<String>,
    /// Village name.
    #[serde(default)]
    pub village: Option<String>,
    /// Hamlet name.
    #[serde(default)]
    pub hamlet: Option<String>,
}

/// Pick the most specific non-empty name from a reverse geocoding response.
#[must_use]
pub fn pick_place_name(response: &ReverseResponse) -> String {
    let address = response.address.as_ref();
    [
        address.and_then(|a| a.city.as_deref()),
        address.and_then(|a| a.town.as_deref()),
        address.and_then(|a| a.village.as_deref()),
        address.and_then(|a| a.hamlet.as_deref()),
        response.display_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|name| !name.is_empty())
    .unwrap_or(FALLBACK_PLACE)
    .to_string()
}

/// Place lookup against a Nominatim-compatible reverse geocoding service.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    http: reqwest::Client,
    base_url: String,
    language: String,
}

impl ReverseGeocoder {
    /// Create a geocoder for the service at `base_url`.
    pub fn new(http: reqwest::Client, base_url: &str, language: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.into(),
        }
    }

    fn request(&self, coordinates: Coordinates) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
            ])
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.language)
    }
}

#[async_trait]
impl PlaceLookup for ReverseGeocoder {
    async fn lookup(&self, coordinates: Coordinates) -> Result<String> {
        let response = self.request(coordinates).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                service: "place name",
                status: status.as_u16(),
            });
        }

        let body: ReverseResponse = response.json().await?;
        Ok(pick_place_name(&body))
    }
}
