//! Display state and the refresh flow.
//!
//! [`WeatherView::refresh`] locates the device, then fetches the place name
//! and the current conditions concurrently. A failure anywhere is stored as
//! one message; the last good reading stays on screen.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

use crate::codes;
use crate::error::{Error, ErrorKind, Result};
use crate::forecast::{ConditionsSource, CurrentConditions};
use crate::location::{resolve_place_name, Coordinates, LocationResolver, Locator, PlaceLookup};

/// One successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Resolved place name, or the fallback.
    pub place: String,
    /// Where the reading was taken.
    pub coordinates: Coordinates,
    /// Raw measurements.
    pub conditions: CurrentConditions,
    /// Label for the weather code.
    pub label: &'static str,
    /// Icon for the weather code.
    pub icon: &'static str,
    /// When the refresh completed.
    pub updated_at: DateTime<Local>,
}

/// State of the weather display.
#[derive(Debug, Clone, Default)]
pub struct WeatherView {
    reading: Option<Reading>,
    busy: bool,
    error: Option<(ErrorKind, String)>,
}

impl WeatherView {
    /// An empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successful reading.
    #[must_use]
    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    /// Whether a refresh is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Message from the last failed refresh.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|(_, message)| message.as_str())
    }

    /// The outcome of the last refresh as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefreshFailed`] carrying the stored message if the
    /// last refresh failed.
    pub fn check(&self) -> Result<()> {
        match &self.error {
            None => Ok(()),
            Some((kind, message)) => Err(Error::RefreshFailed {
                kind: *kind,
                message: message.clone(),
            }),
        }
    }

    /// Run one refresh. Returns `true` on success.
    pub async fn refresh<L, P, C>(
        &mut self,
        resolver: &mut LocationResolver<L>,
        places: &P,
        conditions: &C,
    ) -> bool
    where
        L: Locator,
        P: PlaceLookup + ?Sized,
        C: ConditionsSource + ?Sized,
    {
        self.busy = true;
        self.error = None;

        match fetch_reading(resolver, places, conditions).await {
            Ok(reading) => {
                info!("Refreshed weather for {}", reading.place);
                self.reading = Some(reading);
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.error = Some((e.kind(), e.notice()));
            }
        }

        self.busy = false;
        self.error.is_none()
    }

    /// Format the view for the terminal.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        match &self.reading {
            Some(r) => {
                let c = &r.conditions;
                lines.push(format!("{} {}", r.place, r.coordinates));
                lines.push(format!("{}  {}°  {}", r.icon, round(c.temperature), r.label));
                lines.push(format!("Feels like  {}°", round(c.apparent_temperature)));
                lines.push(format!("Wind        {} km/h", round(c.wind_speed)));
                lines.push(format!("Humidity    {}%", round(c.relative_humidity)));
                lines.push(format!("Updated     {}", r.updated_at.format("%H:%M")));
            }
            None if self.busy => lines.push("Loading…".to_string()),
            None => lines.push("No reading yet.".to_string()),
        }

        if let Some((_, message)) = &self.error {
            lines.push(String::new());
            lines.push(format!("Error: {message}"));
        }

        lines.join("\n")
    }
}

async fn fetch_reading<L, P, C>(
    resolver: &mut LocationResolver<L>,
    places: &P,
    source: &C,
) -> Result<Reading>
where
    L: Locator,
    P: PlaceLookup + ?Sized,
    C: ConditionsSource + ?Sized,
{
    let coordinates = resolver.current_position().await?;

    let (place, conditions) = tokio::join!(
        resolve_place_name(places, coordinates),
        source.current(coordinates)
    );
    let conditions = conditions?;
    let condition = codes::describe(conditions.weather_code);

    Ok(Reading {
        place,
        coordinates,
        conditions,
        label: condition.label,
        icon: condition.icon,
        updated_at: Local::now(),
    })
}

/// Round half up to a whole number for display.
fn round(value: f64) -> String {
    format!("{:.0}", (value + 0.5).floor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canned::{self, CannedServer};
    use crate::forecast::ForecastClient;
    use crate::location::ReverseGeocoder;
    use crate::location::{ConfiguredLocator, PositionOptions, FALLBACK_PLACE};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedPlace(&'static str);

    #[async_trait]
    impl PlaceLookup for FixedPlace {
        async fn lookup(&self, _coordinates: Coordinates) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct NoPlace;

    #[async_trait]
    impl PlaceLookup for NoPlace {
        async fn lookup(&self, _coordinates: Coordinates) -> Result<String> {
            Err(Error::UpstreamStatus {
                service: "place name",
                status: 429,
            })
        }
    }

    /// Conditions source that can be switched to failing.
    struct Switchable {
        conditions: CurrentConditions,
        failing: AtomicBool,
    }

    #[async_trait]
    impl ConditionsSource for Switchable {
        async fn current(&self, _coordinates: Coordinates) -> Result<CurrentConditions> {
            if self.failing.load(Ordering::SeqCst) {
                Err(Error::UpstreamStatus {
                    service: "weather",
                    status: 500,
                })
            } else {
                Ok(self.conditions)
            }
        }
    }

    fn conditions(code: i64) -> CurrentConditions {
        CurrentConditions {
            temperature: 18.5,
            apparent_temperature: -2.5,
            relative_humidity: 56.0,
            wind_speed: 11.4,
            weather_code: Some(code),
        }
    }

    fn source(code: i64) -> Switchable {
        Switchable {
            conditions: conditions(code),
            failing: AtomicBool::new(false),
        }
    }

    fn resolver() -> LocationResolver<ConfiguredLocator> {
        let here = Coordinates::checked(52.5200, 13.4050).unwrap();
        LocationResolver::new(ConfiguredLocator::new(Some(here)), PositionOptions::default())
    }

    #[tokio::test]
    async fn test_successful_refresh() {
        let mut view = WeatherView::new();
        let ok = view
            .refresh(&mut resolver(), &FixedPlace("Berlin"), &source(0))
            .await;

        assert!(ok);
        assert!(!view.is_busy());
        assert!(view.error().is_none());

        let reading = view.reading().unwrap();
        assert_eq!(reading.place, "Berlin");
        assert_eq!(reading.label, "Clear sky");
        assert_eq!(reading.icon, "☀️");

        let rendered = view.render();
        assert!(rendered.starts_with("Berlin (52.520, 13.405)"));
        assert!(rendered.contains("19°  Clear sky"));
        assert!(rendered.contains("Feels like  -2°"));
        assert!(rendered.contains("Wind        11 km/h"));
        assert!(rendered.contains("Humidity    56%"));
    }

    #[tokio::test]
    async fn test_place_failure_is_absorbed() {
        let mut view = WeatherView::new();
        assert!(view.refresh(&mut resolver(), &NoPlace, &source(3)).await);
        assert_eq!(view.reading().unwrap().place, FALLBACK_PLACE);
        assert_eq!(view.reading().unwrap().label, "Overcast");
    }

    #[tokio::test]
    async fn test_unknown_code_uses_placeholder() {
        let mut view = WeatherView::new();
        assert!(view.refresh(&mut resolver(), &NoPlace, &source(42)).await);
        assert_eq!(view.reading().unwrap().label, "—");
        assert_eq!(view.reading().unwrap().icon, "⛅");
    }

    #[tokio::test]
    async fn test_missing_code_uses_placeholder() {
        let mut weather = source(0);
        weather.conditions.weather_code = None;

        let mut view = WeatherView::new();
        assert!(view.refresh(&mut resolver(), &NoPlace, &weather).await);
        assert_eq!(view.reading().unwrap().label, "—");
        assert!(view.render().contains("19°  —"));
    }

    #[tokio::test]
    async fn test_forecast_server_error_fails_refresh() {
        let places = CannedServer::start("200 OK", r#"{"address": {"city": "Berlin"}}"#).await;
        let weather = CannedServer::start("500 Internal Server Error", "{}").await;
        let geocoder = ReverseGeocoder::new(canned::client(), &places.base_url, "en");
        let forecast = ForecastClient::new(canned::client(), &weather.base_url);

        let mut view = WeatherView::new();
        assert!(!view.refresh(&mut resolver(), &geocoder, &forecast).await);
        assert!(view.reading().is_none());
        assert!(!view.is_busy());
        assert_eq!(view.error(), Some("Failed to fetch weather (HTTP 500)"));
    }

    #[tokio::test]
    async fn test_geocoder_server_error_keeps_refresh() {
        let places = CannedServer::start("500 Internal Server Error", "{}").await;
        let weather = CannedServer::start(
            "200 OK",
            r#"{"current": {"temperature_2m": 7.6, "apparent_temperature": 5.0,
                "relative_humidity_2m": 81, "wind_speed_10m": 14.2, "weather_code": 63}}"#,
        )
        .await;
        let geocoder = ReverseGeocoder::new(canned::client(), &places.base_url, "en");
        let forecast = ForecastClient::new(canned::client(), &weather.base_url);

        let mut view = WeatherView::new();
        assert!(view.refresh(&mut resolver(), &geocoder, &forecast).await);
        let reading = view.reading().unwrap();
        assert_eq!(reading.place, FALLBACK_PLACE);
        assert_eq!(reading.label, "Rain");
        assert!(view.render().contains("8°  Rain"));
    }

    #[tokio::test]
    async fn test_weather_failure_keeps_previous_reading() {
        let mut view = WeatherView::new();
        let mut resolver = resolver();
        let weather = source(61);

        assert!(view.refresh(&mut resolver, &FixedPlace("Berlin"), &weather).await);
        let before = view.reading().cloned().unwrap();

        weather.failing.store(true, Ordering::SeqCst);
        assert!(!view.refresh(&mut resolver, &FixedPlace("Elsewhere"), &weather).await);

        assert!(!view.is_busy());
        assert_eq!(view.error(), Some("Failed to fetch weather (HTTP 500)"));
        assert_eq!(view.reading(), Some(&before));
        assert!(view.render().ends_with("Error: Failed to fetch weather (HTTP 500)"));
    }

    #[tokio::test]
    async fn test_missing_location_stops_refresh() {
        let mut view = WeatherView::new();
        let mut resolver =
            LocationResolver::new(ConfiguredLocator::new(None), PositionOptions::default());

        assert!(!view.refresh(&mut resolver, &FixedPlace("x"), &source(0)).await);
        assert!(view.reading().is_none());
        assert!(!view.is_busy());
        assert_eq!(
            view.error(),
            Some("Geolocation is not supported on this device")
        );
    }

    #[tokio::test]
    async fn test_check_reports_failed_refresh() {
        let mut view = WeatherView::new();
        let mut resolver = resolver();
        let weather = source(0);
        weather.failing.store(true, Ordering::SeqCst);

        assert!(!view.refresh(&mut resolver, &NoPlace, &weather).await);
        let err = view.check().unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.notice(), "Failed to fetch weather (HTTP 500)");

        weather.failing.store(false, Ordering::SeqCst);
        assert!(view.refresh(&mut resolver, &NoPlace, &weather).await);
        assert!(view.check().is_ok());
    }

    #[tokio::test]
    async fn test_error_clears_on_next_success() {
        let mut view = WeatherView::new();
        let mut resolver = resolver();
        let weather = source(0);
        weather.failing.store(true, Ordering::SeqCst);

        assert!(!view.refresh(&mut resolver, &NoPlace, &weather).await);
        assert!(view.error().is_some());

        weather.failing.store(false, Ordering::SeqCst);
        assert!(view.refresh(&mut resolver, &NoPlace, &weather).await);
        assert!(view.error().is_none());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(WeatherView::new().render(), "No reading yet.");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round(18.5), "19");
        assert_eq!(round(-2.5), "-2");
        assert_eq!(round(-0.2), "0");
        assert_eq!(round(11.4), "11");
    }
}
