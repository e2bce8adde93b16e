//! Current conditions from an Open-Meteo compatible forecast service.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::location::Coordinates;

/// Fields requested from the `current` block, in request order.
pub const CURRENT_FIELDS: [&str; 5] = [
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "wind_speed_10m",
    "weather_code",
];

/// Present-moment measurements for one coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature at 2 m, °C.
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    /// Perceived temperature, °C.
    pub apparent_temperature: f64,
    /// Relative humidity at 2 m, percent.
    #[serde(rename = "relative_humidity_2m")]
    pub relative_humidity: f64,
    /// Wind speed at 10 m, km/h.
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
    /// WMO weather interpretation code; `None` when missing or not a
    /// whole number.
    #[serde(default, deserialize_with = "whole_number")]
    pub weather_code: Option<i64>,
}

/// Accept any JSON value, keeping it only when it is a whole number.
#[allow(clippy::cast_possible_truncation)]
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Number(number)) = value else {
        return Ok(None);
    };
    Ok(number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    }))
}

/// Forecast response, reduced to the `current` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    /// The current conditions.
    pub current: CurrentConditions,
}

/// A source of current conditions.
#[async_trait]
pub trait ConditionsSource: Send + Sync {
    /// Fetch current conditions at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached, answers with a
    /// non-success status, or sends an unexpected body.
    async fn current(&self, coordinates: Coordinates) -> Result<CurrentConditions>;
}

/// HTTP client for the forecast service.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Create a client for the service at `base_url`.
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, coordinates: Coordinates) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current", CURRENT_FIELDS.join(",")),
                ("wind_speed_unit", "kmh".to_string()),
                ("timezone", "auto".to_string()),
            ])
    }
}

#[async_trait]
impl ConditionsSource for ForecastClient {
    async fn current(&self, coordinates: Coordinates) -> Result<CurrentConditions> {
        let response = self.request(coordinates).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                service: "weather",
                status: status.as_u16(),
            });
        }

        let body: ForecastResponse = response.json().await?;
        debug!("Weather code {:?} at {}", body.current.weather_code, coordinates);
        Ok(body.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canned::{self, CannedServer};

    const SAMPLE: &str = r#"{
        "latitude": 52.52,
        "longitude": 13.419998,
        "timezone": "Europe/Berlin",
        "current_units": {"temperature_2m": "°C"},
        "current": {
            "time": "2024-05-01T12:00",
            "interval": 900,
            "temperature_2m": 18.4,
            "apparent_temperature": 17.1,
            "relative_humidity_2m": 56,
            "wind_speed_10m": 11.9,
            "weather_code": 2
        }
    }"#;

    #[test]
    fn test_parse_forecast_response() {
        let response: ForecastResponse = serde_json::from_str(SAMPLE).unwrap();
        let current = response.current;
        assert!((current.temperature - 18.4).abs() < f64::EPSILON);
        assert!((current.apparent_temperature - 17.1).abs() < f64::EPSILON);
        assert!((current.relative_humidity - 56.0).abs() < f64::EPSILON);
        assert!((current.wind_speed - 11.9).abs() < f64::EPSILON);
        assert_eq!(current.weather_code, Some(2));
    }

    fn decode_code(raw: &str) -> Option<i64> {
        let body = format!(
            r#"{{"current": {{"temperature_2m": 1.0, "apparent_temperature": 1.0,
                "relative_humidity_2m": 50, "wind_speed_10m": 3.0, "weather_code": {raw}}}}}"#
        );
        serde_json::from_str::<ForecastResponse>(&body)
            .unwrap()
            .current
            .weather_code
    }

    #[test]
    fn test_odd_weather_codes_still_decode() {
        assert_eq!(decode_code("null"), None);
        assert_eq!(decode_code("\"3\""), None);
        assert_eq!(decode_code("2.5"), None);
        assert_eq!(decode_code("3.0"), Some(3));
        assert_eq!(decode_code("-1"), Some(-1));
        assert_eq!(decode_code("70000"), Some(70_000));
    }

    #[test]
    fn test_missing_weather_code_decodes() {
        let body = r#"{"current": {"temperature_2m": 1.0, "apparent_temperature": 1.0,
            "relative_humidity_2m": 50, "wind_speed_10m": 3.0}}"#;
        let response: ForecastResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.current.weather_code, None);
    }

    #[test]
    fn test_missing_current_block_is_an_error() {
        assert!(serde_json::from_str::<ForecastResponse>(r#"{"latitude": 1.0}"#).is_err());
    }

    #[test]
    fn test_forecast_request() {
        let client = ForecastClient::new(reqwest::Client::new(), "https://api.example.com/");
        let coordinates = Coordinates::checked(52.52, 13.41).unwrap();
        let request = client.request(coordinates).build().unwrap();

        assert_eq!(request.url().path(), "/v1/forecast");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("latitude".into(), "52.52".into())));
        assert!(pairs.contains(&("longitude".into(), "13.41".into())));
        assert!(pairs.contains(&(
            "current".into(),
            "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code"
                .into()
        )));
        assert!(pairs.contains(&("wind_speed_unit".into(), "kmh".into())));
        assert!(pairs.contains(&("timezone".into(), "auto".into())));
    }

    #[tokio::test]
    async fn test_fetch_current_conditions() {
        let server = CannedServer::start("200 OK", SAMPLE).await;
        let client = ForecastClient::new(canned::client(), &server.base_url);

        let current = client
            .current(Coordinates::checked(52.52, 13.41).unwrap())
            .await
            .unwrap();
        assert_eq!(current.weather_code, Some(2));

        let heads = server.heads();
        assert_eq!(heads.len(), 1);
        assert!(heads[0].starts_with("GET /v1/forecast?latitude=52.52&longitude=13.41"));
    }

    #[tokio::test]
    async fn test_server_error_becomes_upstream_status() {
        let server = CannedServer::start("500 Internal Server Error", r#"{"error":true}"#).await;
        let client = ForecastClient::new(canned::client(), &server.base_url);

        let err = client
            .current(Coordinates::checked(52.52, 13.41).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UpstreamStatus {
                service: "weather",
                status: 500
            }
        ));
        assert_eq!(err.notice(), "Failed to fetch weather (HTTP 500)");
    }

    #[tokio::test]
    async fn test_unexpected_body_is_an_error() {
        let server = CannedServer::start("200 OK", r#"{"latitude": 1.0}"#).await;
        let client = ForecastClient::new(canned::client(), &server.base_url);

        let err = client
            .current(Coordinates::checked(0.0, 0.0).unwrap())
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
