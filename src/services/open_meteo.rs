//! Open-Meteo geocoding + current-weather client.
//!
//! Two sequential lookups per city: the geocoding search resolves a place
//! name to coordinates, then the forecast endpoint returns the current
//! conditions there. Temperature is requested in Fahrenheit and wind speed
//! in mph. No API key is needed.
//! See: https://open-meteo.com/en/docs

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;

/// Current conditions for a resolved location, built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_f: Option<f64>,
    pub windspeed_mph: Option<f64>,
    /// WMO weather interpretation code
    pub weather_code: Option<i64>,
    /// Local observation time as reported upstream (e.g. "2026-10-14T09:00")
    pub observed_at: Option<String>,
}

/// Anything that can turn a city name into current weather.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn resolve_weather(&self, city: &str) -> Result<WeatherRecord, AppError>;
}

// --- Open-Meteo JSON response types ---

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeMatch>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeMatch {
    name: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: Option<f64>,
    windspeed: Option<f64>,
    weathercode: Option<i64>,
    time: Option<String>,
}

impl CurrentWeather {
    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.windspeed.is_none()
            && self.weathercode.is_none()
            && self.time.is_none()
    }
}

/// Client for the Open-Meteo geocoding and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: &str, forecast_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            geocoding_url: geocoding_url.to_string(),
            forecast_url: forecast_url.to_string(),
        })
    }

    async fn geocode(&self, city: &str) -> Result<GeocodeMatch, AppError> {
        tracing::debug!("Geocoding '{}'", city);

        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[
                ("name", city),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("geocoding request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "geocoding returned HTTP {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("geocoding JSON parse error: {}", e))
        })?;

        body.results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| AppError::LocationNotFound(city.to_string()))
    }

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<CurrentWeather>, AppError> {
        tracing::debug!("Fetching current weather at ({}, {})", latitude, longitude);

        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("windspeed_unit", "mph".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("forecast request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "forecast returned HTTP {}",
                response.status()
            )));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("forecast JSON parse error: {}", e))
        })?;

        Ok(body.current_weather.filter(|current| !current.is_empty()))
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn resolve_weather(&self, city: &str) -> Result<WeatherRecord, AppError> {
        if city.trim().is_empty() {
            return Err(AppError::InvalidInput);
        }

        let place = self.geocode(city).await?;

        let current = self
            .current_weather(place.latitude, place.longitude)
            .await?
            .ok_or_else(|| AppError::NoWeatherData(city.to_string()))?;

        Ok(WeatherRecord {
            city: place.name.unwrap_or_else(|| city.to_string()),
            country: place.country.unwrap_or_default(),
            latitude: place.latitude,
            longitude: place.longitude,
            temperature_f: current.temperature,
            windspeed_mph: current.windspeed,
            weather_code: current.weathercode,
            observed_at: current.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> OpenMeteoClient {
        OpenMeteoClient::new(
            &format!("{}/v1/search", server.uri()),
            &format!("{}/v1/forecast", server.uri()),
            timeout,
        )
        .unwrap()
    }

    fn paris_geocode() -> serde_json::Value {
        serde_json::json!({
            "results": [{
                "id": 2988507,
                "name": "Paris",
                "latitude": 48.85341,
                "longitude": 2.3488,
                "country": "France",
                "admin1": "Île-de-France"
            }],
            "generationtime_ms": 0.8
        })
    }

    fn paris_forecast() -> serde_json::Value {
        serde_json::json!({
            "latitude": 48.86,
            "longitude": 2.3399997,
            "timezone": "Europe/Paris",
            "current_weather_units": {
                "temperature": "°F",
                "windspeed": "mp/h"
            },
            "current_weather": {
                "time": "2026-10-14T09:00",
                "interval": 900,
                "temperature": 54.3,
                "windspeed": 7.6,
                "winddirection": 230,
                "is_day": 1,
                "weathercode": 3
            }
        })
    }

    async fn mount_geocode(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_resolves_city_to_current_weather() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .and(query_param("count", "1"))
            .and(query_param("language", "en"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_geocode()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85341"))
            .and(query_param("longitude", "2.3488"))
            .and(query_param("current_weather", "true"))
            .and(query_param("timezone", "auto"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("windspeed_unit", "mph"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let record = client.resolve_weather("Paris").await.unwrap();

        assert_eq!(
            record,
            WeatherRecord {
                city: "Paris".to_string(),
                country: "France".to_string(),
                latitude: 48.85341,
                longitude: 2.3488,
                temperature_f: Some(54.3),
                windspeed_mph: Some(7.6),
                weather_code: Some(3),
                observed_at: Some("2026-10-14T09:00".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_name_and_country_fallbacks() {
        let server = MockServer::start().await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "latitude": 1.0, "longitude": 2.0 }]
            })),
        )
        .await;
        mount_forecast(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current_weather": { "temperature": 80.0 }
            })),
        )
        .await;

        let client = client_for(&server, Duration::from_secs(5));
        let record = client.resolve_weather("Nowhereville").await.unwrap();

        assert_eq!(record.city, "Nowhereville");
        assert_eq!(record.country, "");
        assert_eq!(record.temperature_f, Some(80.0));
        assert_eq!(record.windspeed_mph, None);
        assert_eq!(record.observed_at, None);
    }

    #[tokio::test]
    async fn test_blank_city_is_rejected_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        for city in ["", "   ", "\t\n"] {
            let err = client.resolve_weather(city).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput), "city: {:?}", city);
        }
    }

    #[tokio::test]
    async fn test_no_geocoding_match_is_location_not_found() {
        let server = MockServer::start().await;
        // Open-Meteo omits `results` entirely when nothing matches.
        mount_geocode(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "generationtime_ms": 0.5 })),
        )
        .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_weather("Zzqxnotacity123").await.unwrap_err();

        match err {
            AppError::LocationNotFound(city) => assert_eq!(city, "Zzqxnotacity123"),
            other => panic!("expected LocationNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_results_is_location_not_found() {
        let server = MockServer::start().await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
        )
        .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_weather("Atlantis").await.unwrap_err();
        assert!(matches!(err, AppError::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn test_geocoding_server_error_is_upstream_unavailable() {
        let server = MockServer::start().await;
        mount_geocode(&server, ResponseTemplate::new(503)).await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_weather("Paris").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_forecast_server_error_is_upstream_unavailable() {
        let server = MockServer::start().await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(paris_geocode()),
        )
        .await;
        mount_forecast(&server, ResponseTemplate::new(500)).await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_weather("Paris").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_current_weather_is_no_weather_data() {
        let server = MockServer::start().await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(paris_geocode()),
        )
        .await;
        mount_forecast(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "latitude": 48.86 })),
        )
        .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_weather("Paris").await.unwrap_err();
        assert!(matches!(err, AppError::NoWeatherData(_)));
    }

    #[tokio::test]
    async fn test_empty_current_weather_is_no_weather_data() {
        let server = MockServer::start().await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(paris_geocode()),
        )
        .await;
        mount_forecast(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "current_weather": {} })),
        )
        .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_weather("Paris").await.unwrap_err();
        assert!(matches!(err, AppError::NoWeatherData(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_unavailable() {
        let server = MockServer::start().await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(paris_geocode())
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let client = client_for(&server, Duration::from_millis(100));
        let err = client.resolve_weather("Paris").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }
}
