use std::time::Duration;

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Completion service credential. `None` when unset or empty.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub geocoding_url: String,
    pub forecast_url: String,
    /// Timeout for each Open-Meteo call.
    pub http_timeout: Duration,
    /// Timeout for a chat-completion call.
    pub openai_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT must be a valid u16, got '{}'", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let http_timeout = env_secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let openai_timeout = env_secs("OPENAI_TIMEOUT_SECS", DEFAULT_OPENAI_TIMEOUT_SECS)?;

        Ok(Self {
            port,
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            geocoding_url: env_or("GEOCODING_URL", DEFAULT_GEOCODING_URL),
            forecast_url: env_or("FORECAST_URL", DEFAULT_FORECAST_URL),
            http_timeout,
            openai_timeout,
        })
    }
}

fn env_secs(key: &str, default: u64) -> Result<Duration, AppError> {
    let secs = match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| {
            AppError::Config(format!(
                "{} must be a whole number of seconds, got '{}'",
                key, raw
            ))
        })?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
