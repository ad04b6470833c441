//! Weather-to-outfit narrative generation.
//!
//! Resolves live weather for a city, asks the completion model for a
//! two-paragraph description and outfit suggestion, and strips any markup
//! from the answer. Every failure is answered with a fixed apology and an
//! empty source list; nothing upstream ever reaches the caller.

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::markdown::strip_markdown;
use crate::services::open_meteo::{WeatherRecord, WeatherSource};
use crate::services::openai::{ChatCompletion, ChatMessage};

pub const NOT_CONFIGURED_MESSAGE: &str = "The AI backend is not configured yet because the OpenAI API key is missing on the server.";
pub const MISSING_CITY_MESSAGE: &str = "I need a city name to help you decide what to wear.";
pub const WEATHER_UNAVAILABLE_MESSAGE: &str = "I couldn't fetch the live weather data for that location right now. Try another city or try again in a bit.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "I ran into an issue talking to the AI service. Try again in a moment.";

pub const SOURCE_TITLE: &str = "Open-Meteo (current weather)";
pub const SOURCE_URI: &str = "https://open-meteo.com/";

const SYSTEM_PROMPT: &str = "\
You are a friendly, witty personal stylist and weather guide. \
You are given REAL, live weather data for a location. \
Use ONLY this weather data. Do not make up different temperatures or conditions. \
First, briefly describe what the weather feels like to a normal person. \
Then, in a second paragraph, suggest what they should wear for a casual day out. \
Respond in plain, natural language only. Do NOT use markdown, headings, lists, \
asterisks, hashes, or bullet points.";

const USER_QUESTION: &str =
    "Based only on this, what is the weather like and what should I wear for a casual day out?";

/// Attribution for the data behind a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Recommendation text plus attribution.
///
/// `sources` is empty unless the text came from a successful model call.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecommendationResult {
    /// Plain-language weather description and outfit suggestion
    pub text: String,
    pub sources: Vec<Source>,
}

impl RecommendationResult {
    fn apology(text: &str) -> Self {
        Self {
            text: text.to_string(),
            sources: Vec::new(),
        }
    }

    fn from_model(text: String) -> Self {
        Self {
            text,
            sources: vec![Source {
                title: SOURCE_TITLE.to_string(),
                uri: SOURCE_URI.to_string(),
            }],
        }
    }
}

/// Narrative generator over injected weather and completion capabilities.
///
/// `llm` is `None` when no completion credential was configured.
#[derive(Clone)]
pub struct RecommendationService {
    weather: Arc<dyn WeatherSource>,
    llm: Option<Arc<dyn ChatCompletion>>,
    model: String,
}

impl RecommendationService {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        llm: Option<Arc<dyn ChatCompletion>>,
        model: &str,
    ) -> Self {
        Self {
            weather,
            llm,
            model: model.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn generate(&self, city: &str) -> RecommendationResult {
        let Some(llm) = &self.llm else {
            tracing::warn!("Recommendation for '{}' skipped: {}", city, AppError::Unconfigured);
            return RecommendationResult::apology(NOT_CONFIGURED_MESSAGE);
        };

        if city.trim().is_empty() {
            return RecommendationResult::apology(MISSING_CITY_MESSAGE);
        }

        let weather = match self.weather.resolve_weather(city).await {
            Ok(weather) => weather,
            Err(e) => {
                tracing::warn!("Open-Meteo lookup for '{}' failed: {}", city, e);
                return RecommendationResult::apology(WEATHER_UNAVAILABLE_MESSAGE);
            }
        };

        tracing::debug!(
            "Resolved '{}' to {}, {} ({}, {})",
            city,
            weather.city,
            weather.country,
            weather.latitude,
            weather.longitude
        );

        let messages = build_prompt(&weather);

        match llm.complete(&self.model, &messages).await {
            Ok(raw) => RecommendationResult::from_model(strip_markdown(&raw)),
            Err(e) => {
                tracing::error!("Completion for '{}' failed: {}", city, e);
                RecommendationResult::apology(MODEL_UNAVAILABLE_MESSAGE)
            }
        }
    }
}

fn or_unknown<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Readings keep their decimal point: `54.0`, not `54`.
fn reading_or_unknown(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:?}", v))
        .unwrap_or_else(|| "unknown".to_string())
}

/// One-line description of the weather fed to the model.
pub(crate) fn weather_summary(weather: &WeatherRecord) -> String {
    format!(
        "Location: {}, {}. Temperature: {}°F. Wind speed: {} mph. Weather code: {}. Time of observation: {}.",
        weather.city,
        weather.country,
        reading_or_unknown(weather.temperature_f),
        reading_or_unknown(weather.windspeed_mph),
        or_unknown(&weather.weather_code),
        or_unknown(&weather.observed_at),
    )
}

pub(crate) fn build_prompt(weather: &WeatherRecord) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Here is the live weather data:\n{}\n\n{}",
            weather_summary(weather),
            USER_QUESTION
        )),
    ]
}
