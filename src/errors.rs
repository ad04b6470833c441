use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("City name is required for weather lookup")]
    InvalidInput,

    #[error("Could not find location for '{0}'")]
    LocationNotFound(String),

    #[error("Weather service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("No current weather data available for '{0}'")]
    NoWeatherData(String),

    #[error("Completion service error: {0}")]
    ModelUnavailable(String),

    #[error("Completion service is not configured")]
    Unconfigured,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            _ => {
                tracing::error!("Unhandled error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
