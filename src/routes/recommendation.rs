//! Recommendation HTTP endpoint.
//!
//! - POST /api/get_recommendation  body: {"city": "Paris"}

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::services::recommendation::{RecommendationResult, RecommendationService};

const MISSING_CITY_ERROR: &str = "Please provide a city name.";

/// Shared application state.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) recommender: Arc<RecommendationService>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    /// City to look up (e.g. "Paris")
    #[serde(default)]
    pub city: Option<String>,
}

/// Get a weather summary and outfit recommendation for a city.
///
/// Always answers 200 once a city is supplied; lookup and model failures
/// come back as a friendly `text` with an empty `sources` list.
#[utoipa::path(
    post,
    path = "/api/get_recommendation",
    tag = "Recommendation",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Recommendation or user-facing failure message", body = RecommendationResult),
        (status = 400, description = "City missing from the request body", body = ErrorResponse),
    )
)]
pub async fn get_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResult>, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable recommendation body: {}", rejection);
            RecommendationRequest::default()
        }
    };

    let city = request
        .city
        .filter(|city| !city.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_CITY_ERROR.to_string()))?;

    tracing::info!("Received city: {}", city);

    Ok(Json(state.recommender.generate(&city).await))
}
