use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::recommendation::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when healthy, "degraded" when the AI backend is unconfigured)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether a completion credential is configured
    pub ai_configured: bool,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Process is up", body = String, content_type = "text/plain"),
    )
)]
pub async fn liveness() -> &'static str {
    "OK"
}

/// Health check endpoint.
///
/// Returns status "degraded" (still 200) when no completion credential is
/// configured, since every recommendation will then be the fixed
/// "not configured" message.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ai_ok = state.recommender.is_configured();

    Json(HealthResponse {
        status: if ai_ok {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_configured: ai_ok,
    })
}
