pub mod health;
pub mod recommendation;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use recommendation::AppState;

/// Build the API router with CORS and request tracing.
pub(crate) fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::liveness))
        .route("/api/health", get(health::health_check))
        .route(
            "/api/get_recommendation",
            post(recommendation::get_recommendation),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
