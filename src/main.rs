// Weather Stylist API v0.1
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod routes;
mod services;

use config::AppConfig;
use errors::AppError;
use routes::recommendation::AppState;
use services::open_meteo::OpenMeteoClient;
use services::openai::{ChatCompletion, OpenAiClient};
use services::recommendation::RecommendationService;

/// Weather Stylist API OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Stylist API",
        version = "0.1.0",
        description = "Looks up live weather for a city via Open-Meteo and asks a \
            chat-completion model for a plain-language description of how it feels \
            plus an outfit suggestion for a casual day out.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Liveness and service status"),
        (name = "Recommendation", description = "Weather-based outfit recommendations"),
    ),
    paths(
        routes::health::liveness,
        routes::health::health_check,
        routes::recommendation::get_recommendation,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::recommendation::RecommendationRequest,
            services::recommendation::RecommendationResult,
            services::recommendation::Source,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_stylist_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    let weather = OpenMeteoClient::new(
        &config.geocoding_url,
        &config.forecast_url,
        config.http_timeout,
    )?;

    let llm: Option<Arc<dyn ChatCompletion>> = match &config.openai_api_key {
        Some(key) => {
            let client = OpenAiClient::new(&config.openai_base_url, key, config.openai_timeout)?;
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!(
                "OPENAI_API_KEY is not set; recommendations will report the AI backend as not configured"
            );
            None
        }
    };

    let app_state = AppState {
        recommender: Arc::new(RecommendationService::new(
            Arc::new(weather),
            llm,
            &config.openai_model,
        )),
    };

    let app = routes::router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind TCP listener: {}", e)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server terminated unexpectedly: {}", e)))
}
