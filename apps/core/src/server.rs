//! HTTP surface of the chat backend.

use crate::actors::supervisor::SupervisorHandle;
use crate::brain::IntentCatalog;
use crate::config::Settings;
use crate::error::AppError;
use crate::models::{ChatRequest, ChatResponse, HealthResponse, IntentListResponse};
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

pub const SERVICE_NAME: &str = "Telecom Chatbot API";
/// Body detail for a chat request that could not be completed.
pub const CHAT_FAILURE_DETAIL: &str = "Error processing request";

/// Application state shared across handlers
pub struct AppState {
    pub supervisor: SupervisorHandle,
    pub catalog: Arc<IntentCatalog>,
}

type AppStateArc = Arc<AppState>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "Chat request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": CHAT_FAILURE_DETAIL })),
        )
            .into_response()
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
}

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/chat", post(chat))
}

pub fn intent_routes() -> Router<AppStateArc> {
    Router::new().route("/intents", get(list_intents))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    info!(user_id = %req.user_id, "Chat request received");
    let exchange = state.supervisor.process_chat(req).await?;
    Ok(Json(exchange.into()))
}

async fn list_intents(State(state): State<AppStateArc>) -> Json<IntentListResponse> {
    let intents = state.catalog.names();
    let total = intents.len();
    Json(IntentListResponse { intents, total })
}

// ============================================================================
// Server
// ============================================================================

/// CORS policy for the configured browser origins.
///
/// A `*` entry opens the API to any origin; credentials are then not allowed.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Builds the full application router.
pub fn router(state: AppStateArc, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(chat_routes())
        .merge(intent_routes())
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c, then stop the supervisor.
pub async fn run(state: AppState, settings: &Settings) -> anyhow::Result<()> {
    let state = Arc::new(state);
    let app = router(Arc::clone(&state), &settings.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.supervisor.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
