//! Axum routes for the relay.
//!
//! REST Endpoints:
//! - POST /api/chat - Relay one user message to the assistant
//! - GET /healthz - Liveness probe
//!
//! Everything else falls through to the static chat page directory.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::handlers::{healthz, post_chat, ChatAppState};

/// Creates routes for the chat endpoint.
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new().route("/chat", post(post_chat))
}

/// Builds the full application router: API routes, the health probe, and
/// the static chat page, with tracing, CORS, and timeout layers applied.
pub fn app_router(state: ChatAppState, config: &ServerConfig) -> Router {
    let chat_page = config.static_dir.join("chat.html");

    Router::new()
        .nest("/api", chat_routes())
        .route("/healthz", get(healthz))
        .route_service("/", ServeFile::new(chat_page))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .with_state(state)
}

/// CORS layer from the configured origin list; permissive when none is set
/// (the chat page is normally served from this same process).
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
}
