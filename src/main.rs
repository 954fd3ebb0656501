//! Assistant Relay server binary.
//!
//! Loads configuration from the environment, wires the OpenAI backend into
//! the turn handler, and serves the chat endpoint plus the static chat page.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use assistant_relay::adapters::http::{app_router, ChatAppState};
use assistant_relay::adapters::openai::{OpenAiBackend, OpenAiConfig};
use assistant_relay::application::{TurnHandler, TurnSettings};
use assistant_relay::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let api_key = config
        .assistant
        .api_key
        .clone()
        .ok_or("assistant API key is not configured")?;

    let backend = OpenAiBackend::new(
        OpenAiConfig::new(api_key)
            .with_base_url(config.assistant.base_url.clone())
            .with_timeout(config.assistant.timeout()),
    );

    let settings = TurnSettings {
        assistant_id: config.assistant.assistant_id.clone(),
        poll_interval: config.assistant.poll_interval(),
        poll_ceiling: config.assistant.poll_ceiling(),
        fallback_reply: config.assistant.fallback_reply.clone(),
    };

    let state = ChatAppState::new(Arc::new(TurnHandler::new(Arc::new(backend), settings)));
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
