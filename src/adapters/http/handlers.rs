//! HTTP handlers for the chat endpoint.
//!
//! These handlers connect Axum routes to the turn handler and map relay
//! errors onto HTTP statuses: `InvalidInput` is 400, `Misconfigured` and
//! `Backend` are 500, `Timeout` is 504. Error bodies carry the thread
//! handle when one exists, whether the caller sent it or the turn minted
//! it, so the browser can retry on the same conversation.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use crate::application::{TurnFailure, TurnHandler};
use crate::domain::{RelayError, ThreadId, TurnRequest, Utterance};

use super::dto::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for the chat endpoint.
///
/// Built once at startup and cloned per request; nothing in it is mutable.
#[derive(Clone)]
pub struct ChatAppState {
    pub turns: Arc<TurnHandler>,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(turns: Arc<TurnHandler>) -> Self {
        Self { turns }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Relay one user message to the assistant.
///
/// # Errors
/// - 400 Bad Request: missing or empty `message`
/// - 500 Internal Server Error: relay misconfigured or backend failure
/// - 504 Gateway Timeout: run did not finish within the poll ceiling
pub async fn post_chat(
    State(state): State<ChatAppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    // The caller's handle, echoed back if the input never reaches the relay.
    let echo_thread = request.thread_handle().map(str::to_owned);

    let utterance = Utterance::new(request.message.clone().unwrap_or_default())
        .map_err(|err| ChatApiError::new(err, echo_thread))?;

    let turn = TurnRequest::new(utterance, request.thread_handle().map(ThreadId::new));

    // A failed turn still carries the thread handle when one exists, even a
    // handle minted during this very call.
    let result = state
        .turns
        .handle_turn(turn)
        .await
        .map_err(ChatApiError::from)?;

    Ok((
        StatusCode::OK,
        Json(ChatResponse {
            answer: result.reply_text,
            thread_id: result.thread_id.to_string(),
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /healthz
// ════════════════════════════════════════════════════════════════════════════════

/// GET /healthz - Liveness probe.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error that converts a relay error to an HTTP response.
#[derive(Debug)]
pub struct ChatApiError {
    error: RelayError,
    thread_id: Option<String>,
}

impl ChatApiError {
    /// Wraps a relay error together with the caller's thread handle.
    pub fn new(error: RelayError, thread_id: Option<String>) -> Self {
        Self { error, thread_id }
    }
}

impl From<TurnFailure> for ChatApiError {
    fn from(failure: TurnFailure) -> Self {
        Self::new(failure.error, failure.thread_id.map(|id| id.to_string()))
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, details) = match &self.error {
            RelayError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.to_string(), None),
            RelayError::Misconfigured(detail) => {
                error!("relay misconfigured: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The relay is not configured correctly.".to_string(),
                    Some(detail.to_string()),
                )
            }
            RelayError::Backend(detail) => {
                error!("backend failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not get a reply from the assistant.".to_string(),
                    Some(detail.clone()),
                )
            }
            RelayError::Timeout { .. } => {
                error!("{}", self.error);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "The assistant took too long to reply. Please try again.".to_string(),
                    Some(self.error.to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            details,
            thread_id: self.thread_id,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_returns_400() {
        let err = ChatApiError::new(RelayError::InvalidInput("message is required"), None);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn misconfigured_returns_500() {
        let err = ChatApiError::new(RelayError::Misconfigured("assistant id is not set"), None);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn backend_failure_returns_500() {
        let err = ChatApiError::new(
            RelayError::Backend("run ended with status failed".to_string()),
            Some("s1".to_string()),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_returns_504() {
        let err = ChatApiError::new(RelayError::Timeout { ceiling_secs: 60 }, Some("s1".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
