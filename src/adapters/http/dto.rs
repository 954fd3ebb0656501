//! HTTP DTOs for the chat endpoint.
//!
//! These types decouple the wire format from domain types. Field names are
//! what the browser page sends and expects (`message`/`threadId` in,
//! `answer`/`threadId` out).

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message. Validated as non-empty by the handler.
    #[serde(default)]
    pub message: Option<String>,
    /// Thread to continue; omitted or empty on the first turn.
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl ChatRequest {
    /// Returns the thread handle, treating an empty string as absent.
    pub fn thread_handle(&self) -> Option<&str> {
        self.thread_id.as_deref().filter(|id| !id.is_empty())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful reply from `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// The assistant's reply text.
    pub answer: String,
    /// Handle the browser must echo back on its next turn.
    pub thread_id: String,
}

/// Error body shared by all failure responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// User-safe error description.
    pub error: String,
    /// Diagnostic detail, when one is safe to expose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The caller's thread handle when one exists, so the client can retry
    /// on the same conversation; `null` if none was ever established.
    pub thread_id: Option<String>,
}

/// Body of `GET /healthz`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
