//! HTTP adapter - the chat endpoint exposed to the browser page.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse};
pub use handlers::{healthz, post_chat, ChatApiError, ChatAppState};
pub use routes::{app_router, chat_routes};
