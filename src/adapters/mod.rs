//! Adapters - Implementations of port interfaces and the HTTP surface.
//!
//! - `openai` - reqwest implementation of the assistant backend port
//! - `http` - axum routes, handlers, and DTOs for the chat endpoint

pub mod http;
pub mod openai;
