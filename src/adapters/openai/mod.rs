//! OpenAI adapter - Assistants API implementation of the backend port.

mod backend;

pub use backend::{OpenAiBackend, OpenAiConfig};
