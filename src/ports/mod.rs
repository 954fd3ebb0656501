//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay core and the outside world. Adapters implement these ports.
//!
//! - `AssistantBackend` - Port for the threads/runs assistant service

mod assistant_backend;

pub use assistant_backend::{
    AssistantBackend, BackendError, ContentPart, Run, RunStatus, TextValue, ThreadMessage,
};
