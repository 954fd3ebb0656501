//! Assistant Backend Port - Interface for the threads/runs assistant service.
//!
//! This port abstracts the external conversational backend that owns all
//! thread state. The relay only ever performs five operations against it,
//! strictly in sequence within a single turn: create a thread (first turn
//! only), append the user message, trigger a run, poll the run status, and
//! fetch the newest message.
//!
//! # Design
//!
//! - Thread state lives entirely on the backend; the relay keeps nothing
//! - The run status vocabulary is backend-defined; unrecognized statuses
//!   deserialize to [`RunStatus::Unknown`] and count as terminal
//! - Error types for common failure modes (auth, rate limits, network)

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::ThreadId;

/// Port for the assistant threads/runs backend.
///
/// Implementations connect to the external assistant service and translate
/// between its API and the relay's types. A single shared instance must be
/// safe for concurrent use; the relay provides no per-thread locking.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Creates a new conversation thread and returns its handle.
    async fn create_thread(&self) -> Result<ThreadId, BackendError>;

    /// Appends a user-authored message to the thread.
    async fn add_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), BackendError>;

    /// Starts a run processing the thread's pending input.
    async fn create_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &str,
    ) -> Result<Run, BackendError>;

    /// Fetches the current state of a run.
    async fn get_run(&self, thread_id: &ThreadId, run_id: &str) -> Result<Run, BackendError>;

    /// Fetches the newest messages in the thread, newest first.
    async fn latest_messages(
        &self,
        thread_id: &ThreadId,
        limit: u32,
    ) -> Result<Vec<ThreadMessage>, BackendError>;
}

/// A backend run: one unit of "process pending input for a thread".
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    /// Backend-assigned run identifier.
    pub id: String,
    /// Current lifecycle status.
    pub status: RunStatus,
}

/// Lifecycle status of a run.
///
/// The vocabulary is owned by the backend; any status this relay does not
/// recognize deserializes to [`RunStatus::Unknown`], which is treated as
/// terminal so the poll loop can never spin on a status it cannot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Expired,
    Cancelled,
    Incomplete,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Returns true once no further status transition will occur.
    ///
    /// `RequiresAction` is terminal for this relay: it never submits tool
    /// outputs, so a run parked there would otherwise wait out the ceiling.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }

    /// Returns true only for the one successful terminal status.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Expired => "expired",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// One message stored in a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    /// Who authored the message ("user" or "assistant").
    pub role: String,
    /// Typed content segments; a message may mix text with other kinds.
    pub content: Vec<ContentPart>,
}

impl ThreadMessage {
    /// Returns the first text segment, if the message has one.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|part| match part {
            ContentPart::Text { text } => Some(text.value.as_str()),
            ContentPart::Other => None,
        })
    }
}

/// A typed content segment within a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text segment.
    Text { text: TextValue },
    /// Any non-text segment (images, files); opaque to the relay.
    #[serde(other)]
    Other,
}

/// The value payload of a text content segment.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub value: String,
}

/// Assistant backend errors.
#[derive(Debug, Error)]
pub enum BackendError {
    /// API key was rejected.
    #[error("authentication with the assistant backend failed")]
    AuthenticationFailed,

    /// Backend rate limited the request.
    #[error("assistant backend rate limited the request")]
    RateLimited,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// A single backend request timed out.
    #[error("backend request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured per-request timeout.
        timeout_secs: u64,
    },

    /// Backend returned a non-success HTTP status.
    #[error("assistant backend returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error body (or a placeholder when unreadable).
        message: String,
    },

    /// Failed to parse a backend response.
    #[error("failed to parse backend response: {0}")]
    Parse(String),
}

impl BackendError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an API status error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
