//! Turn request/result types and their validation rules.

use serde::{Deserialize, Serialize};

use super::error::RelayError;

/// Opaque handle to a backend conversation thread.
///
/// Minted by the backend on thread creation and echoed back by the browser
/// on subsequent turns. The relay never invalidates a handle; thread expiry
/// is fully owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Wraps an existing backend thread identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThreadId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A validated user utterance.
///
/// Construction is the single validation point: an utterance that is empty
/// or whitespace-only is rejected before any backend call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    /// Validates and wraps a user message.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidInput`] when the message is empty or
    /// contains only whitespace.
    pub fn new(message: impl Into<String>) -> Result<Self, RelayError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(RelayError::InvalidInput("message is required"));
        }
        Ok(Self(message))
    }

    /// Returns the utterance text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Utterance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One relay call: a validated utterance plus an optional thread handle.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// The user's message for this turn.
    pub utterance: Utterance,
    /// Thread to continue, or `None` to start a new conversation.
    pub thread_id: Option<ThreadId>,
}

impl TurnRequest {
    /// Creates a new turn request.
    pub fn new(utterance: Utterance, thread_id: Option<ThreadId>) -> Self {
        Self {
            utterance,
            thread_id,
        }
    }
}

/// Successful outcome of a relay call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    /// The assistant's reply text (or the configured fallback).
    pub reply_text: String,
    /// Handle the caller must echo back on the next turn.
    pub thread_id: ThreadId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn utterance_rejects_empty_message() {
        let result = Utterance::new("");
        assert!(matches!(result, Err(RelayError::InvalidInput(_))));
    }

    #[test]
    fn utterance_rejects_whitespace_only_message() {
        let result = Utterance::new("   \t\n  ");
        assert!(matches!(result, Err(RelayError::InvalidInput(_))));
    }

    #[test]
    fn utterance_preserves_content() {
        let utterance = Utterance::new("  hello there  ").unwrap();
        assert_eq!(utterance.as_str(), "  hello there  ");
    }

    #[test]
    fn thread_id_round_trips_through_display() {
        let id = ThreadId::new("thread_abc123");
        assert_eq!(id.to_string(), "thread_abc123");
        assert_eq!(id.as_str(), "thread_abc123");
    }

    #[test]
    fn thread_id_serializes_transparently() {
        let id = ThreadId::new("thread_abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"thread_abc123\"");
    }

    #[test]
    fn turn_request_without_thread_starts_fresh() {
        let request = TurnRequest::new(Utterance::new("hi").unwrap(), None);
        assert!(request.thread_id.is_none());
    }

    proptest! {
        #[test]
        fn utterance_accepts_any_message_with_visible_content(
            message in "\\s*[a-zA-Z0-9?!.,]{1,64}\\s*"
        ) {
            let utterance = Utterance::new(message.clone()).unwrap();
            prop_assert_eq!(utterance.as_str(), message.as_str());
        }

        #[test]
        fn utterance_rejects_any_whitespace_only_message(message in "\\s{0,16}") {
            prop_assert!(Utterance::new(message).is_err());
        }
    }
}
