//! Relay error taxonomy.

use thiserror::Error;

use crate::ports::BackendError;

/// Errors a relay call can surface to the HTTP layer.
///
/// Each variant maps to a distinct HTTP status: `InvalidInput` is the
/// caller's fault (400), `Misconfigured` is a deployment error (500),
/// `Backend` covers every downstream failure including a non-success
/// terminal run status (500), and `Timeout` is the poll ceiling being
/// exceeded (504).
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller's request was malformed.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// A required deployment setting is absent.
    #[error("relay is misconfigured: {0}")]
    Misconfigured(&'static str),

    /// The assistant backend failed, or the run ended in a non-success
    /// terminal status.
    #[error("assistant backend error: {0}")]
    Backend(String),

    /// The run did not reach a terminal status before the poll ceiling.
    #[error("run did not finish within {ceiling_secs}s")]
    Timeout {
        /// The configured overall poll ceiling.
        ceiling_secs: u64,
    },
}

impl From<BackendError> for RelayError {
    fn from(err: BackendError) -> Self {
        RelayError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_converts_to_backend_variant() {
        let err: RelayError = BackendError::AuthenticationFailed.into();
        assert!(matches!(err, RelayError::Backend(_)));
    }

    #[test]
    fn timeout_displays_ceiling() {
        let err = RelayError::Timeout { ceiling_secs: 60 };
        assert_eq!(err.to_string(), "run did not finish within 60s");
    }

    #[test]
    fn invalid_input_displays_bare_message() {
        let err = RelayError::InvalidInput("message is required");
        assert_eq!(err.to_string(), "message is required");
    }
}
