//! Turn handler - the conversation-thread lifecycle and run-completion core.
//!
//! One call relays exactly one user utterance: ensure a thread exists,
//! append the utterance, trigger a run, poll until a terminal status under
//! an overall deadline, then extract the newest reply.
//!
//! There is no rollback on partial failure. If the run fails after the
//! message was appended, the appended message stays in the thread; the
//! utterance is delivered at least once, never compensated. The relay also
//! does not serialize concurrent calls on the same thread handle; the
//! backend's own concurrency control is the only protection.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::domain::{RelayError, ThreadId, TurnRequest, TurnResult};
use crate::ports::{AssistantBackend, Run};

/// Upper bound on the backoff between status polls.
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Settings for a turn, fixed at startup.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    /// Backend assistant to run against; absence fails turns as misconfigured.
    pub assistant_id: Option<String>,
    /// Initial delay between run-status polls; doubles up to a cap.
    pub poll_interval: Duration,
    /// Overall deadline for a run to reach a terminal status.
    pub poll_ceiling: Duration,
    /// Reply substituted when a completed run produced no text segment.
    pub fallback_reply: String,
}

/// A failed turn together with the thread handle it ran against.
///
/// The handle is present whenever a thread exists for the turn, including
/// one minted during this very call before the failure, so the caller can
/// retry on the same conversation instead of orphaning it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct TurnFailure {
    /// What went wrong.
    pub error: RelayError,
    /// Handle of the thread the turn touched, if one was ever established.
    pub thread_id: Option<ThreadId>,
}

impl TurnFailure {
    fn new(error: RelayError, thread_id: Option<ThreadId>) -> Self {
        Self { error, thread_id }
    }
}

/// Relays single turns to the assistant backend.
///
/// Holds only immutable configuration and a shared backend client; each
/// call is independent and no state is kept across turns.
pub struct TurnHandler {
    backend: Arc<dyn AssistantBackend>,
    settings: TurnSettings,
}

impl TurnHandler {
    /// Creates a new turn handler.
    pub fn new(backend: Arc<dyn AssistantBackend>, settings: TurnSettings) -> Self {
        Self { backend, settings }
    }

    /// Relays one user utterance and returns the assistant's reply.
    ///
    /// The five backend calls happen strictly in sequence; the thread
    /// handle is minted here if and only if the request carries none.
    ///
    /// # Errors
    ///
    /// Fails with a [`TurnFailure`] wrapping:
    ///
    /// - [`RelayError::Misconfigured`] when no assistant id is configured
    ///   (checked before any backend call)
    /// - [`RelayError::Backend`] for any downstream failure, including a
    ///   terminal run status other than completed
    /// - [`RelayError::Timeout`] when the run does not reach a terminal
    ///   status before the configured ceiling
    ///
    /// The failure carries the thread handle whenever one exists, even a
    /// handle minted by this call before the failure.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnResult, TurnFailure> {
        let assistant_id = match self
            .settings
            .assistant_id
            .as_deref()
            .filter(|id| !id.is_empty())
        {
            Some(id) => id,
            None => {
                return Err(TurnFailure::new(
                    RelayError::Misconfigured("assistant id is not set"),
                    request.thread_id,
                ))
            }
        };

        let thread_id = match request.thread_id {
            Some(id) => id,
            // The only point a new handle is minted.
            None => match self.backend.create_thread().await {
                Ok(id) => {
                    debug!(thread_id = %id, "created new thread");
                    id
                }
                Err(err) => return Err(TurnFailure::new(err.into(), None)),
            },
        };

        self.run_turn(&thread_id, assistant_id, request.utterance.as_str())
            .await
            .map(|reply_text| TurnResult {
                reply_text,
                thread_id: thread_id.clone(),
            })
            .map_err(|error| TurnFailure::new(error, Some(thread_id)))
    }

    /// Runs one turn against an established thread, returning the reply.
    async fn run_turn(
        &self,
        thread_id: &ThreadId,
        assistant_id: &str,
        utterance: &str,
    ) -> Result<String, RelayError> {
        self.backend.add_user_message(thread_id, utterance).await?;

        let run = self.backend.create_run(thread_id, assistant_id).await?;
        debug!(thread_id = %thread_id, run_id = %run.id, "run started");

        let run = self.wait_for_terminal(thread_id, run).await?;

        if !run.status.is_success() {
            warn!(
                thread_id = %thread_id,
                run_id = %run.id,
                status = %run.status,
                "run ended without completing"
            );
            return Err(RelayError::Backend(format!(
                "run ended with status {}",
                run.status
            )));
        }

        let messages = self.backend.latest_messages(thread_id, 1).await?;
        match messages.first().and_then(|m| m.first_text()) {
            Some(text) => Ok(text.to_owned()),
            // The run produced something, just nothing textual; a degraded
            // reply is preferable to failing the whole turn.
            None => {
                warn!(thread_id = %thread_id, "newest message has no text segment");
                Ok(self.settings.fallback_reply.clone())
            }
        }
    }

    /// Polls the run until it reaches a terminal status or the ceiling
    /// expires. No cleanup is attempted for a run abandoned at the ceiling.
    async fn wait_for_terminal(
        &self,
        thread_id: &ThreadId,
        mut run: Run,
    ) -> Result<Run, RelayError> {
        let deadline = Instant::now() + self.settings.poll_ceiling;
        let mut interval = self.settings.poll_interval;

        while !run.status.is_terminal() {
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    thread_id = %thread_id,
                    run_id = %run.id,
                    "abandoning run poll at ceiling"
                );
                return Err(RelayError::Timeout {
                    ceiling_secs: self.settings.poll_ceiling.as_secs(),
                });
            }

            sleep(interval.min(deadline - now)).await;
            interval = (interval * 2).min(MAX_POLL_INTERVAL);

            run = self.backend.get_run(thread_id, &run.id).await?;
            debug!(run_id = %run.id, status = %run.status, "polled run");
        }

        Ok(run)
    }
}
