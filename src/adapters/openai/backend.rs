//! OpenAI Assistants API implementation of [`AssistantBackend`].
//!
//! Talks to the v2 threads/runs REST surface:
//!
//! - `POST /threads`
//! - `POST /threads/{id}/messages`
//! - `POST /threads/{id}/runs`
//! - `GET  /threads/{id}/runs/{run_id}`
//! - `GET  /threads/{id}/messages?order=desc&limit=N`
//!
//! Every request carries bearer auth and the `OpenAI-Beta: assistants=v2`
//! header. The adapter does not retry; the relay's caller resubmits.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::ThreadId;
use crate::ports::{AssistantBackend, BackendError, Run, ThreadMessage};

const ASSISTANTS_BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Configuration for the OpenAI backend adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI Assistants API backend.
pub struct OpenAiBackend {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiBackend {
    /// Creates a new backend with the given configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.config.api_key())
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                BackendError::network(format!("Connection failed: {e}"))
            } else {
                BackendError::network(e.to_string())
            }
        })?;

        self.check_status(response).await
    }

    /// Maps non-success HTTP statuses to backend errors.
    async fn check_status(&self, response: Response) -> Result<Response, BackendError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(BackendError::AuthenticationFailed),
            429 => Err(BackendError::RateLimited),
            code => Err(BackendError::api(code, api_error_message(&error_body))),
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, BackendError> {
        response
            .json()
            .await
            .map_err(|e| BackendError::parse(e.to_string()))
    }
}

/// Pulls `error.message` out of an API error body, falling back to the raw
/// body when it is not the usual JSON envelope.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl AssistantBackend for OpenAiBackend {
    async fn create_thread(&self) -> Result<ThreadId, BackendError> {
        let response = self
            .send(self.request(Method::POST, "/threads"))
            .await?;
        let thread: ThreadObject = self.parse(response).await?;
        Ok(ThreadId::new(thread.id))
    }

    async fn add_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), BackendError> {
        let body = CreateMessageRequest {
            role: "user",
            content,
        };
        self.send(
            self.request(Method::POST, &format!("/threads/{thread_id}/messages"))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &str,
    ) -> Result<Run, BackendError> {
        let body = CreateRunRequest { assistant_id };
        let response = self
            .send(
                self.request(Method::POST, &format!("/threads/{thread_id}/runs"))
                    .json(&body),
            )
            .await?;
        self.parse(response).await
    }

    async fn get_run(&self, thread_id: &ThreadId, run_id: &str) -> Result<Run, BackendError> {
        let response = self
            .send(self.request(Method::GET, &format!("/threads/{thread_id}/runs/{run_id}")))
            .await?;
        self.parse(response).await
    }

    async fn latest_messages(
        &self,
        thread_id: &ThreadId,
        limit: u32,
    ) -> Result<Vec<ThreadMessage>, BackendError> {
        let response = self
            .send(
                self.request(Method::GET, &format!("/threads/{thread_id}/messages"))
                    .query(&[("order", "desc"), ("limit", &limit.to_string())]),
            )
            .await?;
        let list: MessageList = self.parse(response).await?;
        Ok(list.data)
    }
}

// ----- Wire types -----

#[derive(Debug, serde::Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}
