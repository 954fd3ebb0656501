//! Assistant backend configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Assistant backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// API key for the assistant backend
    pub api_key: Option<Secret<String>>,

    /// Assistant identifier to run against.
    ///
    /// Deliberately not required at startup: its absence is surfaced as a
    /// misconfiguration error on each chat request instead.
    pub assistant_id: Option<String>,

    /// Base URL of the assistant API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Initial delay between run-status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Overall ceiling on waiting for a run to finish, in seconds
    #[serde(default = "default_poll_ceiling")]
    pub poll_ceiling_secs: u64,

    /// Reply used when a completed run produced no text segment
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl AssistantConfig {
    /// Get the per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the poll ceiling as a Duration
    pub fn poll_ceiling(&self) -> Duration {
        Duration::from_secs(self.poll_ceiling_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate assistant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("ASSISTANT_API_KEY"));
        }
        if self.base_url.is_empty() || !self.base_url.starts_with("http") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.poll_interval_ms == 0
            || self.poll_ceiling_secs == 0
            || self.poll_interval() >= self.poll_ceiling()
        {
            return Err(ValidationError::InvalidPollSettings);
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_ceiling_secs: default_poll_ceiling(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_poll_ceiling() -> u64 {
    60
}

fn default_fallback_reply() -> String {
    "The assistant reply could not be read.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AssistantConfig {
        AssistantConfig {
            api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_assistant_config_defaults() {
        let config = AssistantConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.poll_ceiling_secs, 60);
        assert!(config.assistant_id.is_none());
    }

    #[test]
    fn test_duration_accessors() {
        let config = AssistantConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.poll_ceiling(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_requires_api_key() {
        let config = AssistantConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("ASSISTANT_API_KEY"))
        ));
    }

    #[test]
    fn test_validation_allows_missing_assistant_id() {
        // A missing assistant id is a per-request failure, not a boot failure.
        let config = with_key();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let config = AssistantConfig {
            base_url: "not-a-url".to_string(),
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl)
        ));
    }

    #[test]
    fn test_validation_rejects_interval_at_or_above_ceiling() {
        let config = AssistantConfig {
            poll_interval_ms: 60_000,
            poll_ceiling_secs: 60,
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPollSettings)
        ));
    }

    #[test]
    fn test_validation_rejects_zero_poll_interval() {
        let config = AssistantConfig {
            poll_interval_ms: 0,
            ..with_key()
        };
        assert!(config.validate().is_err());
    }
}
