use std::env;
use std::time::Duration;

use crate::error::ChatApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 8096;

/// Transport configuration for the messages endpoint.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Secret passed in the `x-api-key` header.
    pub api_key: String,
    /// Base URL; the `/v1/messages` path is appended.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Completion budget per request.
    pub max_tokens: u32,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
}

impl ChatApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
        }
    }

    /// Builds configuration from the environment.
    ///
    /// `ANTHROPIC_API_KEY` is required; `CODING_ASSISTANT_MODEL` and
    /// `CODING_ASSISTANT_BASE_URL` override the defaults when non-blank.
    pub fn from_env() -> Result<Self, ChatApiError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ChatApiError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(model) = env_string_opt("CODING_ASSISTANT_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = env_string_opt("CODING_ASSISTANT_BASE_URL") {
            config.base_url = base_url;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The fully-joined messages endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_public_endpoint() {
        let config = ChatApiConfig::new("key");
        assert_eq!(config.endpoint(), "https://api.anthropic.com/v1/messages");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = ChatApiConfig::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(config.endpoint(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn builders_override_fields() {
        let config = ChatApiConfig::new("key")
            .with_model("other-model")
            .with_max_tokens(1024)
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.model, "other-model");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
