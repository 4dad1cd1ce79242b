//! Blocking HTTP client for the messages endpoint.
//!
//! One `complete` call is one POST; there is no streaming and no automatic
//! retry. Failures surface as [`ChatApiError`] for the caller to report.

use crate::config::ChatApiConfig;
use crate::error::{parse_error_message, ChatApiError};
use crate::message::{Message, ToolDefinition};
use crate::payload::{wire_messages, ChatResponse, MessagesRequest, MessagesResponse, WireTool};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Everything one model round needs: prompt, tool surface, full log.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub tools: &'a [ToolDefinition],
    pub messages: &'a [Message],
}

/// The model-call seam.
///
/// The engine only sees this trait; tests swap in scripted transports.
pub trait ChatTransport: Send + Sync {
    fn complete(&self, request: ChatRequest<'_>) -> Result<ChatResponse, ChatApiError>;
}

pub struct HttpChatClient {
    config: ChatApiConfig,
    http: reqwest::blocking::Client,
}

impl HttpChatClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(ChatApiError::ClientBuild)?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self, ChatApiError> {
        Self::new(ChatApiConfig::from_env()?)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_body(&self, request: ChatRequest<'_>) -> MessagesRequest {
        let system = request.system.trim();
        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: (!system.is_empty()).then(|| system.to_string()),
            tools: request.tools.iter().map(WireTool::from).collect(),
            messages: wire_messages(request.messages),
        }
    }
}

impl ChatTransport for HttpChatClient {
    fn complete(&self, request: ChatRequest<'_>) -> Result<ChatResponse, ChatApiError> {
        let body = self.build_body(request);

        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatApiError::Status {
                status: status.as_u16(),
                message: parse_error_message(status, &body),
            });
        }

        let body = response.text()?;
        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(ChatApiError::MalformedResponse)?;
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_body_carries_model_system_tools_and_log() {
        let client = HttpChatClient::new(
            ChatApiConfig::new("key").with_model("test-model"),
        )
        .expect("build client");

        let tools = vec![ToolDefinition {
            name: "read_file".to_string(),
            description: "Read a file".to_string(),
            input_schema: json!({ "type": "object" }),
        }];
        let log = vec![Message::user("hello")];

        let body = client.build_body(ChatRequest {
            system: "be helpful",
            tools: &tools,
            messages: &log,
        });

        assert_eq!(body.model, "test-model");
        assert_eq!(body.system.as_deref(), Some("be helpful"));
        assert_eq!(body.tools.len(), 1);
        assert_eq!(body.messages.len(), 1);
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        let client =
            HttpChatClient::new(ChatApiConfig::new("key")).expect("build client");
        let body = client.build_body(ChatRequest {
            system: "   ",
            tools: &[],
            messages: &[],
        });
        assert!(body.system.is_none());
    }
}
