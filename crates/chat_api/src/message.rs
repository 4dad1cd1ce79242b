//! Conversation log model shared across the workspace.
//!
//! One [`Message`] is one turn in the append-only conversation log. The log
//! is the single source of truth: the UI never stores tool-call status,
//! it derives it from these entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix marking a tool result as failed.
///
/// Structural contract: tool executors produce it, the transcript deriver
/// keys tool-call status off it.
pub const ERROR_MARKER: &str = "Error:";

/// One model-requested tool invocation; immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// One entry in the conversation log.
///
/// `ToolCalls` is an assistant message whose content is an ordered sequence
/// of requests; `ToolResult` pairs a request by `call_id`. Invariant: every
/// `ToolResult.call_id` references a request emitted by a preceding
/// `ToolCalls` entry in the same turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Message {
    User { text: String },
    Assistant { text: String },
    ToolCalls { calls: Vec<ToolCallRequest> },
    ToolResult { call_id: String, content: String },
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant { text: text.into() }
    }

    #[must_use]
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            call_id: call_id.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

/// Returns true when a tool result text carries the error marker.
#[must_use]
pub fn is_error_result(content: &str) -> bool {
    content.starts_with(ERROR_MARKER)
}

/// A tool exposed to the model: name, description, JSON input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
