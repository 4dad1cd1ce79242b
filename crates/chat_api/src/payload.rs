//! Wire payload shapes for the messages endpoint.
//!
//! The log model ([`Message`]) is richer than the wire: tool results travel
//! as user-role `tool_result` blocks, and consecutive results for one
//! assistant turn must coalesce into a single user message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Message, ToolCallRequest, ToolDefinition};

/// Canonical request body for the messages endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<&ToolDefinition> for WireTool {
    fn from(definition: &ToolDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            input_schema: definition.input_schema.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: WireContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Blocks(Vec<WireBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireBlock {
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

/// Projects the conversation log onto wire messages.
///
/// Consecutive `ToolResult` entries merge into one user message so every
/// assistant `tool_use` turn is answered by exactly one result message.
#[must_use]
pub fn wire_messages(log: &[Message]) -> Vec<WireMessage> {
    let mut wire: Vec<WireMessage> = Vec::with_capacity(log.len());

    for message in log {
        match message {
            Message::User { text } => wire.push(WireMessage {
                role: "user",
                content: WireContent::Text(text.clone()),
            }),
            Message::Assistant { text } => wire.push(WireMessage {
                role: "assistant",
                content: WireContent::Text(text.clone()),
            }),
            Message::ToolCalls { calls } => wire.push(WireMessage {
                role: "assistant",
                content: WireContent::Blocks(
                    calls
                        .iter()
                        .map(|call| WireBlock::ToolUse {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            input: call.input.clone(),
                        })
                        .collect(),
                ),
            }),
            Message::ToolResult { call_id, content } => {
                let block = WireBlock::ToolResult {
                    tool_use_id: call_id.clone(),
                    content: content.clone(),
                };

                match wire.last_mut() {
                    Some(WireMessage {
                        role: "user",
                        content: WireContent::Blocks(blocks),
                    }) => blocks.push(block),
                    _ => wire.push(WireMessage {
                        role: "user",
                        content: WireContent::Blocks(vec![block]),
                    }),
                }
            }
        }
    }

    wire
}

/// Parsed response body from the messages endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// Any block type this client does not interpret.
    #[serde(other)]
    Unknown,
}

/// The transport-level response: ordered content blocks plus stop reason.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolUse(ToolCallRequest),
}

impl ChatResponse {
    /// Tool-call requests in response order.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&ToolCallRequest> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(call) => Some(call),
                ContentBlock::Text(_) => None,
            })
            .collect()
    }

    /// Text blocks joined with newlines.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                ContentBlock::ToolUse(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<MessagesResponse> for ChatResponse {
    fn from(response: MessagesResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(ContentBlock::Text(text)),
                ResponseBlock::ToolUse { id, name, input } => {
                    Some(ContentBlock::ToolUse(ToolCallRequest { id, name, input }))
                }
                ResponseBlock::Unknown => None,
            })
            .collect();

        Self {
            content,
            stop_reason: response.stop_reason,
        }
    }
}
