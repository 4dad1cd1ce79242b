//! Model-endpoint client and shared conversation contract.
//!
//! This crate owns the conversation [`Message`] model (the append-only log
//! the rest of the workspace projects from), the wire payload shapes for an
//! anthropic-style messages endpoint, and the blocking HTTP transport.
//!
//! Contract notes:
//! - A response containing at least one `tool_use` block means "keep
//!   looping"; a response with only text ends the turn.
//! - Tool result text beginning with [`ERROR_MARKER`] is a failed call.
//! - The transport never retries; errors propagate to the caller.

mod client;
mod config;
mod error;
mod message;
mod payload;

pub use client::{ChatRequest, ChatTransport, HttpChatClient};
pub use config::{ChatApiConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use error::{parse_error_message, ChatApiError};
pub use message::{is_error_result, Message, ToolCallRequest, ToolDefinition, ERROR_MARKER};
pub use payload::{
    wire_messages, ChatResponse, ContentBlock, MessagesRequest, MessagesResponse, ResponseBlock,
    WireBlock, WireContent, WireMessage, WireTool,
};
