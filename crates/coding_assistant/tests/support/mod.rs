use std::collections::VecDeque;
use std::sync::Mutex;

use chat_api::{
    ChatApiError, ChatRequest, ChatResponse, ChatTransport, ContentBlock, Message,
    ToolCallRequest,
};
use serde_json::Value;

/// One scripted model reply.
pub enum ScriptedReply {
    Text(String),
    Tools(Vec<ToolCallRequest>),
    TextThenTools(String, Vec<ToolCallRequest>),
    Fail(String),
}

/// Deterministic transport that replays scripted replies and records every
/// request it sees.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn recorded_requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ChatTransport for ScriptedTransport {
    fn complete(&self, request: ChatRequest<'_>) -> Result<ChatResponse, ChatApiError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.messages.to_vec());

        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or(ScriptedReply::Fail("script exhausted".to_string()));

        match reply {
            ScriptedReply::Text(text) => Ok(ChatResponse {
                content: vec![ContentBlock::Text(text)],
                stop_reason: Some("end_turn".to_string()),
            }),
            ScriptedReply::Tools(calls) => Ok(ChatResponse {
                content: calls.into_iter().map(ContentBlock::ToolUse).collect(),
                stop_reason: Some("tool_use".to_string()),
            }),
            ScriptedReply::TextThenTools(text, calls) => {
                let mut content = vec![ContentBlock::Text(text)];
                content.extend(calls.into_iter().map(ContentBlock::ToolUse));
                Ok(ChatResponse {
                    content,
                    stop_reason: Some("tool_use".to_string()),
                })
            }
            ScriptedReply::Fail(message) => Err(ChatApiError::Status {
                status: 500,
                message,
            }),
        }
    }
}

pub fn tool_call(id: &str, name: &str, input: Value) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        name: name.to_string(),
        input,
    }
}
