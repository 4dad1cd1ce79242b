//! Conversation engine: the model/tool round loop.
//!
//! One `chat` call drives the whole turn: append the user message, call the
//! model, execute any requested tools in response order, feed results back,
//! and repeat until the model answers with plain text. The engine owns the
//! append-only log; the UI only ever reads snapshots of it.

use std::sync::{Arc, Mutex, MutexGuard};

use chat_api::{ChatApiError, ChatRequest, ChatTransport, Message, ToolCallRequest};
use serde_json::Value;
use thiserror::Error;

use crate::tools::ToolRegistry;

/// Upper bound on model/tool rounds within one turn.
///
/// The protocol itself has no bound; this keeps a misbehaving model from
/// looping forever.
pub const MAX_TOOL_ROUNDS: usize = 25;

pub const SYSTEM_PROMPT_ENV_VAR: &str = "CODING_ASSISTANT_SYSTEM_PROMPT";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ChatApiError),

    #[error("turn exceeded {MAX_TOOL_ROUNDS} tool rounds")]
    TooManyRounds,
}

/// One tool execution recorded during a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedToolCall {
    pub name: String,
    pub input: Value,
    pub result: String,
}

/// The final result of one `chat` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub text: String,
    pub tool_calls: Vec<ExecutedToolCall>,
}

pub struct ConversationEngine {
    transport: Arc<dyn ChatTransport>,
    registry: ToolRegistry,
    system_prompt: String,
    log: Mutex<Vec<Message>>,
}

impl ConversationEngine {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        registry: ToolRegistry,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            registry,
            system_prompt: system_prompt.into(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Seeds the log from a resumed session.
    pub fn restore_log(&self, log: Vec<Message>) {
        *self.lock_log() = log;
    }

    /// Clears all conversation memory.
    pub fn clear_log(&self) {
        self.lock_log().clear();
    }

    /// A point-in-time copy of the log for derivation and persistence.
    #[must_use]
    pub fn log_snapshot(&self) -> Vec<Message> {
        self.lock_log().clone()
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Runs one full turn.
    ///
    /// Tool executions are strictly sequential in response order; later
    /// calls in the same response may depend on earlier side effects. A
    /// transport failure propagates without appending any partial assistant
    /// message; the user message stays in the log.
    pub fn chat(&self, user_text: &str) -> Result<TurnOutcome, EngineError> {
        self.lock_log().push(Message::user(user_text));

        let mut executed = Vec::new();

        for _ in 0..MAX_TOOL_ROUNDS {
            let snapshot = self.log_snapshot();
            let response = self.transport.complete(ChatRequest {
                system: &self.system_prompt,
                tools: self.registry.definitions(),
                messages: &snapshot,
            })?;

            let calls: Vec<ToolCallRequest> =
                response.tool_calls().into_iter().cloned().collect();

            if calls.is_empty() {
                let text = response.joined_text();
                self.lock_log().push(Message::assistant(text.clone()));
                return Ok(TurnOutcome {
                    text,
                    tool_calls: executed,
                });
            }

            self.lock_log().push(Message::ToolCalls {
                calls: calls.clone(),
            });

            for call in calls {
                let result = self.registry.execute(&call.name, &call.input);
                executed.push(ExecutedToolCall {
                    name: call.name.clone(),
                    input: call.input.clone(),
                    result: result.clone(),
                });
                self.lock_log()
                    .push(Message::tool_result(call.id, result));
            }
        }

        Err(EngineError::TooManyRounds)
    }

    fn lock_log(&self) -> MutexGuard<'_, Vec<Message>> {
        match self.log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// The builtin working-directory-aware system prompt.
#[must_use]
pub fn default_system_prompt(working_dir: &str) -> String {
    format!(
        "You are a helpful coding assistant with access to tools for reading, editing, \
and creating files, listing directory contents, searching files, and running shell commands.

Current working directory: {working_dir}

All file paths should be relative to this directory unless the user specifies an \
absolute path. When the user mentions \"this directory\" or \"current directory\", \
they mean: {working_dir}

When the user asks you to perform a task:
1. Break it down into steps
2. Use the available tools to accomplish each step
3. Explain what you're doing as you go

Always prefer editing existing files over creating new ones when appropriate. \
Be concise but informative."
    )
}

/// The system prompt with the environment override applied.
///
/// Unset or blank values fall back to the builtin prompt.
#[must_use]
pub fn system_prompt_from_env(working_dir: &str) -> String {
    match std::env::var(SYSTEM_PROMPT_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default_system_prompt(working_dir),
    }
}
