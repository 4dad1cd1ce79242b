//! Pure projection of the conversation log into renderable state.
//!
//! Nothing here is cached: every call recomputes display messages and
//! tool-call statuses from the log snapshot, so the UI can never observe a
//! stale status. Tool calls are scoped to the latest turn; older calls are
//! already folded into finalized assistant text and must not re-render as
//! active.

use std::collections::HashMap;

use chat_api::{is_error_result, Message};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallStatus {
    Running,
    Done,
    Error,
}

impl ToolCallStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRole {
    User,
    Assistant,
}

/// A plain-text conversation entry ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMessage {
    pub role: DisplayRole,
    pub content: String,
}

/// A tool call of the latest turn with its computed status.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
    pub status: ToolCallStatus,
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub messages: Vec<DisplayMessage>,
    pub tool_calls: Vec<DerivedToolCall>,
}

/// Derives display messages and latest-turn tool calls from a log snapshot.
#[must_use]
pub fn derive(log: &[Message]) -> Transcript {
    let turn = latest_turn(log);
    let results = collect_tool_results(turn);

    let mut messages = Vec::new();
    for message in log {
        match message {
            Message::User { text } => messages.push(DisplayMessage {
                role: DisplayRole::User,
                content: text.clone(),
            }),
            Message::Assistant { text } => messages.push(DisplayMessage {
                role: DisplayRole::Assistant,
                content: text.clone(),
            }),
            Message::ToolCalls { .. } | Message::ToolResult { .. } => {}
        }
    }

    let mut tool_calls = Vec::new();
    for message in turn {
        let Message::ToolCalls { calls } = message else {
            continue;
        };

        for call in calls {
            let (status, result) = match results.get(call.id.as_str()) {
                Some(content) => {
                    let status = if is_error_result(content) {
                        ToolCallStatus::Error
                    } else {
                        ToolCallStatus::Done
                    };
                    (status, Some((*content).to_string()))
                }
                None => (ToolCallStatus::Running, None),
            };

            tool_calls.push(DerivedToolCall {
                id: call.id.clone(),
                name: call.name.clone(),
                input: call.input.clone(),
                status,
                result,
            });
        }
    }

    Transcript {
        messages,
        tool_calls,
    }
}

/// The suffix of the log strictly after the most recent user message.
///
/// Empty when the log ends with the user; the whole log when no user
/// message exists.
fn latest_turn(log: &[Message]) -> &[Message] {
    for (index, message) in log.iter().enumerate().rev() {
        if message.is_user() {
            return &log[index + 1..];
        }
    }
    log
}

fn collect_tool_results(turn: &[Message]) -> HashMap<&str, &str> {
    let mut results = HashMap::new();
    for message in turn {
        if let Message::ToolResult { call_id, content } = message {
            results.insert(call_id.as_str(), content.as_str());
        }
    }
    results
}

/// The transcript split around the latest turn's tool calls.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptPartition {
    pub before: Vec<DisplayMessage>,
    pub after_assistant: Option<DisplayMessage>,
}

/// Splits off a trailing assistant message when tool calls are present.
///
/// Tool-call execution visually precedes the assistant's concluding text,
/// even though both were appended to the same log; the renderer places
/// `after_assistant` below the tool-call blocks.
#[must_use]
pub fn split_for_tool_calls(
    messages: &[DisplayMessage],
    tool_calls: &[DerivedToolCall],
) -> TranscriptPartition {
    if tool_calls.is_empty() {
        return TranscriptPartition {
            before: messages.to_vec(),
            after_assistant: None,
        };
    }

    match messages.split_last() {
        Some((last, rest)) if last.role == DisplayRole::Assistant => TranscriptPartition {
            before: rest.to_vec(),
            after_assistant: Some(last.clone()),
        },
        _ => TranscriptPartition {
            before: messages.to_vec(),
            after_assistant: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_api::ToolCallRequest;
    use serde_json::json;

    fn tool_calls_message(ids: &[&str]) -> Message {
        Message::ToolCalls {
            calls: ids
                .iter()
                .map(|id| ToolCallRequest {
                    id: (*id).to_string(),
                    name: "read_file".to_string(),
                    input: json!({ "path": "a.txt" }),
                })
                .collect(),
        }
    }

    #[test]
    fn tool_call_without_result_is_running() {
        let log = vec![Message::user("go"), tool_calls_message(&["call_1"])];
        let transcript = derive(&log);

        assert_eq!(transcript.tool_calls.len(), 1);
        assert_eq!(transcript.tool_calls[0].status, ToolCallStatus::Running);
        assert_eq!(transcript.tool_calls[0].result, None);
    }

    #[test]
    fn result_flips_status_to_done() {
        let log = vec![
            Message::user("go"),
            tool_calls_message(&["call_1"]),
            Message::tool_result("call_1", "contents"),
        ];
        let transcript = derive(&log);

        assert_eq!(transcript.tool_calls[0].status, ToolCallStatus::Done);
        assert_eq!(
            transcript.tool_calls[0].result.as_deref(),
            Some("contents")
        );
    }

    #[test]
    fn error_marked_result_flips_status_to_error() {
        let log = vec![
            Message::user("go"),
            tool_calls_message(&["call_1"]),
            Message::tool_result("call_1", "Error: File not found: a.txt"),
        ];
        let transcript = derive(&log);

        assert_eq!(transcript.tool_calls[0].status, ToolCallStatus::Error);
    }

    #[test]
    fn only_latest_turn_tool_calls_are_derived() {
        let log = vec![
            Message::user("first"),
            tool_calls_message(&["old_call"]),
            Message::tool_result("old_call", "done earlier"),
            Message::assistant("finished the first task"),
            Message::user("second"),
            tool_calls_message(&["new_call"]),
        ];
        let transcript = derive(&log);

        assert_eq!(transcript.tool_calls.len(), 1);
        assert_eq!(transcript.tool_calls[0].id, "new_call");
        assert_eq!(transcript.tool_calls[0].status, ToolCallStatus::Running);
    }

    #[test]
    fn log_ending_with_user_has_no_live_tool_calls() {
        let log = vec![
            Message::user("first"),
            tool_calls_message(&["call_1"]),
            Message::tool_result("call_1", "ok"),
            Message::assistant("done"),
            Message::user("second"),
        ];
        assert!(derive(&log).tool_calls.is_empty());
    }

    #[test]
    fn request_order_is_preserved_within_a_turn() {
        let log = vec![
            Message::user("go"),
            tool_calls_message(&["call_1", "call_2"]),
            Message::tool_result("call_2", "second"),
        ];
        let transcript = derive(&log);

        assert_eq!(transcript.tool_calls[0].id, "call_1");
        assert_eq!(transcript.tool_calls[0].status, ToolCallStatus::Running);
        assert_eq!(transcript.tool_calls[1].id, "call_2");
        assert_eq!(transcript.tool_calls[1].status, ToolCallStatus::Done);
    }

    #[test]
    fn messages_keep_only_plain_text_entries_in_order() {
        let log = vec![
            Message::user("question"),
            tool_calls_message(&["call_1"]),
            Message::tool_result("call_1", "data"),
            Message::assistant("answer"),
        ];
        let transcript = derive(&log);

        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[0].role, DisplayRole::User);
        assert_eq!(transcript.messages[1].role, DisplayRole::Assistant);
    }

    #[test]
    fn derive_is_idempotent() {
        let log = vec![
            Message::user("go"),
            tool_calls_message(&["call_1"]),
            Message::tool_result("call_1", "ok"),
            Message::assistant("done"),
        ];
        assert_eq!(derive(&log), derive(&log));
    }

    #[test]
    fn derive_of_empty_log_is_empty() {
        assert_eq!(derive(&[]), Transcript::default());
    }

    #[test]
    fn split_moves_trailing_assistant_after_tool_calls() {
        let log = vec![
            Message::user("go"),
            tool_calls_message(&["call_1"]),
            Message::tool_result("call_1", "ok"),
            Message::assistant("all wrapped up"),
        ];
        let transcript = derive(&log);
        let partition = split_for_tool_calls(&transcript.messages, &transcript.tool_calls);

        assert_eq!(partition.before.len(), 1);
        assert_eq!(
            partition.after_assistant.expect("assistant tail").content,
            "all wrapped up"
        );
    }

    #[test]
    fn split_without_tool_calls_keeps_messages_in_place() {
        let messages = vec![
            DisplayMessage {
                role: DisplayRole::User,
                content: "hi".to_string(),
            },
            DisplayMessage {
                role: DisplayRole::Assistant,
                content: "hello".to_string(),
            },
        ];
        let partition = split_for_tool_calls(&messages, &[]);

        assert_eq!(partition.before, messages);
        assert!(partition.after_assistant.is_none());
    }

    #[test]
    fn split_with_non_assistant_tail_keeps_messages_in_place() {
        let log = vec![Message::user("go"), tool_calls_message(&["call_1"])];
        let transcript = derive(&log);
        let partition = split_for_tool_calls(&transcript.messages, &transcript.tool_calls);

        assert_eq!(partition.before.len(), 1);
        assert!(partition.after_assistant.is_none());
    }
}
