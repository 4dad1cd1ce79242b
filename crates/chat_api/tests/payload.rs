use chat_api::{
    wire_messages, ChatResponse, ContentBlock, Message, MessagesResponse, ToolCallRequest,
};
use serde_json::json;

fn tool_call(id: &str, name: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        name: name.to_string(),
        input: json!({ "path": "a.txt" }),
    }
}

#[test]
fn plain_turns_serialize_as_string_content() {
    let log = vec![Message::user("hi"), Message::assistant("hello")];
    let wire = serde_json::to_value(wire_messages(&log)).expect("serialize");

    assert_eq!(
        wire,
        json!([
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "hello" },
        ])
    );
}

#[test]
fn tool_turn_serializes_tool_use_and_tool_result_blocks() {
    let log = vec![
        Message::user("read it"),
        Message::ToolCalls {
            calls: vec![tool_call("call_1", "read_file")],
        },
        Message::tool_result("call_1", "contents"),
    ];
    let wire = serde_json::to_value(wire_messages(&log)).expect("serialize");

    assert_eq!(
        wire,
        json!([
            { "role": "user", "content": "read it" },
            { "role": "assistant", "content": [
                { "type": "tool_use", "id": "call_1", "name": "read_file",
                  "input": { "path": "a.txt" } },
            ]},
            { "role": "user", "content": [
                { "type": "tool_result", "tool_use_id": "call_1", "content": "contents" },
            ]},
        ])
    );
}

#[test]
fn consecutive_tool_results_coalesce_into_one_user_message() {
    let log = vec![
        Message::user("go"),
        Message::ToolCalls {
            calls: vec![tool_call("call_1", "read_file"), tool_call("call_2", "list_files")],
        },
        Message::tool_result("call_1", "first"),
        Message::tool_result("call_2", "second"),
    ];

    let wire = wire_messages(&log);
    assert_eq!(wire.len(), 3);

    let last = serde_json::to_value(&wire[2]).expect("serialize");
    assert_eq!(last["role"], "user");
    assert_eq!(last["content"].as_array().expect("blocks").len(), 2);
}

#[test]
fn tool_results_do_not_merge_across_user_text() {
    let log = vec![
        Message::tool_result("call_1", "first"),
        Message::user("interjection"),
        Message::tool_result("call_2", "second"),
    ];

    let wire = wire_messages(&log);
    assert_eq!(wire.len(), 3);
}

#[test]
fn response_parsing_maps_text_and_tool_use_blocks() {
    let body = json!({
        "id": "msg_1",
        "content": [
            { "type": "text", "text": "Let me check." },
            { "type": "tool_use", "id": "call_9", "name": "list_files", "input": {} },
        ],
        "stop_reason": "tool_use",
    });

    let parsed: MessagesResponse = serde_json::from_value(body).expect("parse");
    let response = ChatResponse::from(parsed);

    assert_eq!(response.stop_reason.as_deref(), Some("tool_use"));
    assert_eq!(response.content.len(), 2);
    assert_eq!(response.tool_calls().len(), 1);
    assert_eq!(response.tool_calls()[0].name, "list_files");
    assert_eq!(response.joined_text(), "Let me check.");
}

#[test]
fn unknown_block_types_are_ignored() {
    let body = json!({
        "content": [
            { "type": "thinking", "thinking": "hmm" },
            { "type": "text", "text": "Done" },
        ],
        "stop_reason": "end_turn",
    });

    let parsed: MessagesResponse = serde_json::from_value(body).expect("parse");
    let response = ChatResponse::from(parsed);

    assert_eq!(response.content, vec![ContentBlock::Text("Done".to_string())]);
}

#[test]
fn multiple_text_blocks_join_with_newlines() {
    let response = ChatResponse {
        content: vec![
            ContentBlock::Text("first".to_string()),
            ContentBlock::Text("second".to_string()),
        ],
        stop_reason: None,
    };
    assert_eq!(response.joined_text(), "first\nsecond");
}
