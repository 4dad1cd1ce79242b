//! Transcript render engine.
//!
//! Turns the derived transcript plus live overlay state into styled
//! [`Line`]s. Every emitted line is already wrapped to the viewport width,
//! so the terminal can treat each entry as exactly one row. Scrollback
//! windowing happens afterwards over the full line array.

use ledger_tui::diff::unified_diff_lines;
use ledger_tui::text::{split_lines, wrap_line, wrap_text};
use ledger_tui::{Color, Line, Theme};
use serde_json::Value;

use crate::transcript::{DerivedToolCall, DisplayMessage, DisplayRole, ToolCallStatus};

pub const READ_FILE_MAX_LINES: usize = 50;
pub const RUN_COMMAND_MAX_LINES: usize = 100;
pub const COMMAND_TRUNCATE_LENGTH: usize = 60;

const USER_PREFIX: &str = "you ";
const BLOCK_MAX_WIDTH: usize = 60;

/// Overlay state sampled by the UI each repaint.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    pub is_loading: bool,
    /// Whole seconds since the turn started, once the first sample lands.
    pub thinking_elapsed: Option<u64>,
    pub error: Option<String>,
}

/// Builds the complete transcript line array for one repaint.
#[must_use]
pub fn build_transcript_lines(
    messages: &[DisplayMessage],
    tool_calls: &[DerivedToolCall],
    after_assistant: Option<&DisplayMessage>,
    live: &LiveState,
    width: usize,
    collapsed: bool,
    theme: &Theme,
) -> Vec<Line> {
    let mut lines = Vec::new();

    for message in messages {
        push_message_lines(&mut lines, message, width, theme);
    }

    if live.is_loading && tool_calls.is_empty() {
        let thinking = match live.thinking_elapsed {
            Some(seconds) => format!("Thinking for {seconds}s"),
            None => "thinking…".to_string(),
        };
        for wrapped in wrap_line(&thinking, width) {
            lines.push(Line::dim(wrapped, theme.thinking));
        }
        lines.push(Line::blank());
    }

    for call in tool_calls {
        push_tool_call_lines(&mut lines, call, width, collapsed, theme);
        lines.push(Line::blank());
    }

    if let Some(error) = &live.error {
        for wrapped in wrap_text(&format!("error: {error}"), width) {
            lines.push(Line::new(wrapped, theme.error));
        }
        lines.push(Line::blank());
    }

    if let Some(message) = after_assistant {
        push_message_lines(&mut lines, message, width, theme);
    }

    lines
}

fn push_message_lines(lines: &mut Vec<Line>, message: &DisplayMessage, width: usize, theme: &Theme) {
    match message.role {
        DisplayRole::User => {
            for wrapped in wrap_text(&format!("{USER_PREFIX}{}", message.content), width) {
                lines.push(Line::new(wrapped, theme.user_message));
            }
        }
        DisplayRole::Assistant => {
            for wrapped in wrap_text(&message.content, width) {
                lines.push(Line::new(wrapped, theme.assistant_message));
            }
        }
    }
    lines.push(Line::blank());
}

/// Basename of a slash-separated path; the path itself when it has no
/// separators.
#[must_use]
pub fn file_name(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => path,
    }
}

/// Human label for a tool name; unknown tools get underscores spaced out.
#[must_use]
pub fn format_tool_call_name(name: &str) -> String {
    match name {
        "read_file" => "read file".to_string(),
        "edit_file" => "edit file".to_string(),
        "list_files" => "list files".to_string(),
        "run_command" => "run command".to_string(),
        _ => name.replace('_', " "),
    }
}

/// The header target for a tool call, when its input names one.
#[must_use]
pub fn format_tool_call_target(name: &str, input: &Value) -> Option<String> {
    let path = input.get("path").and_then(Value::as_str);
    let command = input.get("command").and_then(Value::as_str);

    if name == "run_command" {
        return command.map(truncate_command);
    }

    let path = path?;
    if name == "list_files" {
        return Some(if path == "." {
            "./".to_string()
        } else {
            path.to_string()
        });
    }

    Some(file_name(path).to_string())
}

fn truncate_command(command: &str) -> String {
    let chars: Vec<char> = command.chars().collect();
    if chars.len() <= COMMAND_TRUNCATE_LENGTH {
        command.to_string()
    } else {
        let mut truncated: String = chars[..COMMAND_TRUNCATE_LENGTH].iter().collect();
        truncated.push('…');
        truncated
    }
}

fn status_color(status: ToolCallStatus, theme: &Theme) -> Color {
    match status {
        ToolCallStatus::Running => theme.tool_status.running,
        ToolCallStatus::Done => theme.tool_status.done,
        ToolCallStatus::Error => theme.tool_status.error,
    }
}

fn push_tool_call_lines(
    lines: &mut Vec<Line>,
    call: &DerivedToolCall,
    width: usize,
    collapsed: bool,
    theme: &Theme,
) {
    let indicator = if collapsed { '▶' } else { '▼' };
    let name = format_tool_call_name(&call.name);
    let mut header = format!("{indicator} {name}");
    if let Some(target) = format_tool_call_target(&call.name, &call.input) {
        header.push_str(&format!(": {target}"));
    }
    header.push_str(&format!(" ({})", call.status.label()));

    let color = status_color(call.status, theme);
    for wrapped in wrap_line(&header, width) {
        lines.push(Line::new(wrapped, color));
    }

    if collapsed {
        return;
    }
    let Some(result) = &call.result else {
        return;
    };

    match call.name.as_str() {
        "edit_file" => push_diff_lines(lines, call, result, width, theme),
        "read_file" => {
            let title = format!(
                "read file: {}",
                call.input
                    .get("path")
                    .and_then(Value::as_str)
                    .map(file_name)
                    .unwrap_or("file")
            );
            let body = truncate_result(result, READ_FILE_MAX_LINES);
            push_code_block(lines, &title, &body, width, theme.code_block.content, true, theme);
        }
        "run_command" => push_command_block(lines, call, result, width, theme),
        "list_files" => {
            for wrapped in wrap_text(result, width) {
                lines.push(Line::new(wrapped, theme.text_primary));
            }
        }
        _ => {
            for wrapped in wrap_text(result, width) {
                lines.push(Line::dim(wrapped, theme.text_secondary));
            }
        }
    }
}

/// Truncates a multi-line result, appending the marker the UI and tests key
/// on: `... (truncated, showing N of M lines)`.
#[must_use]
pub fn truncate_result(result: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = result.split('\n').collect();
    if lines.len() <= max_lines {
        return result.to_string();
    }

    let total = lines.len();
    let mut truncated = lines[..max_lines].join("\n");
    truncated.push_str(&format!(
        "\n\n... (truncated, showing {max_lines} of {total} lines)"
    ));
    truncated
}

fn push_diff_lines(
    lines: &mut Vec<Line>,
    call: &DerivedToolCall,
    result: &str,
    width: usize,
    theme: &Theme,
) {
    let old_str = call.input.get("old_str").and_then(Value::as_str);
    let new_str = call.input.get("new_str").and_then(Value::as_str);

    let body = match (old_str, new_str) {
        (Some(old), Some(new)) => {
            let diff = unified_diff_lines(old, new);
            if diff.is_empty() {
                result.to_string()
            } else {
                diff.join("\n")
            }
        }
        _ => result.to_string(),
    };

    for logical in split_lines(&body) {
        push_diff_line(lines, logical, width, theme);
    }
}

fn push_diff_line(lines: &mut Vec<Line>, line: &str, width: usize, theme: &Theme) {
    let (color, dim) = classify_diff_line(line, theme);
    for wrapped in wrap_line(line, width) {
        lines.push(Line {
            text: wrapped,
            color,
            dim,
        });
    }
}

fn classify_diff_line(line: &str, theme: &Theme) -> (Color, bool) {
    if line.starts_with("@@") {
        (theme.diff.hunk_header, false)
    } else if !line.is_empty() && line.chars().all(|c| c == '─') {
        (theme.diff.separator, true)
    } else if line.starts_with("- ") {
        (theme.diff.deletion, true)
    } else if line.starts_with("+ ") {
        (theme.diff.addition, false)
    } else if line.starts_with("  ") {
        (theme.diff.context, true)
    } else if line.contains("truncated") {
        (theme.diff.truncated, true)
    } else {
        (theme.diff.context, false)
    }
}

fn push_code_block(
    lines: &mut Vec<Line>,
    title: &str,
    content: &str,
    width: usize,
    content_color: Color,
    dim_content: bool,
    theme: &Theme,
) {
    let border_width = BLOCK_MAX_WIDTH.min(width);
    for wrapped in wrap_line(&block_header(title, border_width), width) {
        lines.push(Line::dim(wrapped, theme.code_block.border));
    }

    push_block_content(lines, content, border_width, content_color, dim_content, theme);

    lines.push(Line::dim("─".repeat(border_width), theme.code_block.border));
}

fn push_command_block(
    lines: &mut Vec<Line>,
    call: &DerivedToolCall,
    result: &str,
    width: usize,
    theme: &Theme,
) {
    let command = call
        .input
        .get("command")
        .and_then(Value::as_str)
        .unwrap_or("command");
    let title = format!("run command: {}", truncate_command(command));
    let border_width = BLOCK_MAX_WIDTH.min(width);

    for wrapped in wrap_line(&block_header(&title, border_width), width) {
        lines.push(Line::dim(wrapped, theme.code_block.border));
    }

    let command_prefix = "│ $ ";
    for wrapped in wrap_line(command, border_width.saturating_sub(command_prefix.chars().count()))
    {
        lines.push(Line::new(
            format!("{command_prefix}{wrapped}"),
            theme.code_block.command_prefix,
        ));
    }

    let body = truncate_result(result, RUN_COMMAND_MAX_LINES);
    push_block_content(lines, &body, border_width, theme.text_primary, false, theme);

    lines.push(Line::dim("─".repeat(border_width), theme.code_block.border));
}

fn block_header(title: &str, border_width: usize) -> String {
    let title_part = format!("── {title} ");
    let remaining = border_width.saturating_sub(title_part.chars().count());
    format!("{title_part}{}", "─".repeat(remaining))
}

fn push_block_content(
    lines: &mut Vec<Line>,
    content: &str,
    border_width: usize,
    content_color: Color,
    dim_content: bool,
    theme: &Theme,
) {
    let content_lines = split_lines(content);
    if content_lines.iter().all(|line| line.is_empty()) {
        lines.push(Line::dim("│", theme.code_block.border));
        return;
    }

    for logical in content_lines {
        for wrapped in wrap_line(logical, border_width.saturating_sub(2)) {
            lines.push(Line {
                text: format!("│ {wrapped}"),
                color: content_color,
                dim: dim_content,
            });
        }
    }
}
