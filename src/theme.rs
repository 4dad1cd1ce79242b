//! Theme configuration threaded through rendering.
//!
//! A [`Theme`] is a plain value passed down the render call chain; there is
//! no process-wide theme state. Fields are semantic roles, not raw colors,
//! so the transcript renderer never hardcodes a palette.

use crate::line::Color;

/// Colors for the three tool-call statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatusTheme {
    pub running: Color,
    pub done: Color,
    pub error: Color,
}

/// Colors for unified-diff line roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffTheme {
    pub hunk_header: Color,
    pub separator: Color,
    pub deletion: Color,
    pub addition: Color,
    pub context: Color,
    pub truncated: Color,
}

/// Colors for bordered code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlockTheme {
    pub border: Color,
    pub content: Color,
    pub command_prefix: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub user_message: Color,
    pub assistant_message: Color,
    pub thinking: Color,
    pub error: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub tool_status: ToolStatusTheme,
    pub diff: DiffTheme,
    pub code_block: CodeBlockTheme,
}

impl Theme {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            user_message: Color::Cyan,
            assistant_message: Color::Default,
            thinking: Color::Gray,
            error: Color::Red,
            text_primary: Color::Default,
            text_secondary: Color::Gray,
            tool_status: ToolStatusTheme {
                running: Color::Yellow,
                done: Color::Green,
                error: Color::Red,
            },
            diff: DiffTheme {
                hunk_header: Color::Cyan,
                separator: Color::Gray,
                deletion: Color::Red,
                addition: Color::Green,
                context: Color::Gray,
                truncated: Color::Yellow,
            },
            code_block: CodeBlockTheme {
                border: Color::Gray,
                content: Color::White,
                command_prefix: Color::Cyan,
            },
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            user_message: Color::Blue,
            assistant_message: Color::Default,
            thinking: Color::Gray,
            error: Color::Red,
            text_primary: Color::Default,
            text_secondary: Color::Gray,
            tool_status: ToolStatusTheme {
                running: Color::Magenta,
                done: Color::Green,
                error: Color::Red,
            },
            diff: DiffTheme {
                hunk_header: Color::Blue,
                separator: Color::Gray,
                deletion: Color::Red,
                addition: Color::Green,
                context: Color::Gray,
                truncated: Color::Yellow,
            },
            code_block: CodeBlockTheme {
                border: Color::Gray,
                content: Color::Default,
                command_prefix: Color::Blue,
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
