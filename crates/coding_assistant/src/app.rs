//! Interactive application state.
//!
//! `App` is pure state plus transition methods; it owns no I/O handles and
//! never talks to the model. The UI loop feeds it key events and applies
//! the [`Submission`] it returns. While a turn is in flight the input
//! surface is disabled; that, not locking, is what serializes turns.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ledger_tui::InputLine;

use crate::commands::{
    commands_dir, format_command_message, list_commands, load_command, parse_command_input,
    render_help,
};

const INPUT_PLACEHOLDER: &str = "ask anything...";

/// What the UI should do with one submitted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing to do (empty input, or handled locally with a notice).
    Ignored,
    /// Send this message through the engine.
    StartTurn { message: String },
    /// Reset conversation memory.
    Cleared,
    /// Leave the application.
    Quit,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct InputHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
    draft: Option<String>,
}

impl InputHistory {
    fn record_entry(&mut self, text: String) {
        self.entries.push(text);
        self.cursor = None;
        self.draft = None;
    }

    fn previous(&mut self, current_input: &str) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        if self.cursor.is_some_and(|index| index >= self.entries.len()) {
            self.cursor = None;
        }

        if self.cursor.is_none() {
            self.draft = Some(current_input.to_string());
        }

        let new_cursor = match self.cursor {
            Some(index) if index > 0 => index - 1,
            Some(index) => index,
            None => self.entries.len() - 1,
        };

        self.cursor = Some(new_cursor);
        Some(self.entries[new_cursor].clone())
    }

    fn next(&mut self) -> Option<String> {
        let current = self.cursor?;

        if current + 1 >= self.entries.len() {
            self.cursor = None;
            return Some(self.draft.take().unwrap_or_default());
        }

        let next = current + 1;
        self.cursor = Some(next);
        Some(self.entries[next].clone())
    }

    fn reset_navigation(&mut self) {
        self.cursor = None;
        self.draft = None;
    }
}

pub struct App {
    pub input: InputLine,
    history: InputHistory,
    commands_dir: PathBuf,
    pub is_loading: bool,
    pub thinking_started: Option<Instant>,
    pub error: Option<String>,
    /// Transient local output (help listing, unknown command, clear notice).
    pub notice: Option<String>,
    pub scroll_offset: usize,
    pub collapsed: bool,
    pub should_exit: bool,
}

impl App {
    #[must_use]
    pub fn new(cwd: &Path) -> Self {
        Self {
            input: InputLine::new(INPUT_PLACEHOLDER),
            history: InputHistory::default(),
            commands_dir: commands_dir(cwd),
            is_loading: false,
            thinking_started: None,
            error: None,
            notice: None,
            scroll_offset: 0,
            collapsed: false,
            should_exit: false,
        }
    }

    pub fn on_char(&mut self, ch: char) {
        self.input.insert_char(ch);
        self.history.reset_navigation();
    }

    pub fn on_backspace(&mut self) {
        self.input.backspace();
        self.history.reset_navigation();
    }

    pub fn on_history_previous(&mut self) {
        if let Some(previous) = self.history.previous(self.input.value()) {
            self.input.set_value(previous);
        }
    }

    pub fn on_history_next(&mut self) {
        if let Some(next) = self.history.next() {
            self.input.set_value(next);
        }
    }

    /// Consumes the current input and routes it.
    ///
    /// Callers must not invoke this while a turn is in flight; the UI keeps
    /// the input surface disabled until the turn resolves.
    pub fn on_submit(&mut self) -> Submission {
        let submitted = self.input.take();
        let text = submitted.trim().to_string();
        if text.is_empty() {
            return Submission::Ignored;
        }

        self.history.record_entry(text.clone());
        self.notice = None;
        self.error = None;
        self.scroll_offset = 0;

        let Some(parsed) = parse_command_input(&text) else {
            return Submission::StartTurn { message: text };
        };

        match parsed.command.as_str() {
            "help" => {
                self.notice = Some(render_help(&list_commands(&self.commands_dir)));
                Submission::Ignored
            }
            "clear" => {
                self.notice = Some("Conversation cleared".to_string());
                Submission::Cleared
            }
            "quit" => {
                self.should_exit = true;
                Submission::Quit
            }
            name => match load_command(&self.commands_dir, name) {
                Some(content) => Submission::StartTurn {
                    message: format_command_message(name, &content, &parsed.args, &text),
                },
                None => {
                    self.notice = Some(format!("Unknown command: /{name}"));
                    Submission::Ignored
                }
            },
        }
    }

    pub fn on_turn_started(&mut self) {
        self.is_loading = true;
        self.thinking_started = Some(Instant::now());
        self.error = None;
        self.notice = None;
        self.scroll_offset = 0;
    }

    pub fn on_turn_completed(&mut self) {
        self.is_loading = false;
        self.thinking_started = None;
        self.scroll_offset = 0;
    }

    pub fn on_turn_failed(&mut self, error: String) {
        self.is_loading = false;
        self.thinking_started = None;
        self.error = Some(error);
    }

    /// Whole seconds the current turn has been thinking, once the first
    /// full second has passed.
    #[must_use]
    pub fn thinking_elapsed_seconds(&self) -> Option<u64> {
        self.thinking_started
            .filter(|_| self.is_loading)
            .map(|started| started.elapsed().as_secs())
            .filter(|seconds| *seconds >= 1)
    }

    pub fn on_escape(&mut self) {
        self.error = None;
        self.notice = None;
    }

    /// Ctrl+C: clear pending input first; with nothing to clear, exit.
    pub fn on_interrupt(&mut self) {
        if !self.input.is_empty() {
            self.input.clear();
            self.history.reset_navigation();
        } else {
            self.should_exit = true;
        }
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn scroll_back(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows);
    }

    pub fn scroll_forward(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }
}
