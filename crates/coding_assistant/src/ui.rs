//! Interactive terminal loop.
//!
//! Composes each frame from pure parts: derive the transcript from a log
//! snapshot, build wrapped styled lines, window them to the viewport, then
//! add the input row and status footer. Key events mutate [`App`] state;
//! turn events arrive from the worker channel between polls.

use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ledger_tui::text::{visible_width, wrap_text};
use ledger_tui::viewport::{clamp_scroll_offset, window_lines};
use ledger_tui::{Event, Key, Line, ProcessTerminal, Theme};
use session_store::{save_session, SessionData};

use crate::app::{App, Submission};
use crate::render::{build_transcript_lines, LiveState};
use crate::runtime::{TurnEvent, TurnRunner};
use crate::transcript::{derive, split_for_tool_calls};

/// Input-poll timeout; doubles as the repaint tick while a turn is live.
const TICK_MS: i32 = 100;
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const SPINNER_PERIOD_MS: u128 = 120;

pub struct Ui {
    terminal: ProcessTerminal,
    app: App,
    runner: TurnRunner,
    theme: Theme,
    session: SessionData,
    session_root: PathBuf,
}

impl Ui {
    pub fn new(
        terminal: ProcessTerminal,
        app: App,
        runner: TurnRunner,
        theme: Theme,
        session: SessionData,
        session_root: PathBuf,
    ) -> Self {
        Self {
            terminal,
            app,
            runner,
            theme,
            session,
            session_root,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.start()?;
        let result = self.event_loop();
        self.terminal.stop()?;
        result
    }

    fn event_loop(&mut self) -> io::Result<()> {
        loop {
            self.drain_turn_events();
            self.repaint()?;

            if self.app.should_exit {
                return Ok(());
            }

            match self.terminal.poll_event(TICK_MS)? {
                Some(Event::Key(key)) => self.handle_key(key),
                // Resize needs nothing beyond the next repaint reading the
                // new size.
                Some(Event::Resize) | None => {}
            }
        }
    }

    fn handle_key(&mut self, key: Key) {
        let (_, rows) = self.terminal.size();
        let page = (rows as usize / 2).max(1);

        match key {
            Key::CtrlC => self.app.on_interrupt(),
            // Ctrl+D doubles as the closed-stdin signal; always leave.
            Key::CtrlD => self.app.should_exit = true,
            Key::CtrlO => self.app.toggle_collapsed(),
            Key::Escape => self.app.on_escape(),
            Key::PageUp => self.app.scroll_back(page),
            Key::PageDown => self.app.scroll_forward(page),
            // Everything below edits the input surface, which is disabled
            // while a turn is in flight.
            _ if self.app.is_loading => {}
            Key::Up => self.app.on_history_previous(),
            Key::Down => self.app.on_history_next(),
            Key::Enter => self.handle_submit(),
            Key::Backspace => self.app.on_backspace(),
            Key::Char(ch) => self.app.on_char(ch),
        }
    }

    fn handle_submit(&mut self) {
        match self.app.on_submit() {
            Submission::StartTurn { message } => {
                self.app.on_turn_started();
                self.runner.start_turn(message);
            }
            Submission::Cleared => {
                self.runner.engine().clear_log();
                self.persist_session();
            }
            Submission::Ignored | Submission::Quit => {}
        }
    }

    fn drain_turn_events(&mut self) {
        while let Some(event) = self.runner.try_recv() {
            match event {
                TurnEvent::Completed(_) => {
                    self.app.on_turn_completed();
                    self.persist_session();
                }
                TurnEvent::Failed(error) => self.app.on_turn_failed(error),
            }
        }
    }

    fn persist_session(&mut self) {
        self.session.log = self.runner.engine().log_snapshot();
        if let Err(error) = save_session(&self.session.run_id, &self.session, &self.session_root)
        {
            self.app.notice = Some(format!("Failed to save session: {error}"));
        }
    }

    fn repaint(&mut self) -> io::Result<()> {
        let (columns, rows) = self.terminal.size();
        let width = columns as usize;
        let viewport_height = (rows as usize).saturating_sub(2);

        let snapshot = self.runner.engine().log_snapshot();
        let transcript = derive(&snapshot);
        let partition = split_for_tool_calls(&transcript.messages, &transcript.tool_calls);

        let live = LiveState {
            is_loading: self.app.is_loading,
            thinking_elapsed: self.app.thinking_elapsed_seconds(),
            error: self.app.error.clone(),
        };

        let mut all_lines = build_transcript_lines(
            &partition.before,
            &transcript.tool_calls,
            partition.after_assistant.as_ref(),
            &live,
            width,
            self.app.collapsed,
            &self.theme,
        );

        if let Some(notice) = &self.app.notice {
            for wrapped in wrap_text(notice, width) {
                all_lines.push(Line::dim(wrapped, self.theme.text_secondary));
            }
            all_lines.push(Line::blank());
        }

        self.app.scroll_offset =
            clamp_scroll_offset(all_lines.len(), viewport_height, self.app.scroll_offset);

        let mut frame: Vec<String> = window_lines(&all_lines, viewport_height, self.app.scroll_offset)
            .iter()
            .map(Line::to_ansi)
            .collect();

        frame.push(self.input_row(width));
        frame.push(self.footer_row(width));
        self.terminal.draw(&frame)
    }

    fn input_row(&self, width: usize) -> String {
        if self.app.is_loading {
            Line::dim(format!("{} Working…", spinner_glyph()), self.theme.thinking).to_ansi()
        } else {
            self.app.input.render(width, true)
        }
    }

    fn footer_row(&self, width: usize) -> String {
        let left = display_working_dir(
            &self.session.working_dir,
            std::env::var("HOME").ok().as_deref(),
        );
        let right = format!("{} • {}", self.session.model, self.session.run_id);
        Line::dim(fit_footer(&left, &right, width), self.theme.text_secondary).to_ansi()
    }
}

fn spinner_glyph() -> &'static str {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    SPINNER_FRAMES[((millis / SPINNER_PERIOD_MS) % SPINNER_FRAMES.len() as u128) as usize]
}

/// Aliases the home prefix to `~` for the footer.
fn display_working_dir(cwd: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if cwd == home => "~".to_string(),
        Some(home) => cwd
            .strip_prefix(&format!("{home}/"))
            .map_or_else(|| cwd.to_string(), |rest| format!("~/{rest}")),
        None => cwd.to_string(),
    }
}

/// Left- and right-aligned footer halves with a space fill between them.
fn fit_footer(left: &str, right: &str, width: usize) -> String {
    let left_width = visible_width(left);
    let right_width = visible_width(right);

    if width == 0 {
        return String::new();
    }

    if left_width + right_width + 2 > width {
        let truncated: String = right.chars().take(width).collect();
        return truncated;
    }

    let fill = width - left_width - right_width;
    format!("{left}{}{right}", " ".repeat(fill))
}
