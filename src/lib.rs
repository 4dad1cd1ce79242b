//! Line-oriented terminal rendering substrate for transcript-style UIs.
//!
//! Invariant: rendering is a pure projection. Components build [`Line`]
//! values (text + semantic color + dim flag), the viewport windows them, and
//! only [`terminal::ProcessTerminal::draw`] emits ANSI to the screen.
//!
//! # Public API Overview
//! - [`Line`]/[`Color`]: styled lines and their ANSI emission.
//! - [`text`]: newline splitting, fixed-width wrapping, ANSI-safe widths.
//! - [`viewport`]: bottom-anchored scroll windowing.
//! - [`diff`]: unified-diff line generation for edit previews.
//! - [`Theme`]: semantic color roles threaded through render calls.
//! - [`terminal`]/[`input`]: raw-mode terminal with decoded key events.
//! - [`EnvConfig`]/[`DebugLog`]: environment configuration and the opt-in
//!   file log sink.

pub mod config;
pub mod diff;
pub mod editor;
pub mod input;
pub mod line;
pub mod logging;
pub mod terminal;
pub mod text;
pub mod theme;
pub mod viewport;

pub use crate::config::EnvConfig;
pub use crate::editor::InputLine;
pub use crate::input::Key;
pub use crate::line::{Color, Line};
pub use crate::logging::DebugLog;
pub use crate::terminal::{Event, ProcessTerminal};
pub use crate::theme::{CodeBlockTheme, DiffTheme, Theme, ToolStatusTheme};
