//! Slash-command parsing and file-backed command loading.
//!
//! Commands are markdown files under `.assistant/commands`; the file body is
//! spliced into the outgoing user message as plain prefixed text, so from
//! the engine's perspective a command is indistinguishable from free-form
//! user input. A bare `/` is ordinary text, not a command.

use std::fs;
use std::path::{Path, PathBuf};

pub const COMMANDS_DIR: [&str; 2] = [".assistant", "commands"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub args: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
}

/// Default commands directory under a working directory.
#[must_use]
pub fn commands_dir(cwd: &Path) -> PathBuf {
    cwd.join(COMMANDS_DIR[0]).join(COMMANDS_DIR[1])
}

/// Parses `/name args…` input.
///
/// Returns `None` for input that does not start with the sigil, or for the
/// sigil alone.
#[must_use]
pub fn parse_command_input(input: &str) -> Option<ParsedCommand> {
    let trimmed = input.trim();
    let without_sigil = trimmed.strip_prefix('/')?.trim();
    if without_sigil.is_empty() {
        return None;
    }

    match without_sigil.split_once(' ') {
        Some((command, args)) => Some(ParsedCommand {
            command: command.to_string(),
            args: args.trim().to_string(),
        }),
        None => Some(ParsedCommand {
            command: without_sigil.to_string(),
            args: String::new(),
        }),
    }
}

/// Loads a command file's content; missing files read as `None`.
#[must_use]
pub fn load_command(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(format!("{name}.md"))).ok()
}

/// Lists available commands sorted by name.
///
/// Description is the first non-blank line of the file. A missing directory
/// lists as empty.
#[must_use]
pub fn list_commands(dir: &Path) -> Vec<CommandEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut commands = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(".md"))
        else {
            continue;
        };

        let description = fs::read_to_string(&path)
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|line| !line.trim().is_empty())
                    .map(|line| line.trim().to_string())
            })
            .unwrap_or_default();

        commands.push(CommandEntry {
            name: name.to_string(),
            description,
            path,
        });
    }

    commands.sort_by(|a, b| a.name.cmp(&b.name));
    commands
}

/// The `/help` listing text.
#[must_use]
pub fn render_help(entries: &[CommandEntry]) -> String {
    if entries.is_empty() {
        return format!(
            "No commands found. Add markdown files under {}/{} to define them.",
            COMMANDS_DIR[0], COMMANDS_DIR[1]
        );
    }

    let mut lines = vec!["Available commands:".to_string()];
    for entry in entries {
        lines.push(format!("/{} - {}", entry.name, entry.description));
    }
    lines.join("\n")
}

/// Splices a command body into the user-visible message sent to the engine.
#[must_use]
pub fn format_command_message(
    name: &str,
    content: &str,
    args: &str,
    user_input: &str,
) -> String {
    let mut context = content.trim_end().to_string();
    if !args.is_empty() {
        context.push_str(&format!("\n\nArguments: {args}"));
    }

    format!("--- Command: /{name} ---\n\n{context}\n\n--- User Intent: {user_input} ---")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_arguments() {
        let parsed = parse_command_input("/makepr fix auth bug").expect("command");
        assert_eq!(parsed.command, "makepr");
        assert_eq!(parsed.args, "fix auth bug");
    }

    #[test]
    fn parses_command_without_arguments() {
        let parsed = parse_command_input("  /help  ").expect("command");
        assert_eq!(parsed.command, "help");
        assert_eq!(parsed.args, "");
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(parse_command_input("hello there").is_none());
    }

    #[test]
    fn bare_sigil_is_not_a_command() {
        assert!(parse_command_input("/").is_none());
        assert!(parse_command_input("  /   ").is_none());
    }

    #[test]
    fn help_empty_state_names_the_commands_directory() {
        let help = render_help(&[]);
        assert!(help.contains("No commands"));
        assert!(help.contains(".assistant/commands"));
    }

    #[test]
    fn help_lists_commands_with_descriptions() {
        let entries = vec![
            CommandEntry {
                name: "deploy".to_string(),
                description: "Deploy to production".to_string(),
                path: PathBuf::from("deploy.md"),
            },
            CommandEntry {
                name: "makepr".to_string(),
                description: "Create a pull request".to_string(),
                path: PathBuf::from("makepr.md"),
            },
        ];

        let help = render_help(&entries);
        assert!(help.contains("/deploy - Deploy to production"));
        assert!(help.contains("/makepr - Create a pull request"));
    }

    #[test]
    fn command_message_carries_content_args_and_intent() {
        let message =
            format_command_message("makepr", "Create a pull request.", "fix bug", "/makepr fix bug");
        assert!(message.starts_with("--- Command: /makepr ---"));
        assert!(message.contains("Create a pull request."));
        assert!(message.contains("Arguments: fix bug"));
        assert!(message.ends_with("--- User Intent: /makepr fix bug ---"));
    }

    #[test]
    fn command_message_omits_arguments_block_when_empty() {
        let message = format_command_message("deploy", "Deploy now.", "", "/deploy");
        assert!(!message.contains("Arguments:"));
    }
}
