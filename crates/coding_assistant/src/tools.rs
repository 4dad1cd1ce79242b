//! Builtin tools and the name-keyed registry that executes them.
//!
//! Every executor returns plain text; failures come back as strings
//! prefixed with the error marker so the model can see and recover from
//! them. Executors never raise to the engine.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use chat_api::{ToolDefinition, ERROR_MARKER};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use wait_timeout::ChildExt;

const RUN_COMMAND_TIMEOUT_SEC: u64 = 30;
const RUN_COMMAND_MAX_OUTPUT_BYTES: usize = 100 * 1024;
const SEARCH_MAX_FILE_MATCHES: usize = 1000;
const SEARCH_MAX_LINE_MATCHES: usize = 500;

type ToolFn = fn(&Path, &Value) -> String;

/// Dispatches model tool-call requests to builtin executors.
///
/// Relative paths in tool arguments resolve against `root`; absolute paths
/// are used as given.
pub struct ToolRegistry {
    root: PathBuf,
    executors: Vec<(&'static str, ToolFn)>,
}

impl ToolRegistry {
    #[must_use]
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            executors: vec![
                ("read_file", read_file as ToolFn),
                ("edit_file", edit_file as ToolFn),
                ("list_files", list_files as ToolFn),
                ("run_command", run_command as ToolFn),
                ("search_files", search_files as ToolFn),
            ],
        }
    }

    /// Schemas advertised to the model with every request.
    #[must_use]
    pub fn definitions(&self) -> &'static [ToolDefinition] {
        builtin_definitions()
    }

    /// Executes a named tool; an unknown name is an error result, not a
    /// protocol fault.
    #[must_use]
    pub fn execute(&self, name: &str, input: &Value) -> String {
        match self
            .executors
            .iter()
            .find(|(tool_name, _)| *tool_name == name)
        {
            Some((_, run)) => run(&self.root, input),
            None => format!("{ERROR_MARKER} Unknown tool: {name}"),
        }
    }
}

fn builtin_definitions() -> &'static [ToolDefinition] {
    static DEFINITIONS: Lazy<Vec<ToolDefinition>> = Lazy::new(|| {
        vec![
            ToolDefinition {
                name: "read_file".to_string(),
                description: "Read the contents of a file at the given path".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string", "description": "Path to the file to read" }
                    },
                    "required": ["path"]
                }),
            },
            ToolDefinition {
                name: "edit_file".to_string(),
                description: "Replace the first occurrence of old_str with new_str in a file"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string", "description": "Path to the file to edit" },
                        "old_str": { "type": "string", "description": "Exact text to replace" },
                        "new_str": { "type": "string", "description": "Replacement text" }
                    },
                    "required": ["path", "old_str", "new_str"]
                }),
            },
            ToolDefinition {
                name: "list_files".to_string(),
                description: "List the entries of a directory".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "Directory to list; defaults to the working directory"
                        }
                    }
                }),
            },
            ToolDefinition {
                name: "run_command".to_string(),
                description: "Run a shell command and return its combined output".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "command": { "type": "string", "description": "Shell command to run" }
                    },
                    "required": ["command"]
                }),
            },
            ToolDefinition {
                name: "search_files".to_string(),
                description:
                    "Find files by glob pattern, optionally filtering lines by a regex".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "pattern": { "type": "string", "description": "Glob pattern, e.g. src/**/*.rs" },
                        "content_pattern": {
                            "type": "string",
                            "description": "Regex applied to each line of the matched files"
                        },
                        "path": { "type": "string", "description": "Base directory for the search" }
                    },
                    "required": ["pattern"]
                }),
            },
        ]
    });

    &DEFINITIONS
}

fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, String> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("{ERROR_MARKER} Missing required argument: {key}"))
}

fn read_file(root: &Path, input: &Value) -> String {
    let path = match required_str(input, "path") {
        Ok(path) => path,
        Err(error) => return error,
    };

    let resolved = resolve_path(root, path);
    match fs::read_to_string(&resolved) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            format!("{ERROR_MARKER} File not found: {path}")
        }
        Err(error) => format!("{ERROR_MARKER} Failed to read file {path}: {error}"),
    }
}

fn edit_file(root: &Path, input: &Value) -> String {
    let path = match required_str(input, "path") {
        Ok(path) => path,
        Err(error) => return error,
    };
    let old_str = match required_str(input, "old_str") {
        Ok(old_str) => old_str,
        Err(error) => return error,
    };
    let new_str = match required_str(input, "new_str") {
        Ok(new_str) => new_str,
        Err(error) => return error,
    };

    if old_str.is_empty() {
        return format!("{ERROR_MARKER} old_str must not be empty");
    }

    let resolved = resolve_path(root, path);
    let content = match fs::read_to_string(&resolved) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return format!("{ERROR_MARKER} File not found: {path}");
        }
        Err(error) => return format!("{ERROR_MARKER} Failed to read file {path}: {error}"),
    };

    if !content.contains(old_str) {
        return format!("{ERROR_MARKER} old_str not found in {path}");
    }

    let updated = content.replacen(old_str, new_str, 1);
    match fs::write(&resolved, updated) {
        Ok(()) => "File edited successfully".to_string(),
        Err(error) => format!("{ERROR_MARKER} Failed to write file {path}: {error}"),
    }
}

fn list_files(root: &Path, input: &Value) -> String {
    let path = input
        .get("path")
        .and_then(Value::as_str)
        .filter(|path| !path.trim().is_empty())
        .unwrap_or(".");

    let resolved = resolve_path(root, path);
    let entries = match fs::read_dir(&resolved) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return format!("{ERROR_MARKER} Directory not found: {path}");
        }
        Err(error) => return format!("{ERROR_MARKER} Failed to list directory {path}: {error}"),
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                format!("{name}/")
            } else {
                name
            }
        })
        .collect();
    names.sort();

    if names.is_empty() {
        "(empty directory)".to_string()
    } else {
        names.join("\n")
    }
}

fn run_command(root: &Path, input: &Value) -> String {
    let command = match required_str(input, "command") {
        Ok(command) => command,
        Err(error) => return error,
    };

    if command.trim().is_empty() {
        return format!("{ERROR_MARKER} Empty command");
    }

    let mut child = match Command::new("bash")
        .arg("-lc")
        .arg(command)
        .current_dir(root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(error) => return format!("{ERROR_MARKER} Failed to launch command: {error}"),
    };

    let timeout = Duration::from_secs(RUN_COMMAND_TIMEOUT_SEC);
    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return format!(
                "{ERROR_MARKER} Command timed out after {RUN_COMMAND_TIMEOUT_SEC}s"
            );
        }
        Err(error) => {
            let _ = child.kill();
            return format!("{ERROR_MARKER} Failed waiting for command: {error}");
        }
    };

    let mut output = String::new();
    read_pipe_into(child.stdout.take(), &mut output);
    read_pipe_into(child.stderr.take(), &mut output);
    let output = truncate_to_byte_limit(output, RUN_COMMAND_MAX_OUTPUT_BYTES);
    let output = output.trim_end().to_string();

    if status.success() {
        output
    } else {
        let code = status
            .code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "terminated by signal".to_string());
        if output.is_empty() {
            format!("{ERROR_MARKER} Command failed with exit code {code}")
        } else {
            format!("{ERROR_MARKER} Command failed with exit code {code}\n{output}")
        }
    }
}

fn search_files(root: &Path, input: &Value) -> String {
    let pattern = match required_str(input, "pattern") {
        Ok(pattern) => pattern,
        Err(error) => return error,
    };
    let content_pattern = input.get("content_pattern").and_then(Value::as_str);
    let base = input
        .get("path")
        .and_then(Value::as_str)
        .filter(|path| !path.trim().is_empty())
        .map(|path| resolve_path(root, path))
        .unwrap_or_else(|| root.to_path_buf());

    let full_pattern = base.join(pattern).to_string_lossy().into_owned();
    let walker = match glob::glob(&full_pattern) {
        Ok(walker) => walker,
        Err(error) => return format!("{ERROR_MARKER} Search failed: {error}"),
    };

    let mut matched_files = Vec::new();
    for entry in walker.flatten() {
        if !entry.is_file() {
            continue;
        }
        matched_files.push(entry);
        if matched_files.len() >= SEARCH_MAX_FILE_MATCHES {
            break;
        }
    }

    let display = |path: &Path| -> String {
        path.strip_prefix(&base)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    };

    let Some(content_pattern) = content_pattern else {
        if matched_files.is_empty() {
            return "No files found matching pattern".to_string();
        }

        let mut names: Vec<String> = matched_files.iter().map(|path| display(path)).collect();
        names.sort();
        let mut result = names.join("\n");
        if matched_files.len() >= SEARCH_MAX_FILE_MATCHES {
            result.push_str(&format!(
                "\n\n(Limited to {SEARCH_MAX_FILE_MATCHES} files)"
            ));
        }
        return result;
    };

    let regex = match regex::Regex::new(content_pattern) {
        Ok(regex) => regex,
        Err(error) => {
            return format!(
                "{ERROR_MARKER} Invalid regex pattern \"{content_pattern}\": {error}"
            );
        }
    };

    let mut matches = Vec::new();
    'files: for file in &matched_files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };

        for (index, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                matches.push(format!("{}:{}:{line}", display(file), index + 1));
                if matches.len() >= SEARCH_MAX_LINE_MATCHES {
                    break 'files;
                }
            }
        }
    }

    if matches.is_empty() {
        return "No matches found".to_string();
    }

    let mut result = matches.join("\n");
    if matches.len() >= SEARCH_MAX_LINE_MATCHES {
        result.push_str(&format!(
            "\n\n(Limited to {SEARCH_MAX_LINE_MATCHES} matches)"
        ));
    }
    result
}

fn read_pipe_into(pipe: Option<impl Read>, output: &mut String) {
    let Some(mut pipe) = pipe else {
        return;
    };

    let mut bytes = Vec::new();
    let _ = pipe.read_to_end(&mut bytes);
    output.push_str(&String::from_utf8_lossy(&bytes));
}

fn truncate_to_byte_limit(content: String, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content;
    }

    let mut cutoff = max_bytes;
    while cutoff > 0 && !content.is_char_boundary(cutoff) {
        cutoff -= 1;
    }

    let mut truncated = content[..cutoff].to_string();
    truncated.push_str("\n[truncated]");
    truncated
}
