//! Unified-diff line generation for edit previews.
//!
//! Produces plain prefixed lines (`@@`, `- `, `+ `, `  `) with `─` rules
//! between hunks. Coloring is left to the transcript renderer so the output
//! here stays assertable in tests.

use similar::{ChangeTag, TextDiff};

const HUNK_CONTEXT_LINES: usize = 3;
const HUNK_SEPARATOR_WIDTH: usize = 40;

/// Computes unified-diff lines between two texts.
///
/// Returns an empty vector when the texts are equal; callers fall back to
/// whatever raw result text they have.
#[must_use]
pub fn unified_diff_lines(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();

    for (group_index, group) in diff.grouped_ops(HUNK_CONTEXT_LINES).iter().enumerate() {
        if group.is_empty() {
            continue;
        }

        if group_index > 0 {
            lines.push("─".repeat(HUNK_SEPARATOR_WIDTH));
        }

        let old_start = group[0].old_range().start;
        let old_end = group[group.len() - 1].old_range().end;
        let new_start = group[0].new_range().start;
        let new_end = group[group.len() - 1].new_range().end;
        lines.push(hunk_header(
            old_start,
            old_end - old_start,
            new_start,
            new_end - new_start,
        ));

        for op in group {
            for change in diff.iter_changes(op) {
                let prefix = match change.tag() {
                    ChangeTag::Delete => "- ",
                    ChangeTag::Insert => "+ ",
                    ChangeTag::Equal => "  ",
                };
                let value = change.value();
                let value = value.strip_suffix('\n').unwrap_or(value);
                let value = value.strip_suffix('\r').unwrap_or(value);
                lines.push(format!("{prefix}{value}"));
            }
        }
    }

    lines
}

fn hunk_header(old_start: usize, old_len: usize, new_start: usize, new_len: usize) -> String {
    // Unified-diff starts are 1-based except for empty ranges.
    let old_display = if old_len == 0 { old_start } else { old_start + 1 };
    let new_display = if new_len == 0 { new_start } else { new_start + 1 };
    format!("@@ -{old_display},{old_len} +{new_display},{new_len} @@")
}
