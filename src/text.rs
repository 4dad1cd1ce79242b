//! Text splitting, fixed-width wrapping, and ANSI-aware width helpers.
//!
//! Wrapping is a pure character chunker: logical lines split on newlines,
//! then hard-wrapped at `width` characters with no word-boundary awareness.
//! Rejoining the chunks of a logical line reproduces it exactly, so wrapping
//! is lossless modulo the inserted breaks.

use unicode_width::UnicodeWidthStr;

/// Splits text on `\n`, tolerating `\r\n` endings.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Hard-wraps one logical line to `width` characters.
///
/// Width 0 yields a single empty line so callers always receive at least one
/// row per logical line.
#[must_use]
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= width {
        return vec![line.to_string()];
    }

    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Splits on newlines, then hard-wraps every logical line.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    for line in split_lines(text) {
        wrapped.extend(wrap_line(line, width));
    }
    wrapped
}

/// Removes CSI escape sequences, leaving printable text.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == 0x1b && index + 1 < bytes.len() && bytes[index + 1] == b'[' {
            index += 2;
            while index < bytes.len() {
                let byte = bytes[index];
                index += 1;
                if (b'@'..=b'~').contains(&byte) {
                    break;
                }
            }
            continue;
        }

        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Display width of the text after stripping escape sequences.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    strip_ansi(text).width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_handles_crlf_and_lf() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }

    #[test]
    fn wrap_line_returns_line_unchanged_when_it_fits() {
        assert_eq!(wrap_line("short", 10), vec!["short"]);
    }

    #[test]
    fn wrap_line_chunks_at_exact_width() {
        assert_eq!(wrap_line("abcdef", 2), vec!["ab", "cd", "ef"]);
        assert_eq!(wrap_line("abcde", 2), vec!["ab", "cd", "e"]);
    }

    #[test]
    fn wrap_line_zero_width_yields_single_empty_line() {
        assert_eq!(wrap_line("anything", 0), vec![""]);
    }

    #[test]
    fn wrap_line_counts_characters_not_bytes() {
        assert_eq!(wrap_line("héllo", 2), vec!["hé", "ll", "o"]);
    }

    #[test]
    fn wrap_text_is_lossless_modulo_breaks() {
        let text = "first line\nsecond longer line\n\ntail";
        for width in 1..=12 {
            let rejoined: String = wrap_text(text, width).concat();
            let expected: String = text.chars().filter(|c| *c != '\n').collect();
            assert_eq!(rejoined, expected, "width {width}");
        }
    }

    #[test]
    fn wrap_text_empty_input_yields_one_empty_line() {
        assert_eq!(wrap_text("", 8), vec![""]);
    }

    #[test]
    fn strip_ansi_removes_color_sequences() {
        assert_eq!(strip_ansi("\x1b[36mhi\x1b[0m there"), "hi there");
    }

    #[test]
    fn visible_width_ignores_escape_codes() {
        assert_eq!(visible_width("\x1b[2;31mfour\x1b[0m"), 4);
    }
}
