//! Single-line input editor.
//!
//! Backspace removes one grapheme cluster, not one `char`, so combining
//! sequences and emoji delete as a unit.

use unicode_segmentation::UnicodeSegmentation;

use crate::text::visible_width;

const PROMPT: &str = "› ";
const CURSOR_GLYPH: &str = "▎";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    value: String,
    placeholder: String,
}

impl InputLine {
    #[must_use]
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            placeholder: placeholder.into(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn insert_char(&mut self, ch: char) {
        self.value.push(ch);
    }

    pub fn backspace(&mut self) {
        if let Some((offset, _)) = self.value.grapheme_indices(true).last() {
            self.value.truncate(offset);
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Takes the current value, leaving the editor empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    /// Renders the editor row, truncating the head when the value overflows.
    #[must_use]
    pub fn render(&self, width: usize, focused: bool) -> String {
        let prompt_width = visible_width(PROMPT);
        let cursor = if focused { CURSOR_GLYPH } else { "" };
        let budget = width
            .saturating_sub(prompt_width)
            .saturating_sub(visible_width(cursor));

        if self.value.is_empty() {
            let placeholder: String = self
                .placeholder
                .graphemes(true)
                .take(budget)
                .collect();
            return format!(
                "{PROMPT}\x1b[2m{placeholder}\x1b[0m{cursor}"
            );
        }

        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let visible: String = if graphemes.len() > budget {
            graphemes[graphemes.len() - budget..].concat()
        } else {
            self.value.clone()
        };

        format!("{PROMPT}{visible}{cursor}")
    }
}
