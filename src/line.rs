//! Styled transcript lines and their ANSI emission.
//!
//! A [`Line`] is the unit the render pipeline produces: plain text plus a
//! semantic color tag and a dim flag. Lines stay ANSI-free until a terminal
//! writes them, so tests can assert on content without escape-sequence noise.

/// Foreground color tag for a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Terminal default foreground.
    #[default]
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// Bright black; most terminals render this as gray.
    Gray,
}

impl Color {
    fn sgr(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Red => Some("31"),
            Self::Green => Some("32"),
            Self::Yellow => Some("33"),
            Self::Blue => Some("34"),
            Self::Magenta => Some("35"),
            Self::Cyan => Some("36"),
            Self::White => Some("37"),
            Self::Gray => Some("90"),
        }
    }
}

/// One renderable terminal line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub text: String,
    pub color: Color,
    pub dim: bool,
}

impl Line {
    #[must_use]
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            dim: false,
        }
    }

    #[must_use]
    pub fn dim(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            dim: true,
        }
    }

    /// A blank separator line.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Renders the line as an ANSI-styled string, resetting attributes at the end.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut codes: Vec<&str> = Vec::with_capacity(2);
        if self.dim {
            codes.push("2");
        }
        if let Some(color) = self.color.sgr() {
            codes.push(color);
        }

        if codes.is_empty() {
            return self.text.clone();
        }

        format!("\x1b[{}m{}\x1b[0m", codes.join(";"), self.text)
    }
}
