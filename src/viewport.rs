//! Bottom-anchored viewport windowing over a rendered line array.
//!
//! Offset 0 shows the newest `height` lines; larger offsets scroll back.
//! The window is recomputed from the full line array on every render, so
//! there is no incremental scroll state to desynchronize.

use crate::line::Line;

/// Clamps a requested scroll offset to `[0, max(0, total - height)]`.
#[must_use]
pub fn clamp_scroll_offset(total: usize, height: usize, requested: usize) -> usize {
    requested.min(total.saturating_sub(height))
}

/// Extracts the visible window, padding with blank lines above short content.
///
/// The returned vector always has exactly `height` entries.
#[must_use]
pub fn window_lines(lines: &[Line], height: usize, scroll_offset: usize) -> Vec<Line> {
    if height == 0 {
        return Vec::new();
    }

    let total = lines.len();
    let offset = clamp_scroll_offset(total, height, scroll_offset);
    let end = total - offset;
    let start = end.saturating_sub(height);

    let mut window = Vec::with_capacity(height);
    for _ in 0..height.saturating_sub(end - start) {
        window.push(Line::blank());
    }
    window.extend(lines[start..end].iter().cloned());
    window
}
