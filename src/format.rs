//! Brace-driven re-indentation.
//!
//! The formatter is a lexical heuristic: it counts `{` and `}` per line and
//! knows nothing about strings, comments or language grammar. A brace inside
//! a string literal moves the indentation exactly like a structural one.

use crate::editor::DocumentBuffer;

/// Smallest accepted tab size.
pub const MIN_TAB_SIZE: usize = 2;
/// Largest accepted tab size.
pub const MAX_TAB_SIZE: usize = 8;
/// Tab size used when none is configured.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Number of spaces per indentation level, always within
/// [`MIN_TAB_SIZE`]..=[`MAX_TAB_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabSize(usize);

impl TabSize {
    /// Create a tab size, clamping out-of-range values.
    pub fn new(size: usize) -> Self {
        Self(size.clamp(MIN_TAB_SIZE, MAX_TAB_SIZE))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// One level of indentation: `get()` spaces.
    pub fn indent_unit(self) -> String {
        " ".repeat(self.0)
    }
}

impl Default for TabSize {
    fn default() -> Self {
        Self(DEFAULT_TAB_SIZE)
    }
}

/// Re-indent every line of `buffer` by brace depth.
///
/// Each line is trimmed of tabs and spaces; a line containing `}` dedents
/// itself by one level (never below zero) and a line containing `{` indents
/// the following lines by one level. Both adjustments happen at most once per line. Lines are
/// joined with `\n`, whatever line endings the input used.
pub fn format(buffer: &DocumentBuffer, indent_unit: &str) -> String {
    let mut depth = 0usize;
    let mut formatted = Vec::with_capacity(buffer.line_count());

    for line in buffer.lines() {
        let trimmed = line.text.trim_matches(is_blank);
        if trimmed.contains('}') {
            depth = depth.saturating_sub(1);
        }
        formatted.push(format!("{}{trimmed}", indent_unit.repeat(depth)));
        if trimmed.contains('{') {
            depth += 1;
        }
    }

    formatted.join("\n")
}

/// Tab or a space separator. Vertical breaks such as U+0085 and U+2028 stay.
fn is_blank(c: char) -> bool {
    c.is_whitespace()
        && !matches!(
            c,
            '\n' | '\u{b}' | '\u{c}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
}
