use std::borrow::Cow;
use std::ops::RangeInclusive;

use ropey::{Rope, RopeSlice};

/// A span of the document measured in chars.
///
/// A zero `length` is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    /// Char offset of the first selected char.
    pub offset: usize,
    /// Number of selected chars.
    pub length: usize,
}

impl SelectionRange {
    /// Create a range covering `length` chars starting at `offset`.
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Create an empty range (caret) at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self::new(offset, 0)
    }

    /// Char offset one past the last selected char.
    pub const fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Whether this range is a caret with nothing selected.
    pub const fn is_caret(&self) -> bool {
        self.length == 0
    }
}

/// One logical line of a document, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// One-based line number.
    pub number: usize,
    /// Char offset of the line's first char within the document.
    pub offset: usize,
    /// Line content with the terminator stripped.
    pub text: String,
}

impl Line {
    /// The range covering this line's text (terminator excluded).
    pub fn range(&self) -> SelectionRange {
        SelectionRange::new(self.offset, self.text.chars().count())
    }
}

/// The text of one open file, backed by a rope.
///
/// Offsets are char indices. `\n`, `\r\n` and a lone `\r` each count as a
/// single line break, and the line index is maintained by the rope itself so
/// it always agrees with the content.
#[derive(Clone, Default)]
pub struct DocumentBuffer {
    rope: Rope,
}

impl DocumentBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Replace the entire content.
    pub fn set_content(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length of the content in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of logical lines: line breaks plus one, never less than one.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    /// The one-based line numbers shown in the gutter.
    pub fn line_numbers(&self) -> RangeInclusive<usize> {
        1..=self.line_count()
    }

    /// Get the content of a line (without its terminator).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        Some(line_text(self.rope.line(line_idx)))
    }

    /// Char offset where the zero-based `line_idx` starts.
    pub fn line_to_offset(&self, line_idx: usize) -> Option<usize> {
        (line_idx < self.rope.len_lines()).then(|| self.rope.line_to_char(line_idx))
    }

    /// Iterate over all logical lines in order.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        let mut offset = 0;
        self.rope.lines().enumerate().map(move |(idx, slice)| {
            let start = offset;
            offset += slice.len_chars();
            Line {
                number: idx + 1,
                offset: start,
                text: line_text(slice),
            }
        })
    }

    /// Clamp `offset` to the nearest valid char boundary.
    pub fn clamp_offset(&self, offset: usize) -> usize {
        offset.min(self.rope.len_chars())
    }

    /// Clamp a range so that it lies entirely inside the document.
    pub fn clamp_range(&self, range: SelectionRange) -> SelectionRange {
        let offset = self.clamp_offset(range.offset);
        let length = range.length.min(self.rope.len_chars() - offset);
        SelectionRange::new(offset, length)
    }

    /// Insert `text` at `offset`, clamped to the document bounds.
    ///
    /// Returns the offset the text was actually inserted at.
    pub fn insert_at(&mut self, text: &str, offset: usize) -> usize {
        let at = self.clamp_offset(offset);
        if !text.is_empty() {
            self.rope.insert(at, text);
        }
        at
    }
}

impl std::fmt::Debug for DocumentBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuffer")
            .field(
                "rope",
                &format_args!(
                    "Rope({} chars, {} lines)",
                    self.rope.len_chars(),
                    self.line_count()
                ),
            )
            .finish()
    }
}

fn line_text(slice: RopeSlice<'_>) -> String {
    let raw: Cow<'_, str> = slice.into();
    trim_line_ending(&raw).to_owned()
}

fn trim_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}
