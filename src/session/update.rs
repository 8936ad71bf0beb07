use crate::editor::SelectionRange;
use crate::format::TabSize;
use crate::snippet::Snippet;

use super::{ContentSink, EditorSession, SourceFile};

/// Every operation a front end can request of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Files
    /// Load a file, discarding the current one
    OpenFile(SourceFile),
    /// Discard the current file
    CloseFile,

    // Editing
    /// Replace the whole document
    Edit(String),
    /// Insert text at a char offset (clamped)
    InsertText { text: String, offset: usize },
    /// Insert a snippet at the caret
    InsertSnippet(Snippet),
    /// Re-indent by brace depth
    Format(TabSize),

    // Search
    /// Search for lines containing the query
    Find(String),
    /// Replace every occurrence, then search again for the query
    ReplaceAll { query: String, replacement: String },
    /// Select the next matching line
    NextMatch,
    /// Select the previous matching line
    PrevMatch,
    /// Drop the query and its results
    ClearSearch,

    // Navigation
    /// Move the selection
    Select(SelectionRange),
    /// Put the caret at the start of a one-based line
    GoToLine(usize),
}

/// Apply `msg` to the session.
pub fn update<S: ContentSink>(mut session: EditorSession<S>, msg: Message) -> EditorSession<S> {
    match msg {
        Message::OpenFile(file) => session.open_file(file),
        Message::CloseFile => session.close_file(),
        Message::Edit(text) => session.edit(&text),
        Message::InsertText { text, offset } => session.insert_text(&text, offset),
        Message::InsertSnippet(snippet) => session.insert_snippet(&snippet),
        Message::Format(tab_size) => session.format(tab_size),
        Message::Find(query) => {
            session.find(&query);
        }
        Message::ReplaceAll { query, replacement } => session.replace_all(&query, &replacement),
        Message::NextMatch => session.next_match(),
        Message::PrevMatch => session.prev_match(),
        Message::ClearSearch => session.clear_search(),
        Message::Select(range) => session.select(range),
        Message::GoToLine(line) => session.go_to_line(line),
    }
    session
}
