//! The editing session for the active file.
//!
//! [`EditorSession`] owns at most one document and drives every mutation of
//! it. The state lives in the session itself rather than in ambient globals:
//! - A [`ContentSink`] is told about every committed change
//! - Subscribers receive a [`SessionEvent`] for every observable transition
//! - [`update`] applies a [`Message`] for callers that prefer message passing
//!
//! No operation returns an error. Bad offsets are clamped and empty queries
//! are no-ops, so a typing surface can forward input without checks.

mod update;

pub use update::{Message, update};

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::{DocumentBuffer, SelectionRange};
use crate::format::{self, TabSize};
use crate::language::Language;
use crate::perf;
use crate::search::{self, SearchResult};
use crate::snippet::{self, Snippet};

/// Stable identifier of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the session receives when a file is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: FileId,
    pub content: String,
    /// Carried for display only; never affects editing behavior.
    pub language: Language,
}

/// Receives committed document content.
///
/// Called synchronously, once per committed change. The session never learns
/// whether the write succeeded; implementations handle their own failures.
pub trait ContentSink {
    fn on_content_changed(&mut self, file: FileId, content: &str, timestamp: SystemTime);
}

impl ContentSink for () {
    fn on_content_changed(&mut self, _file: FileId, _content: &str, _timestamp: SystemTime) {}
}

impl<F> ContentSink for F
where
    F: FnMut(FileId, &str, SystemTime),
{
    fn on_content_changed(&mut self, file: FileId, content: &str, timestamp: SystemTime) {
        self(file, content, timestamp);
    }
}

/// Whether a document is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoFileOpen,
    FileOpen,
}

/// Observable transitions, delivered synchronously to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    FileOpened { file: FileId, language: Language },
    FileClosed { file: FileId },
    ContentChanged { file: FileId, line_count: usize },
    SelectionChanged(SelectionRange),
    SearchResultsChanged { query: String, count: usize },
}

type Subscriber = Box<dyn FnMut(&SessionEvent)>;

#[derive(Debug)]
struct OpenDocument {
    id: FileId,
    language: Language,
    buffer: DocumentBuffer,
    selection: SelectionRange,
    query: Option<String>,
    results: Vec<SearchResult>,
    match_index: Option<usize>,
}

/// Editing state for one active file.
pub struct EditorSession<S: ContentSink> {
    sink: S,
    open: Option<OpenDocument>,
    subscribers: Vec<Subscriber>,
}

impl<S: ContentSink> EditorSession<S> {
    /// Create a session with no file open.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            open: None,
            subscribers: Vec::new(),
        }
    }

    /// Register a callback for every [`SessionEvent`].
    pub fn subscribe(&mut self, callback: impl FnMut(&SessionEvent) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    pub const fn state(&self) -> SessionState {
        if self.open.is_some() {
            SessionState::FileOpen
        } else {
            SessionState::NoFileOpen
        }
    }

    pub fn file_id(&self) -> Option<FileId> {
        self.open.as_ref().map(|doc| doc.id)
    }

    pub fn language(&self) -> Option<Language> {
        self.open.as_ref().map(|doc| doc.language)
    }

    /// The open document's buffer.
    pub fn buffer(&self) -> Option<&DocumentBuffer> {
        self.open.as_ref().map(|doc| &doc.buffer)
    }

    /// The open document's text, empty when no file is open.
    pub fn text(&self) -> String {
        self.buffer().map(DocumentBuffer::text).unwrap_or_default()
    }

    /// Line count of the open document (one when nothing is open).
    pub fn line_count(&self) -> usize {
        self.buffer().map_or(1, DocumentBuffer::line_count)
    }

    pub fn selection(&self) -> SelectionRange {
        self.open.as_ref().map(|doc| doc.selection).unwrap_or_default()
    }

    pub fn search_query(&self) -> Option<&str> {
        self.open.as_ref().and_then(|doc| doc.query.as_deref())
    }

    /// Results of the most recent search.
    pub fn search_results(&self) -> &[SearchResult] {
        self.open
            .as_ref()
            .map(|doc| doc.results.as_slice())
            .unwrap_or_default()
    }

    /// The result most recently reached with [`next_match`](Self::next_match)
    /// or [`prev_match`](Self::prev_match).
    pub fn current_match(&self) -> Option<&SearchResult> {
        let doc = self.open.as_ref()?;
        doc.results.get(doc.match_index?)
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // --- Transitions ---

    /// Load `file`, discarding any document that was open.
    pub fn open_file(&mut self, file: SourceFile) {
        if let Some(previous) = self.open.take() {
            self.emit(&SessionEvent::FileClosed { file: previous.id });
        }
        tracing::debug!(file = %file.id, language = %file.language, "open file");
        let event = SessionEvent::FileOpened {
            file: file.id,
            language: file.language,
        };
        self.open = Some(OpenDocument {
            id: file.id,
            language: file.language,
            buffer: DocumentBuffer::from_text(&file.content),
            selection: SelectionRange::default(),
            query: None,
            results: Vec::new(),
            match_index: None,
        });
        self.emit(&event);
    }

    /// Discard the open document without persisting it.
    pub fn close_file(&mut self) {
        if let Some(previous) = self.open.take() {
            tracing::debug!(file = %previous.id, "close file");
            self.emit(&SessionEvent::FileClosed { file: previous.id });
        }
    }

    /// Replace the whole document with `text` and persist it.
    pub fn edit(&mut self, text: &str) {
        let Some(doc) = self.open.as_mut() else {
            tracing::debug!("edit ignored: no file open");
            return;
        };
        doc.buffer.set_content(text);
        self.commit();
    }

    /// Insert `text` at `offset` (clamped); the caret moves past the insertion.
    pub fn insert_text(&mut self, text: &str, offset: usize) {
        let Some(doc) = self.open.as_mut() else {
            tracing::debug!("insert ignored: no file open");
            return;
        };
        if text.is_empty() {
            return;
        }
        let at = doc.buffer.insert_at(text, offset);
        self.commit();
        self.set_selection(SelectionRange::caret(at + text.chars().count()));
    }

    /// Insert a snippet's code at the caret.
    pub fn insert_snippet(&mut self, snippet: &Snippet) {
        let Some(doc) = self.open.as_mut() else {
            tracing::debug!("snippet ignored: no file open");
            return;
        };
        if snippet.code.is_empty() {
            return;
        }
        let at = doc.buffer.clamp_offset(doc.selection.offset);
        let content = snippet::insert(&doc.buffer, &snippet.code, at);
        doc.buffer.set_content(&content);
        tracing::debug!(title = %snippet.title, offset = at, "insert snippet");
        self.commit();
        self.set_selection(SelectionRange::caret(at + snippet.code.chars().count()));
    }

    /// Re-indent the document by brace depth.
    pub fn format(&mut self, tab_size: TabSize) {
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        let _scope = perf::scope("format");
        let formatted = format::format(&doc.buffer, &tab_size.indent_unit());
        if formatted == doc.buffer.text() {
            return;
        }
        doc.buffer.set_content(&formatted);
        self.commit();
    }

    /// Search the document and publish the matching lines.
    pub fn find(&mut self, query: &str) -> &[SearchResult] {
        let Some(doc) = self.open.as_mut() else {
            return &[];
        };
        let _scope = perf::scope("find");
        doc.results = search::find(&doc.buffer, query);
        doc.query = (!query.is_empty()).then(|| query.to_owned());
        doc.match_index = None;
        let event = SessionEvent::SearchResultsChanged {
            query: query.to_owned(),
            count: doc.results.len(),
        };
        self.emit(&event);
        self.search_results()
    }

    /// Forget the current query and its results.
    pub fn clear_search(&mut self) {
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        if doc.query.is_none() && doc.results.is_empty() {
            return;
        }
        doc.query = None;
        doc.results.clear();
        doc.match_index = None;
        self.emit(&SessionEvent::SearchResultsChanged {
            query: String::new(),
            count: 0,
        });
    }

    /// Replace every case-sensitive occurrence of `query`, then search again
    /// for `query` so the results show what is left.
    pub fn replace_all(&mut self, query: &str, replacement: &str) {
        if query.is_empty() {
            return;
        }
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        let text = doc.buffer.text();
        let replaced = search::replace_all(&text, query, replacement);
        if !replaced.changed() {
            self.find(query);
            return;
        }
        doc.buffer.set_content(&replaced.content);
        doc.query = Some(query.to_owned());
        self.commit();
    }

    /// Move the selection, clamped to the document.
    pub fn select(&mut self, range: SelectionRange) {
        self.set_selection(range);
    }

    /// Put the caret at the start of the one-based `line`.
    /// Lines outside the document are ignored.
    pub fn go_to_line(&mut self, line: usize) {
        let Some(offset) = line
            .checked_sub(1)
            .and_then(|idx| self.buffer()?.line_to_offset(idx))
        else {
            return;
        };
        self.set_selection(SelectionRange::caret(offset));
    }

    /// Select the next matching line, wrapping to the first.
    pub fn next_match(&mut self) {
        self.step_match(|idx, len| idx.map_or(0, |i| (i + 1) % len));
    }

    /// Select the previous matching line, wrapping to the last.
    pub fn prev_match(&mut self) {
        self.step_match(|idx, len| match idx {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    // --- Private helpers ---

    fn step_match(&mut self, next: impl FnOnce(Option<usize>, usize) -> usize) {
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        if doc.results.is_empty() {
            let Some(query) = doc.query.clone() else {
                return;
            };
            self.find(&query);
        }
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        if doc.results.is_empty() {
            return;
        }
        let idx = next(doc.match_index, doc.results.len());
        doc.match_index = Some(idx);
        let range = doc.results[idx].range;
        self.set_selection(range);
    }

    fn set_selection(&mut self, range: SelectionRange) {
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        let range = doc.buffer.clamp_range(range);
        if range == doc.selection {
            return;
        }
        doc.selection = range;
        self.emit(&SessionEvent::SelectionChanged(range));
    }

    /// Persist the current content and notify subscribers.
    ///
    /// An active query is searched again so results never describe old text.
    fn commit(&mut self) {
        let Some(doc) = self.open.as_mut() else {
            return;
        };
        doc.selection = doc.buffer.clamp_range(doc.selection);
        let content = doc.buffer.text();
        self.sink.on_content_changed(doc.id, &content, SystemTime::now());
        let event = SessionEvent::ContentChanged {
            file: doc.id,
            line_count: doc.buffer.line_count(),
        };
        tracing::debug!(file = %doc.id, chars = doc.buffer.len_chars(), "content committed");
        let query = doc.query.clone();
        self.emit(&event);
        if let Some(query) = query {
            self.find(&query);
        }
    }

    fn emit(&mut self, event: &SessionEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}

impl<S: ContentSink> fmt::Debug for EditorSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("state", &self.state())
            .field("file", &self.file_id())
            .field("selection", &self.selection())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
