// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchResult)
    clippy::module_name_repetitions
)]

//! # NeoCoder
//!
//! The editing engine behind a small code editor.
//!
//! NeoCoder holds one source file at a time and offers:
//! - Case-insensitive line search with match navigation
//! - Replace-all followed by a fresh search
//! - Brace-depth re-indentation
//! - Snippet insertion at the caret
//!
//! ## Architecture
//!
//! An [`session::EditorSession`] owns the active document and mirrors The
//! Elm Architecture (TEA):
//! - **Model**: the session's document, selection and search state
//! - **Message**: [`session::Message`], every request a front end can make
//! - **Update**: [`session::update`], applying a message to the session
//!
//! Committed changes are pushed to an injected [`session::ContentSink`],
//! which is how [`store::ProjectStore`] keeps its JSON file current.
//!
//! ## Modules
//!
//! - [`editor`]: Rope-backed document buffer
//! - [`search`]: Line search and replace-all
//! - [`format`]: Brace indentation
//! - [`snippet`]: Snippet insertion and the snippet library
//! - [`session`]: The editing session
//! - [`store`]: Project and file persistence
//! - [`config`]: Flag-based settings files

pub mod config;
pub mod editor;
pub mod format;
pub mod language;
pub mod perf;
pub mod search;
pub mod session;
pub mod snippet;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::EditorSettings;
    pub use crate::editor::{DocumentBuffer, SelectionRange};
    pub use crate::format::TabSize;
    pub use crate::language::Language;
    pub use crate::session::{
        ContentSink, EditorSession, FileId, Message, SessionEvent, SourceFile, update,
    };
    pub use crate::snippet::{Snippet, SnippetLibrary};
    pub use crate::store::ProjectStore;
}
