//! Reusable code snippets.
//!
//! [`insert`] places a snippet's text into a document at a clamped caret
//! offset. [`SnippetLibrary`] keeps the user's snippet collection in a JSON
//! file and seeds it with a handful of templates on first use.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::DocumentBuffer;
use crate::language::Language;
use crate::search::fold_case;
use crate::store::{StoreError, read_json, write_json};

/// File name of the snippet collection inside the data directory.
pub const SNIPPETS_FILE_NAME: &str = "snippets.json";

/// Category given to snippets created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Insert `text` verbatim at `at` (clamped) and return the new content.
pub fn insert(buffer: &DocumentBuffer, text: &str, at: usize) -> String {
    let mut buffer = buffer.clone();
    buffer.insert_at(text, at);
    buffer.text()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(Uuid);

impl SnippetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnippetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A titled block of code that can be inserted at the caret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub code: String,
    pub language: Language,
    pub category: String,
    pub created: SystemTime,
}

impl Snippet {
    pub fn new(
        title: impl Into<String>,
        code: impl Into<String>,
        language: Language,
        category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            id: SnippetId::new(),
            title: title.into(),
            code: code.into(),
            language,
            category: if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_owned()
            } else {
                category
            },
            created: SystemTime::now(),
        }
    }
}

/// The user's snippet collection.
///
/// A library opened from a path saves after every change; one created with
/// [`SnippetLibrary::in_memory`] never touches the disk.
#[derive(Debug)]
pub struct SnippetLibrary {
    path: Option<PathBuf>,
    snippets: Vec<Snippet>,
}

impl SnippetLibrary {
    /// A library holding the default snippets, not backed by a file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            snippets: default_snippets(),
        }
    }

    /// Load the library at `path`, seeding defaults when it is missing or empty.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the seeded library cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snippets: Vec<Snippet> = read_json(&path)?.unwrap_or_default();
        let mut library = Self {
            path: Some(path),
            snippets,
        };
        if library.snippets.is_empty() {
            library.snippets = default_snippets();
            library.save()?;
        }
        Ok(library)
    }

    /// Persist the library if it is file-backed.
    ///
    /// # Errors
    /// Returns an error if the snippets cannot be encoded or written.
    pub fn save(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_json(path, &self.snippets),
            None => Ok(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get(&self, id: SnippetId) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// First snippet whose title matches `title`, ignoring case.
    pub fn by_title(&self, title: &str) -> Option<&Snippet> {
        self.snippets
            .iter()
            .find(|s| s.title.eq_ignore_ascii_case(title))
    }

    /// Add a snippet and persist.
    ///
    /// # Errors
    /// Returns an error if the library cannot be written.
    pub fn add(&mut self, snippet: Snippet) -> Result<SnippetId, StoreError> {
        let id = snippet.id;
        self.snippets.push(snippet);
        self.save()?;
        Ok(id)
    }

    /// Remove a snippet and persist. Returns the removed snippet, if any.
    ///
    /// # Errors
    /// Returns an error if the library cannot be written.
    pub fn remove(&mut self, id: SnippetId) -> Result<Option<Snippet>, StoreError> {
        let Some(idx) = self.snippets.iter().position(|s| s.id == id) else {
            return Ok(None);
        };
        let removed = self.snippets.remove(idx);
        self.save()?;
        Ok(Some(removed))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for snippet in &self.snippets {
            if !categories.contains(&snippet.category.as_str()) {
                categories.push(&snippet.category);
            }
        }
        categories
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Snippet> + 'a {
        self.snippets.iter().filter(move |s| s.category == category)
    }

    /// Snippets whose title or code contains `text`, ignoring case.
    /// An empty `text` matches everything.
    pub fn search(&self, text: &str) -> Vec<&Snippet> {
        let needle = fold_case(text);
        self.snippets
            .iter()
            .filter(|s| {
                fold_case(&s.title).contains(&needle) || fold_case(&s.code).contains(&needle)
            })
            .collect()
    }
}

fn default_snippets() -> Vec<Snippet> {
    vec![
        Snippet::new(
            "SwiftUI View Template",
            "import SwiftUI\n\nstruct ContentView: View {\n    var body: some View {\n        VStack {\n            Text(\"Hello, World!\")\n                .padding()\n        }\n    }\n}\n\n#Preview {\n    ContentView()\n}",
            Language::Swift,
            "Templates",
        ),
        Snippet::new(
            "For Loop",
            "for i in 0..<10 {\n    print(i)\n}",
            Language::Swift,
            "Loops",
        ),
        Snippet::new(
            "Function Template",
            "func functionName(parameter: Type) -> ReturnType {\n    return value\n}",
            Language::Swift,
            "Functions",
        ),
        Snippet::new(
            "JavaScript Function",
            "function functionName(param) {\n    return result;\n}",
            Language::JavaScript,
            "Functions",
        ),
        Snippet::new(
            "Python Class",
            "class ClassName:\n    def __init__(self, param):\n        self.param = param\n\n    def method(self):\n        pass",
            Language::Python,
            "Classes",
        ),
        Snippet::new(
            "HTML Template",
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <title>Document</title>\n</head>\n<body>\n\n</body>\n</html>",
            Language::Html,
            "Templates",
        ),
    ]
}
