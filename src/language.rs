//! Programming language tags attached to files and snippets.
//!
//! The editing engine treats the tag as opaque; it is carried along for
//! display and for choosing a file extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(
    clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Language {
    #[default]
    Swift,
    #[value(name = "javascript")]
    JavaScript,
    Python,
    Java,
    #[serde(rename = "C++")]
    #[value(name = "cpp")]
    Cpp,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "XML")]
    Xml,
    Markdown,
}

impl Language {
    pub const ALL: [Self; 10] = [
        Self::Swift,
        Self::JavaScript,
        Self::Python,
        Self::Java,
        Self::Cpp,
        Self::Html,
        Self::Css,
        Self::Json,
        Self::Xml,
        Self::Markdown,
    ];

    /// Human-readable name, also used as the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Swift => "Swift",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Markdown => "Markdown",
        }
    }

    /// Conventional file extension, including the leading dot.
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Swift => ".swift",
            Self::JavaScript => ".js",
            Self::Python => ".py",
            Self::Java => ".java",
            Self::Cpp => ".cpp",
            Self::Html => ".html",
            Self::Css => ".css",
            Self::Json => ".json",
            Self::Xml => ".xml",
            Self::Markdown => ".md",
        }
    }

    /// Guess the language from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let ext = match ext.as_str() {
            "mjs" | "cjs" => "js",
            "cc" | "cxx" | "hpp" | "h" => "cpp",
            "htm" => "html",
            "markdown" => "md",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|lang| lang.file_extension().strip_prefix('.') == Some(ext))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_matches_extensions() {
        assert_eq!(Language::from_path(Path::new("main.swift")), Some(Language::Swift));
        assert_eq!(Language::from_path(Path::new("app.JS")), Some(Language::JavaScript));
        assert_eq!(Language::from_path(Path::new("lib.hpp")), Some(Language::Cpp));
        assert_eq!(Language::from_path(Path::new("README.markdown")), Some(Language::Markdown));
    }

    #[test]
    fn test_from_path_unknown_or_missing_extension() {
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
        assert_eq!(Language::from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_serializes_by_display_name() {
        let json = serde_json::to_string(&Language::Cpp).unwrap();
        assert_eq!(json, "\"C++\"");
        let parsed: Language = serde_json::from_str("\"JavaScript\"").unwrap();
        assert_eq!(parsed, Language::JavaScript);
    }

    #[test]
    fn test_every_language_has_distinct_extension() {
        let mut exts: Vec<_> = Language::ALL.iter().map(|l| l.file_extension()).collect();
        exts.sort_unstable();
        exts.dedup();
        assert_eq!(exts.len(), Language::ALL.len());
    }
}
