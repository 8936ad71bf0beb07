//! JSON-backed project and file storage.
//!
//! [`ProjectStore`] is the persistence collaborator behind an
//! [`EditorSession`](crate::session::EditorSession): it receives every
//! committed edit through [`ContentSink`] and writes the whole project list
//! back to disk. Write failures are logged and dropped so that the editor
//! never stalls on storage.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::Language;
use crate::session::{ContentSink, FileId, SourceFile};

/// File name of the project list inside the data directory.
pub const PROJECTS_FILE_NAME: &str = "projects.json";

/// Errors raised by the on-disk stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed store {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode store")]
    Encode(#[from] serde_json::Error),
    #[error("unknown project {0}")]
    UnknownProject(ProjectId),
    #[error("unknown file {0}")]
    UnknownFile(FileId),
}

/// Stable identifier of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    pub id: FileId,
    pub name: String,
    pub content: String,
    pub language: Language,
    pub last_modified: SystemTime,
}

impl CodeFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>, language: Language) -> Self {
        Self {
            id: FileId::new(),
            name: name.into(),
            content: content.into(),
            language,
            last_modified: SystemTime::now(),
        }
    }

    /// The tuple handed to the editor when this file is opened.
    pub fn source(&self) -> SourceFile {
        SourceFile {
            id: self.id,
            content: self.content.clone(),
            language: self.language,
        }
    }
}

/// A named collection of files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub files: Vec<CodeFile>,
    pub created: SystemTime,
    pub last_modified: SystemTime,
}

impl Project {
    pub fn new(name: impl Into<String>, files: Vec<CodeFile>) -> Self {
        let now = SystemTime::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            files,
            created: now,
            last_modified: now,
        }
    }

    pub fn file(&self, id: FileId) -> Option<&CodeFile> {
        self.files.iter().find(|f| f.id == id)
    }
}

/// All projects, persisted as one JSON array.
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    projects: Vec<Project>,
    current: Option<ProjectId>,
}

impl ProjectStore {
    /// Load the store at `path`, seeding a sample project when it is empty.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the seeded store cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::load(path)?;
        if store.projects.is_empty() {
            tracing::debug!(path = %store.path.display(), "seeding sample project");
            store.projects.push(sample_project());
            store.current = store.projects.first().map(|p| p.id);
            store.save()?;
        }
        Ok(store)
    }

    /// Load the store at `path`; a missing file yields an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let projects: Vec<Project> = read_json(&path)?.unwrap_or_default();
        let current = projects.first().map(|p| p.id);
        Ok(Self {
            path,
            projects,
            current,
        })
    }

    /// Write every project back to disk.
    ///
    /// # Errors
    /// Returns an error if the projects cannot be encoded or written.
    pub fn save(&self) -> Result<(), StoreError> {
        write_json(&self.path, &self.projects)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current.and_then(|id| self.project(id))
    }

    /// Make `id` the current project.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownProject`] if no such project exists.
    pub fn set_current_project(&mut self, id: ProjectId) -> Result<(), StoreError> {
        if self.project(id).is_none() {
            return Err(StoreError::UnknownProject(id));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Find a file in any project.
    pub fn file(&self, id: FileId) -> Option<&CodeFile> {
        self.projects.iter().find_map(|p| p.file(id))
    }

    /// Add an empty project and persist.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn create_project(&mut self, name: impl Into<String>) -> Result<ProjectId, StoreError> {
        let project = Project::new(name, Vec::new());
        let id = project.id;
        self.projects.push(project);
        self.save()?;
        Ok(id)
    }

    /// Remove a project and persist. The current project falls back to the
    /// first remaining one.
    ///
    /// # Errors
    /// Returns an error if the project is unknown or the store cannot be written.
    pub fn delete_project(&mut self, id: ProjectId) -> Result<(), StoreError> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            return Err(StoreError::UnknownProject(id));
        }
        if self.current == Some(id) {
            self.current = self.projects.first().map(|p| p.id);
        }
        self.save()
    }

    /// Add an empty file to `project` and persist.
    ///
    /// # Errors
    /// Returns an error if the project is unknown or the store cannot be written.
    pub fn create_file(
        &mut self,
        project: ProjectId,
        name: impl Into<String>,
        language: Language,
    ) -> Result<FileId, StoreError> {
        let project = self.project_mut(project)?;
        let file = CodeFile::new(name, String::new(), language);
        let id = file.id;
        project.last_modified = file.last_modified;
        project.files.push(file);
        self.save()?;
        Ok(id)
    }

    /// Replace a file's content and persist.
    ///
    /// # Errors
    /// Returns an error if the file is unknown or the store cannot be written.
    pub fn update_file(
        &mut self,
        id: FileId,
        content: &str,
        timestamp: SystemTime,
    ) -> Result<(), StoreError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.files.iter().any(|f| f.id == id))
            .ok_or(StoreError::UnknownFile(id))?;
        if let Some(file) = project.files.iter_mut().find(|f| f.id == id) {
            file.content = content.to_owned();
            file.last_modified = timestamp;
        }
        project.last_modified = timestamp;
        self.save()
    }

    /// Remove a file from `project` and persist.
    ///
    /// # Errors
    /// Returns an error if the project or file is unknown, or the store
    /// cannot be written.
    pub fn delete_file(&mut self, project: ProjectId, id: FileId) -> Result<(), StoreError> {
        let project = self.project_mut(project)?;
        let before = project.files.len();
        project.files.retain(|f| f.id != id);
        if project.files.len() == before {
            return Err(StoreError::UnknownFile(id));
        }
        project.last_modified = SystemTime::now();
        self.save()
    }

    fn project_mut(&mut self, id: ProjectId) -> Result<&mut Project, StoreError> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::UnknownProject(id))
    }
}

impl ContentSink for ProjectStore {
    fn on_content_changed(&mut self, file: FileId, content: &str, timestamp: SystemTime) {
        if let Err(err) = self.update_file(file, content, timestamp) {
            tracing::warn!(%file, error = %err, "failed to persist file content");
        }
    }
}

/// Read a JSON document, treating a missing file as `None`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a JSON document, creating parent directories as needed.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn sample_project() -> Project {
    let welcome = CodeFile::new(
        "Welcome.swift",
        r#"import SwiftUI

struct WelcomeView: View {
    var body: some View {
        VStack(spacing: 20) {
            Text("Welcome to NeoCoder!")
                .font(.largeTitle)
            Button("Start Coding") {
                print("Ready to code!")
            }
        }
        .padding()
    }
}"#,
        Language::Swift,
    );
    let fibonacci = CodeFile::new(
        "example.js",
        r#"function fibonacci(n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

for (let i = 0; i < 10; i++) {
    console.log(`F(${i}) = ${fibonacci(i)}`);
}"#,
        Language::JavaScript,
    );
    Project::new("Welcome to NeoCoder", vec![welcome, fibonacci])
}
