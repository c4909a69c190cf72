//! Immutable Solution / Project / Document model and its disk I/O.
//!
//! A [`Solution`] is a value: editing a document produces a new solution
//! that shares every untouched project and document with the previous one.
//! Document and project ids are stable across versions, so a fold over a
//! project looks documents up by id in the latest solution rather than
//! holding on to stale handles.
//!
//! - [`Solution::load`] builds a solution from a directory tree
//! - [`Solution::with_document_text`] is the edit-commit operation
//! - [`write_changes`] writes edited documents back, guarded by the content
//!   hash recorded at load time

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::DEFAULT_EXCLUDES;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from loading or writing a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The workspace root does not exist or is not a directory.
    #[error("workspace root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// A file changed on disk after the solution was loaded.
    #[error("file changed on disk since load: {path}")]
    StaleFile { path: String },

    /// Writing a file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An exclude pattern is not a valid glob.
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(String),

    /// Any other I/O failure while walking or reading the workspace.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Identifiers and Hashes
// ============================================================================

/// Stable identity of a project within a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub u32);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Stable identity of a document within a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// SHA-256 of file content, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Document and Project
// ============================================================================

/// One source file.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub project_id: ProjectId,
    /// Workspace-relative path with forward slashes.
    pub path: String,
    pub text: Arc<str>,
    /// Hash of the content as it was loaded.
    pub original_hash: ContentHash,
}

impl Document {
    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hash of the current text.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::compute(self.text.as_bytes())
    }
}

/// An ordered set of documents.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Document ids in path order.
    pub documents: Vec<DocumentId>,
}

/// A document whose text differs between two solution versions.
#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub id: DocumentId,
    pub path: String,
    pub old_text: Arc<str>,
    pub new_text: Arc<str>,
}

// ============================================================================
// Solution
// ============================================================================

/// An ordered set of projects, the unit every edit produces a new value of.
#[derive(Debug, Clone)]
pub struct Solution {
    root: PathBuf,
    projects: Arc<Vec<Project>>,
    documents: Vec<Arc<Document>>,
    version: u64,
}

impl Solution {
    /// Workspace root the document paths are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of edits applied since this solution was built.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.documents.get(id.0 as usize)
    }

    /// Look a document up by workspace-relative path.
    ///
    /// Accepts `./` prefixes and backslash separators.
    pub fn document_by_path(&self, path: &str) -> Option<&Arc<Document>> {
        let normalized = normalize_path(path);
        self.documents.iter().find(|d| d.path == normalized)
    }

    /// All documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter()
    }

    /// Documents of one project, in path order.
    pub fn project_documents(&self, id: ProjectId) -> Vec<&Arc<Document>> {
        self.project(id)
            .map(|p| p.documents.iter().filter_map(|d| self.document(*d)).collect())
            .unwrap_or_default()
    }

    /// Replace one document's text, producing a new solution.
    ///
    /// Returns `None` if the id is not part of this solution.
    pub fn with_document_text(&self, id: DocumentId, text: impl Into<Arc<str>>) -> Option<Solution> {
        let current = self.document(id)?;
        let mut documents = self.documents.clone();
        documents[id.0 as usize] = Arc::new(Document {
            text: text.into(),
            ..Document::clone(current)
        });
        Some(Solution {
            root: self.root.clone(),
            projects: Arc::clone(&self.projects),
            documents,
            version: self.version + 1,
        })
    }

    /// Documents whose text differs from `original`.
    pub fn changes_since(&self, original: &Solution) -> Vec<DocumentChange> {
        self.documents
            .iter()
            .filter_map(|doc| {
                let before = original.document(doc.id)?;
                if Arc::ptr_eq(&before.text, &doc.text) || before.text == doc.text {
                    return None;
                }
                Some(DocumentChange {
                    id: doc.id,
                    path: doc.path.clone(),
                    old_text: Arc::clone(&before.text),
                    new_text: Arc::clone(&doc.text),
                })
            })
            .collect()
    }

    /// Load every C# source under `root`.
    ///
    /// Every directory holding a `*.csproj` is a project. Each `.cs` file
    /// belongs to its nearest enclosing project directory; files outside any
    /// project form a project named after the root directory.
    pub fn load(root: &Path, config: &WorkspaceConfig) -> Result<Solution, WorkspaceError> {
        if !root.is_dir() {
            return Err(WorkspaceError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize()?;
        let excludes = config.glob_set()?;

        let mut project_dirs: BTreeMap<String, String> = BTreeMap::new();
        let mut sources: Vec<String> = Vec::new();

        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(io::Error::other)?
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");
            if excludes.is_match(&relative) {
                continue;
            }
            match entry.path().extension().and_then(|e| e.to_str()) {
                Some("csproj") => {
                    let dir = parent_dir(&relative).to_string();
                    let name = entry
                        .path()
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| dir.clone());
                    project_dirs.entry(dir).or_insert(name);
                }
                Some("cs") => sources.push(relative),
                _ => {}
            }
        }
        sources.sort();

        let mut groups: BTreeMap<Option<String>, Vec<String>> = BTreeMap::new();
        for path in sources {
            let owner = project_dirs
                .keys()
                .filter(|dir| dir.is_empty() || path.starts_with(&format!("{}/", dir)))
                .max_by_key(|dir| dir.len())
                .cloned();
            groups.entry(owner).or_default().push(path);
        }

        let mut builder = SolutionBuilder::new(&root);
        for (dir, name) in &project_dirs {
            let project = builder.add_project(name.clone());
            for path in groups.remove(&Some(dir.clone())).unwrap_or_default() {
                add_file(&mut builder, &root, project, path)?;
            }
        }
        if let Some(loose) = groups.remove(&None) {
            let name = root
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "workspace".to_string());
            let project = builder.add_project(name);
            for path in loose {
                add_file(&mut builder, &root, project, path)?;
            }
        }

        let solution = builder.build();
        info!(
            root = %solution.root.display(),
            projects = solution.projects.len(),
            documents = solution.documents.len(),
            "loaded solution"
        );
        Ok(solution)
    }
}

fn add_file(
    builder: &mut SolutionBuilder,
    root: &Path,
    project: ProjectId,
    path: String,
) -> Result<(), WorkspaceError> {
    let bytes = fs::read(root.join(&path))?;
    match String::from_utf8(bytes) {
        Ok(text) => {
            debug!(path = %path, "loaded document");
            builder.add_document(project, path, text);
        }
        Err(_) => warn!(path = %path, "skipping file that is not valid UTF-8"),
    }
    Ok(())
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches("./").to_string()
}

// ============================================================================
// Solution Builder
// ============================================================================

/// Builds a [`Solution`] in memory.
#[derive(Debug)]
pub struct SolutionBuilder {
    root: PathBuf,
    projects: Vec<Project>,
    documents: Vec<Arc<Document>>,
}

impl SolutionBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SolutionBuilder {
            root: root.into(),
            projects: Vec::new(),
            documents: Vec::new(),
        }
    }

    pub fn add_project(&mut self, name: impl Into<String>) -> ProjectId {
        let id = ProjectId(self.projects.len() as u32);
        self.projects.push(Project {
            id,
            name: name.into(),
            documents: Vec::new(),
        });
        id
    }

    /// Add a document to a project created by this builder.
    ///
    /// # Panics
    /// Panics if `project` was not returned by [`SolutionBuilder::add_project`].
    pub fn add_document(
        &mut self,
        project: ProjectId,
        path: impl Into<String>,
        text: impl Into<String>,
    ) -> DocumentId {
        let id = DocumentId(self.documents.len() as u32);
        let text: String = text.into();
        self.documents.push(Arc::new(Document {
            id,
            project_id: project,
            path: normalize_path(&path.into()),
            original_hash: ContentHash::compute(text.as_bytes()),
            text: Arc::from(text),
        }));
        self.projects[project.0 as usize].documents.push(id);
        id
    }

    pub fn build(self) -> Solution {
        Solution {
            root: self.root,
            projects: Arc::new(self.projects),
            documents: self.documents,
            version: 0,
        }
    }
}

// ============================================================================
// Workspace Configuration
// ============================================================================

/// Filters applied while loading a solution from disk.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Glob patterns matched against workspace-relative paths.
    pub exclude: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WorkspaceConfig {
    fn glob_set(&self) -> Result<GlobSet, WorkspaceError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .map_err(|e| WorkspaceError::InvalidPattern(format!("{}: {}", pattern, e)))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| WorkspaceError::InvalidPattern(e.to_string()))
    }
}

// ============================================================================
// Write-back
// ============================================================================

/// Write every document changed between `original` and `edited` to disk.
///
/// All preconditions are checked before the first write: each target file's
/// current hash must equal the hash recorded when it was loaded. Returns the
/// written paths in document order.
pub fn write_changes(original: &Solution, edited: &Solution) -> Result<Vec<String>, WorkspaceError> {
    let changes = edited.changes_since(original);

    for change in &changes {
        let expected = original
            .document(change.id)
            .map(|d| d.original_hash.clone())
            .ok_or_else(|| WorkspaceError::StaleFile {
                path: change.path.clone(),
            })?;
        let on_disk = fs::read(original.root().join(&change.path)).map_err(|_| {
            WorkspaceError::StaleFile {
                path: change.path.clone(),
            }
        })?;
        if ContentHash::compute(&on_disk) != expected {
            return Err(WorkspaceError::StaleFile {
                path: change.path.clone(),
            });
        }
    }

    let mut written = Vec::with_capacity(changes.len());
    for change in changes {
        let target = edited.root().join(&change.path);
        fs::write(&target, change.new_text.as_bytes()).map_err(|source| WorkspaceError::Write {
            path: change.path.clone(),
            source,
        })?;
        debug!(path = %change.path, "wrote document");
        written.push(change.path);
    }
    info!(files = written.len(), "wrote changes");
    Ok(written)
}

// ============================================================================
// Tests
// ============================================================================
