// src/workspace/mod.rs
//! Workspace snapshot model for navigate-to
//!
//! A `Solution` is an immutable snapshot of every project and document the
//! engine can search. Searches hold an `Arc<Solution>` for their whole lifetime,
//! so results are always materialized against the snapshot they were found in.
//!
//! - `ProjectId` / `DocumentId`: opaque, serializable identities
//! - `DocumentKey`: content-independent cache key (project + document + path)
//! - Linked documents: the same file path included by more than one project

pub mod manifest;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a project within a solution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(pub Uuid);

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
        write!(f, "{}", self.0)
    }
}

/// Identity of a document within a solution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable cache identity of a document, independent of its current contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub project_id: ProjectId,
    pub document_id: DocumentId,
    pub file_path: Arc<str>,
}

/// A source document belonging to exactly one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub project_id: ProjectId,
    pub file_path: Arc<str>,
    /// Logical folders from the project root to the file
    pub folders: Vec<String>,
    /// Produced by a source generator rather than written by hand
    pub is_generated: bool,
}

impl Document {
    pub fn key(&self) -> DocumentKey {
        DocumentKey {
            project_id: self.project_id,
            document_id: self.id,
            file_path: self.file_path.clone(),
        }
    }

    /// File name including extension (`Outer.Inner.cs`)
    pub fn file_name(&self) -> &str {
        Path::new(self.file_path.as_ref())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }

    /// File name without its final extension (`Outer.Inner`)
    pub fn file_stem(&self) -> &str {
        Path::new(self.file_path.as_ref())
            .file_stem()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }
}

/// Folder components of a relative path, excluding the file name itself
pub fn folders_from_path(file_path: &str) -> Vec<String> {
    let mut parts: Vec<String> = file_path
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .map(str::to_string)
        .collect();
    parts.pop();
    parts
}

/// A project: a named set of documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    /// Full project name, optionally carrying a flavor: `Core(net8.0)`
    pub name: String,
    pub documents: Vec<Arc<Document>>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Add a hand-written document; folders are derived from the path
    pub fn add_document(&mut self, file_path: &str) -> DocumentId {
        self.push_document(file_path, false)
    }

    /// Add a source-generated document
    pub fn add_generated_document(&mut self, file_path: &str) -> DocumentId {
        self.push_document(file_path, true)
    }

    fn push_document(&mut self, file_path: &str, is_generated: bool) -> DocumentId {
        let id = DocumentId::new();
        self.documents.push(Arc::new(Document {
            id,
            project_id: self.id,
            file_path: Arc::from(file_path),
            folders: folders_from_path(file_path),
            is_generated,
        }));
        id
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Regular (non-generated) documents in declaration order
    pub fn regular_documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter().filter(|doc| !doc.is_generated)
    }

    pub fn generated_documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter().filter(|doc| doc.is_generated)
    }

    /// Split `Name(flavor)` into its simple name and flavor
    ///
    /// Multi-targeted projects are loaded once per target and share a simple name.
    pub fn name_and_flavor(&self) -> (&str, Option<&str>) {
        let name = self.name.trim();
        if let Some(without_close) = name.strip_suffix(')') {
            if let Some(open) = without_close.rfind('(') {
                let simple = without_close[..open].trim_end();
                let flavor = without_close[open + 1..].trim();
                if !simple.is_empty() && !flavor.is_empty() {
                    return (simple, Some(flavor));
                }
            }
        }
        (name, None)
    }
}

/// Immutable snapshot of the whole workspace
#[derive(Debug, Clone, Default)]
pub struct Solution {
    projects: Vec<Arc<Project>>,
    /// document id -> (project index, document index)
    document_locations: HashMap<DocumentId, (usize, usize)>,
    /// file path -> every document including that file
    documents_by_path: HashMap<Arc<str>, Vec<DocumentId>>,
}

impl Solution {
    pub fn new(projects: Vec<Project>) -> Self {
        let projects: Vec<Arc<Project>> = projects.into_iter().map(Arc::new).collect();
        let mut document_locations = HashMap::new();
        let mut documents_by_path: HashMap<Arc<str>, Vec<DocumentId>> = HashMap::new();

        for (project_index, project) in projects.iter().enumerate() {
            for (document_index, document) in project.documents.iter().enumerate() {
                document_locations.insert(document.id, (project_index, document_index));
                documents_by_path
                    .entry(document.file_path.clone())
                    .or_default()
                    .push(document.id);
            }
        }

        Self {
            projects,
            document_locations,
            documents_by_path,
        }
    }

    pub fn projects(&self) -> &[Arc<Project>] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Arc<Project>> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        let (project_index, document_index) = *self.document_locations.get(&id)?;
        self.projects
            .get(project_index)
            .and_then(|project| project.documents.get(document_index))
    }

    /// Resolve a document by project and path (used for keys from an older snapshot)
    pub fn find_document(&self, project_id: ProjectId, file_path: &str) -> Option<&Arc<Document>> {
        self.documents_by_path
            .get(file_path)?
            .iter()
            .filter_map(|id| self.document(*id))
            .find(|doc| doc.project_id == project_id)
    }

    /// Other documents (in other projects) that include the same file
    pub fn linked_documents(&self, document: &Document) -> Vec<Arc<Document>> {
        self.documents_by_path
            .get(&document.file_path)
            .map(|ids| {
                ids.iter()
                    .filter(|id| **id != document.id)
                    .filter_map(|id| self.document(*id))
                    .filter(|doc| doc.project_id != document.project_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn document_count(&self) -> usize {
        self.document_locations.len()
    }
}
