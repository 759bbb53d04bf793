// src/workspace/manifest.rs
//! JSON workspace manifests
//!
//! A manifest describes projects, their documents and the declarations already
//! extracted from each document. The CLI loads one to drive a search without a
//! language front-end, and tests use the same format to build fixtures.
//!
//! ```json
//! {
//!   "projects": [
//!     { "name": "Core(net8.0)",
//!       "documents": [
//!         { "path": "src/Foo.cs",
//!           "declarations": [ { "name": "Foo", "kind": "class", "span": { "start": 0, "length": 3 } } ] }
//!       ] }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{DocumentId, DocumentKey, Project, Solution};
use crate::search::host::IndexBuilder;
use crate::symbols::{Accessibility, DeclaredSymbolInfo, DeclaredSymbolKind, DocumentIndex, TextSpan};

/// Root of a workspace manifest file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub path: String,
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub declarations: Vec<DeclarationEntry>,
}

/// One declaration; everything but name, kind and span is optional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationEntry {
    pub name: String,
    pub kind: DeclaredSymbolKind,
    pub span: TextSpan,
    #[serde(default)]
    pub name_suffix: String,
    #[serde(default)]
    pub container: String,
    /// Defaults to `container` when omitted
    #[serde(default)]
    pub fully_qualified_container: Option<String>,
    #[serde(default = "default_accessibility")]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_partial: bool,
    #[serde(default)]
    pub is_nested_type: bool,
    #[serde(default)]
    pub parameter_count: u32,
    #[serde(default)]
    pub type_parameter_count: u32,
}

fn default_accessibility() -> Accessibility {
    Accessibility::Public
}

impl From<DeclarationEntry> for DeclaredSymbolInfo {
    fn from(entry: DeclarationEntry) -> Self {
        let fully_qualified = entry
            .fully_qualified_container
            .unwrap_or_else(|| entry.container.clone());
        DeclaredSymbolInfo {
            name: Arc::from(entry.name),
            name_suffix: Arc::from(entry.name_suffix),
            container_display_name: Arc::from(entry.container),
            fully_qualified_container_name: Arc::from(fully_qualified),
            kind: entry.kind,
            accessibility: entry.accessibility,
            span: entry.span,
            is_partial: entry.is_partial,
            is_nested_type: entry.is_nested_type,
            parameter_count: entry.parameter_count,
            type_parameter_count: entry.type_parameter_count,
        }
    }
}

impl WorkspaceManifest {
    /// Load a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read workspace manifest {}", path.display()))?;
        let manifest: WorkspaceManifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid workspace manifest {}", path.display()))?;
        debug!(
            "📄 Loaded manifest {} ({} projects)",
            path.display(),
            manifest.projects.len()
        );
        Ok(manifest)
    }

    /// Build the solution snapshot and an index builder serving its declarations
    pub fn into_workspace(self) -> (Solution, ManifestIndexBuilder) {
        let mut projects = Vec::with_capacity(self.projects.len());
        let mut indices = HashMap::new();

        for project_entry in self.projects {
            let mut project = Project::new(project_entry.name);
            for document_entry in project_entry.documents {
                let id = if document_entry.generated {
                    project.add_generated_document(&document_entry.path)
                } else {
                    project.add_document(&document_entry.path)
                };
                let declarations = document_entry
                    .declarations
                    .into_iter()
                    .map(DeclaredSymbolInfo::from)
                    .collect();
                indices.insert(id, Arc::new(DocumentIndex::new(declarations)));
            }
            projects.push(project);
        }

        let solution = Solution::new(projects);
        info!(
            "🗂️  Workspace ready: {} projects, {} documents",
            solution.projects().len(),
            solution.document_count()
        );
        (solution, ManifestIndexBuilder { indices })
    }
}

/// Serves pre-extracted declarations from a manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestIndexBuilder {
    indices: HashMap<DocumentId, Arc<DocumentIndex>>,
}

impl ManifestIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the declarations of one document
    pub fn insert(&mut self, document_id: DocumentId, declarations: Vec<DeclaredSymbolInfo>) {
        self.indices
            .insert(document_id, Arc::new(DocumentIndex::new(declarations)));
    }
}

#[async_trait]
impl IndexBuilder for ManifestIndexBuilder {
    async fn build_index(&self, key: &DocumentKey, cancel: &CancellationToken) -> Result<DocumentIndex> {
        if cancel.is_cancelled() {
            anyhow::bail!("index build cancelled for {}", key.file_path);
        }
        Ok(self
            .indices
            .get(&key.document_id)
            .map(|index| index.as_ref().clone())
            .unwrap_or_default())
    }
}
