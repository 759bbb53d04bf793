// src/search/project_search.rs
//! Search every document of one project
//!
//! A project unit walks its priority documents first and then the rest. Where
//! each document's index comes from depends on the `DocumentSource`:
//! - `Cached`: the shared `IndexCache`; items are marked stale
//! - `Live`: a fresh build through the `IndexBuilder`; linked files are merged
//! - `GeneratedOnly`: live, but only source-generated documents
//!
//! A document that fails to index is logged and skipped. Only cancellation
//! stops the unit early.
//!
//! Live indices are shared through `LiveIndices` for the length of one
//! operation, so a file linked into several projects is built once.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::callback::ItemSink;
use super::document_search::{DocumentSearch, LinkedIndex};
use super::error::{NavigateToError, Result};
use super::host::IndexBuilder;
use super::item::SearchItem;
use crate::cache::IndexCache;
use crate::pattern::{NavigateToPattern, PatternMatcher};
use crate::symbols::{DocumentIndex, KindFilter};
use crate::workspace::{Document, DocumentId, DocumentKey, Project, Solution};

/// Where a project unit gets its document indices from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Cached,
    Live { include_generated: bool },
    GeneratedOnly,
}

/// Live indices built during one operation, keyed by document
///
/// Concurrent requests for one document wait on a single build. Failed builds
/// are not remembered.
#[derive(Default)]
pub struct LiveIndices {
    cells: Mutex<HashMap<DocumentKey, Arc<OnceCell<Arc<DocumentIndex>>>>>,
}

impl LiveIndices {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_build<F>(&self, key: &DocumentKey, build: F) -> Result<Arc<DocumentIndex>>
    where
        F: Future<Output = Result<Arc<DocumentIndex>>>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            cells.entry(key.clone()).or_default().clone()
        };
        cell.get_or_try_init(|| build).await.cloned()
    }

    /// Number of documents built so far
    pub fn len(&self) -> usize {
        let cells = self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed context shared by every document search of one operation
pub struct ProjectSearch<'a> {
    pub solution: &'a Solution,
    pub pattern: &'a NavigateToPattern,
    pub matcher: &'a dyn PatternMatcher,
    pub kinds: &'a KindFilter,
    pub builder: &'a dyn IndexBuilder,
    pub cache: &'a IndexCache,
    pub live: &'a LiveIndices,
    pub cancel: &'a CancellationToken,
}

impl ProjectSearch<'_> {
    /// Search `project`, reporting every candidate to `sink`
    ///
    /// Returns the number of items reported, or `Cancelled`.
    pub async fn search_project(
        &self,
        project: &Project,
        priority_documents: &[DocumentId],
        source: DocumentSource,
        sink: &dyn ItemSink,
    ) -> Result<usize> {
        let documents = ordered_documents(project, priority_documents, source);
        debug!(
            "🔍 Searching project {} ({} documents, {:?})",
            project.name,
            documents.len(),
            source
        );

        let mut found = 0;
        for document in documents {
            if self.cancel.is_cancelled() {
                return Err(NavigateToError::Cancelled);
            }

            match self.search_document(document, source).await {
                Ok(items) => {
                    found += items.len();
                    for item in items {
                        sink.report(item).await;
                    }
                }
                Err(err) if err.is_cancellation() => return Err(err),
                Err(err) => {
                    warn!("⚠️  Skipping {} in {}: {}", document.file_path, project.name, err);
                }
            }
        }

        Ok(found)
    }

    /// Search a single document and collect its candidates
    pub async fn search_document(&self, document: &Document, source: DocumentSource) -> Result<Vec<SearchItem>> {
        let (index, is_stale) = match source {
            DocumentSource::Cached => match self.cache.get_or_compute_index(&document.key(), self.cancel).await? {
                Some(index) => (index, true),
                // Invalidated underneath us: the workspace just finished loading
                None => (self.build_live(document).await?, false),
            },
            DocumentSource::Live { .. } | DocumentSource::GeneratedOnly => (self.build_live(document).await?, false),
        };

        let linked = if is_stale {
            Vec::new()
        } else {
            self.linked_indices(document).await?
        };

        let mut items = Vec::new();
        let search = DocumentSearch {
            pattern: self.pattern,
            matcher: self.matcher,
            kinds: self.kinds,
            cancel: self.cancel,
        };
        search.search(&index, &document.key(), is_stale, &linked, &mut |item| items.push(item))?;
        Ok(items)
    }

    async fn build_live(&self, document: &Document) -> Result<Arc<DocumentIndex>> {
        let key = document.key();
        let build = async {
            match self.builder.build_index(&key, self.cancel).await {
                Ok(index) => Ok(Arc::new(index)),
                Err(_) if self.cancel.is_cancelled() => Err(NavigateToError::Cancelled),
                Err(err) => Err(NavigateToError::IndexBuild {
                    path: document.file_path.to_string(),
                    message: format!("{:#}", err),
                }),
            }
        };
        self.live.get_or_build(&key, build).await
    }

    /// Live indices of the same file in other projects
    ///
    /// A linked copy that fails to build only loses its merge annotation.
    async fn linked_indices(&self, document: &Document) -> Result<Vec<LinkedIndex>> {
        let mut linked = Vec::new();
        for other in self.solution.linked_documents(document) {
            match self.build_live(&other).await {
                Ok(index) => linked.push(LinkedIndex {
                    project_id: other.project_id,
                    index,
                }),
                Err(err) if err.is_cancellation() => return Err(err),
                Err(err) => debug!("Linked index unavailable for {}: {}", other.file_path, err),
            }
        }
        Ok(linked)
    }
}

/// Documents of `project` in search order for `source`
pub fn ordered_documents<'p>(
    project: &'p Project,
    priority_documents: &[DocumentId],
    source: DocumentSource,
) -> Vec<&'p Arc<Document>> {
    if source == DocumentSource::GeneratedOnly {
        return project.generated_documents().collect();
    }

    let mut seen = HashSet::new();
    let mut ordered: Vec<&Arc<Document>> = Vec::with_capacity(project.documents.len());
    let priority = priority_documents.iter().filter_map(|id| project.document(*id));
    for document in priority.chain(project.regular_documents()) {
        if !document.is_generated && seen.insert(document.id) {
            ordered.push(document);
        }
    }

    if source == (DocumentSource::Live { include_generated: true }) {
        ordered.extend(project.generated_documents());
    }
    ordered
}
