// src/search/document_search.rs
//! Match a compiled pattern against one document's declaration index
//!
//! This is the innermost loop of navigate-to. It never suspends: the index is
//! already in hand, and every candidate found is pushed to the sink immediately.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::error::{NavigateToError, Result};
use super::item::SearchItem;
use crate::pattern::{NavigateToPattern, PatternMatcher};
use crate::symbols::{DocumentIndex, KindFilter};
use crate::workspace::{DocumentKey, ProjectId};

/// The index of a document linked into another project
pub struct LinkedIndex {
    pub project_id: ProjectId,
    pub index: Arc<DocumentIndex>,
}

/// Everything about one document search except the sink
pub struct DocumentSearch<'a> {
    pub pattern: &'a NavigateToPattern,
    pub matcher: &'a dyn PatternMatcher,
    pub kinds: &'a KindFilter,
    pub cancel: &'a CancellationToken,
}

impl DocumentSearch<'_> {
    /// Search `index` and push each hit to `sink`; returns the number of hits
    ///
    /// `linked` holds the indices of this same file in other projects. For each
    /// hit whose declaration also appears there, that project is recorded on the
    /// item instead of producing a second item. Linked merging is only valid for
    /// live indices, so callers pass an empty slice when `is_stale`.
    pub fn search(
        &self,
        index: &DocumentIndex,
        document: &DocumentKey,
        is_stale: bool,
        linked: &[LinkedIndex],
        sink: &mut dyn FnMut(SearchItem),
    ) -> Result<usize> {
        let mut found = 0;

        for info in index.declarations() {
            if self.cancel.is_cancelled() {
                return Err(NavigateToError::Cancelled);
            }

            let Some(item_kind) = self.kinds.accepts(info.kind) else {
                continue;
            };

            let Some(outcome) = self.pattern.match_declaration(
                self.matcher,
                info.search_name(),
                &info.fully_qualified_container_name,
            ) else {
                continue;
            };

            let mut item = SearchItem {
                is_stale,
                document: document.clone(),
                additional_matching_projects: Vec::new(),
                declared_symbol_info: info.clone(),
                kind: item_kind,
                match_kind: outcome.kind,
                is_case_sensitive: outcome.is_case_sensitive,
                name_match_spans: outcome.matched_spans,
            };

            if !is_stale {
                for linked_index in linked {
                    if linked_index.index.contains(info) {
                        item.add_matching_project(linked_index.project_id);
                    }
                }
            }

            trace!(
                "match {} ({:?}) in {}",
                info.name,
                item.match_kind,
                document.file_path
            );
            found += 1;
            sink(item);
        }

        Ok(found)
    }
}
