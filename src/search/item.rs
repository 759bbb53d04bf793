//! Search result records as produced by document search
//!
//! `SearchItem` is a flat value: ids and plain data only, no handles into a
//! live solution. That keeps it serializable for the remote transport and lets
//! it be materialized later against whatever snapshot the caller holds.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::pattern::PatternMatchKind;
use crate::symbols::{DeclaredSymbolInfo, NavigateToItemKind, TextSpan};
use crate::workspace::{DocumentKey, ProjectId};

/// One declaration that matched the pattern
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    /// Found in a cached index that may not reflect the document's current text
    pub is_stale: bool,
    pub document: DocumentKey,
    /// Other projects that include this same file and declaration (linked files)
    #[serde(default)]
    pub additional_matching_projects: Vec<ProjectId>,
    pub declared_symbol_info: DeclaredSymbolInfo,
    pub kind: NavigateToItemKind,
    pub match_kind: PatternMatchKind,
    pub is_case_sensitive: bool,
    /// Spans within the declaration name that the pattern matched
    #[serde(default)]
    pub name_match_spans: Vec<TextSpan>,
}

impl SearchItem {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            file_path: self.document.file_path.clone(),
            span: self.declared_symbol_info.span,
        }
    }

    pub fn add_matching_project(&mut self, project_id: ProjectId) {
        if project_id != self.document.project_id && !self.additional_matching_projects.contains(&project_id) {
            self.additional_matching_projects.push(project_id);
        }
    }
}

/// Identity of a logical hit: the same declaration seen through different projects
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub file_path: Arc<str>,
    pub span: TextSpan,
}
