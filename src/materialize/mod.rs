// src/materialize/mod.rs
//! Turn raw search items into displayable results
//!
//! Materialization happens against the caller's current `Solution` snapshot,
//! which may be newer than the index an item came from. Items whose document no
//! longer exists are dropped here rather than reported as errors.
//!
//! Secondary sort key, space-joined:
//! 1. folder distance from the active document (`X4` hex)
//! 2. parameter count (`X4`)
//! 3. type-parameter count (`X4`)
//! 4. declaration name
//! 5. file stem split on '.' (`Outer` sorts ahead of `Outer.Inner`)

pub mod glyph;

pub use glyph::{Glyph, GlyphAccess, GlyphFamily};

use serde::Serialize;
use std::sync::Arc;

use crate::pattern::PatternMatchKind;
use crate::search::item::SearchItem;
use crate::symbols::NavigateToItemKind;
use crate::workspace::{Document, DocumentId, Project, ProjectId, Solution};

/// A search item resolved against a solution snapshot, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct NavigateToSearchResult {
    pub item: SearchItem,
    /// Name plus suffix, e.g. `Dictionary<TKey, TValue>`
    pub display_name: String,
    pub kind: NavigateToItemKind,
    pub match_kind: PatternMatchKind,
    pub glyph: Option<Glyph>,
    pub secondary_sort: String,
    pub project_label: String,
    pub additional_information: String,
    pub project_id: ProjectId,
    pub document_id: DocumentId,
    pub file_path: Arc<str>,
}

impl NavigateToSearchResult {
    pub fn is_stale(&self) -> bool {
        self.item.is_stale
    }

    /// Display order: match kind first, then the secondary sort key
    pub fn display_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.match_kind
            .cmp(&other.match_kind)
            .then_with(|| self.secondary_sort.cmp(&other.secondary_sort))
    }
}

/// Stateless converter from `SearchItem` to `NavigateToSearchResult`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMaterializer;

impl ResultMaterializer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `item` in `solution`; `None` when its document is gone
    pub fn materialize(
        &self,
        item: &SearchItem,
        solution: &Solution,
        active_document: Option<DocumentId>,
    ) -> Option<NavigateToSearchResult> {
        let document = resolve_document(item, solution)?;
        let project = solution.project(document.project_id)?;
        let active = active_document.and_then(|id| solution.document(id));

        let info = &item.declared_symbol_info;
        let project_label = merged_project_label(project, &item.additional_matching_projects, solution);
        let additional_information = if info.container_display_name.is_empty() {
            project_label.clone()
        } else {
            format!("{} ({})", info.container_display_name, project_label)
        };

        Some(NavigateToSearchResult {
            item: item.clone(),
            display_name: format!("{}{}", info.name, info.name_suffix),
            kind: item.kind,
            match_kind: item.match_kind,
            glyph: Glyph::for_declaration(info.kind, info.accessibility),
            secondary_sort: secondary_sort_key(item, document, active),
            project_label,
            additional_information,
            project_id: document.project_id,
            document_id: document.id,
            file_path: document.file_path.clone(),
        })
    }
}

fn resolve_document<'s>(item: &SearchItem, solution: &'s Solution) -> Option<&'s Arc<Document>> {
    let key = &item.document;
    solution
        .document(key.document_id)
        .filter(|doc| doc.project_id == key.project_id)
        .or_else(|| solution.find_document(key.project_id, &key.file_path))
}

pub fn secondary_sort_key(item: &SearchItem, document: &Document, active: Option<&Arc<Document>>) -> String {
    let info = &item.declared_symbol_info;
    let mut parts = vec![
        format!("{:04X}", folder_distance(active.map(|doc| doc.as_ref()), document)),
        format!("{:04X}", info.parameter_count),
        format!("{:04X}", info.type_parameter_count),
        info.name.to_string(),
    ];
    parts.extend(document.file_stem().split('.').map(str::to_string));
    parts.join(" ")
}

/// How far apart two documents are in the folder tree
///
/// 0 when there is no active document or `result` is the active document;
/// otherwise the folders unique to each side plus one.
pub fn folder_distance(active: Option<&Document>, result: &Document) -> u32 {
    let Some(active) = active else {
        return 0;
    };
    if active.id == result.id {
        return 0;
    }

    let shared = active
        .folders
        .iter()
        .zip(&result.folders)
        .take_while(|(a, b)| a == b)
        .count();
    let unique_active = active.folders.len() - shared;
    let unique_result = result.folders.len() - shared;
    (unique_active + unique_result + 1) as u32
}

/// `Core (net48, net8.0)` for a file shared by flavors of one project
///
/// Falls back to the plain project name when the projects are unrelated.
pub fn merged_project_label(project: &Project, additional: &[ProjectId], solution: &Solution) -> String {
    if additional.is_empty() {
        return project.name.clone();
    }

    let (simple_name, Some(first_flavor)) = project.name_and_flavor() else {
        return project.name.clone();
    };

    let mut flavors = vec![first_flavor.to_string()];
    for id in additional {
        let Some(other) = solution.project(*id) else {
            continue;
        };
        match other.name_and_flavor() {
            (other_name, Some(flavor)) if other_name == simple_name => flavors.push(flavor.to_string()),
            _ => return project.name.clone(),
        }
    }

    flavors.sort();
    flavors.dedup();
    format!("{} ({})", simple_name, flavors.join(", "))
}
