//! Priority partitioning of a solution into project units
//!
//! Priority only orders work; every project in the solution ends up in exactly
//! one unit, and every document of that project is searched.

use serde::{Deserialize, Serialize};

use crate::workspace::{DocumentId, ProjectId, Solution};

/// What the user is looking at when the search starts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchScope {
    pub active_document: Option<DocumentId>,
    #[serde(default)]
    pub visible_documents: Vec<DocumentId>,
}

impl SearchScope {
    pub fn new(active_document: Option<DocumentId>, visible_documents: Vec<DocumentId>) -> Self {
        Self {
            active_document,
            visible_documents,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityTier {
    /// Project of the active document; runs to completion before anything else
    ActiveProject,
    /// Projects with at least one visible document
    VisibleProjects,
    Remaining,
}

/// One project to search, with the documents to search first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUnit {
    pub project_id: ProjectId,
    pub priority_documents: Vec<DocumentId>,
    pub tier: PriorityTier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityPartition {
    pub active: Option<ProjectUnit>,
    pub visible: Vec<ProjectUnit>,
    pub remaining: Vec<ProjectUnit>,
}

impl PriorityPartition {
    /// Split `solution` into tiers for `scope`
    ///
    /// Ids in the scope that do not resolve in this snapshot are ignored.
    pub fn compute(solution: &Solution, scope: &SearchScope) -> Self {
        let active_document = scope.active_document.and_then(|id| solution.document(id));
        let active_project_id = active_document.map(|doc| doc.project_id);

        let mut partition = PriorityPartition::default();

        for project in solution.projects() {
            let visible_here: Vec<DocumentId> = scope
                .visible_documents
                .iter()
                .copied()
                .filter(|id| project.document(*id).is_some())
                .collect();

            if Some(project.id) == active_project_id {
                let mut priority_documents = Vec::with_capacity(visible_here.len() + 1);
                if let Some(active) = active_document {
                    priority_documents.push(active.id);
                }
                for id in visible_here {
                    if !priority_documents.contains(&id) {
                        priority_documents.push(id);
                    }
                }
                partition.active = Some(ProjectUnit {
                    project_id: project.id,
                    priority_documents,
                    tier: PriorityTier::ActiveProject,
                });
            } else if !visible_here.is_empty() {
                partition.visible.push(ProjectUnit {
                    project_id: project.id,
                    priority_documents: dedup_preserving_order(visible_here),
                    tier: PriorityTier::VisibleProjects,
                });
            } else {
                partition.remaining.push(ProjectUnit {
                    project_id: project.id,
                    priority_documents: Vec::new(),
                    tier: PriorityTier::Remaining,
                });
            }
        }

        partition
    }

    pub fn total_units(&self) -> usize {
        usize::from(self.active.is_some()) + self.visible.len() + self.remaining.len()
    }

    /// Units dispatched together after the active project finishes
    pub fn background_units(&self) -> impl Iterator<Item = &ProjectUnit> {
        self.visible.iter().chain(self.remaining.iter())
    }
}

fn dedup_preserving_order(ids: Vec<DocumentId>) -> Vec<DocumentId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
