//! In-process search transport

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{RequestScope, SearchRequest, SearchTransport};
use crate::cache::IndexCache;
use crate::pattern::{NavigateToPattern, PatternMatcher};
use crate::search::callback::ItemSink;
use crate::search::error::{NavigateToError, Result};
use crate::search::host::IndexBuilder;
use crate::search::project_search::{LiveIndices, ProjectSearch};
use crate::workspace::Solution;

/// Runs requests against a solution snapshot held by this process
///
/// Live indices built by one request are reused by later requests on the same
/// transport, so a transport should live for one search operation.
pub struct LocalTransport {
    solution: Arc<Solution>,
    builder: Arc<dyn IndexBuilder>,
    matcher: Arc<dyn PatternMatcher>,
    cache: Arc<IndexCache>,
    live: LiveIndices,
}

impl LocalTransport {
    pub fn new(
        solution: Arc<Solution>,
        builder: Arc<dyn IndexBuilder>,
        matcher: Arc<dyn PatternMatcher>,
        cache: Arc<IndexCache>,
    ) -> Self {
        Self {
            solution,
            builder,
            matcher,
            cache,
            live: LiveIndices::new(),
        }
    }

    /// Same snapshot and services, without the live indices of earlier requests
    pub fn fork(&self) -> Self {
        Self::new(
            self.solution.clone(),
            self.builder.clone(),
            self.matcher.clone(),
            self.cache.clone(),
        )
    }

    /// Live indices built so far by this transport
    pub fn live_index_count(&self) -> usize {
        self.live.len()
    }
}

#[async_trait]
impl SearchTransport for LocalTransport {
    async fn search(&self, request: &SearchRequest, cancel: &CancellationToken, sink: &dyn ItemSink) -> Result<usize> {
        let pattern = NavigateToPattern::compile(&request.pattern)?;
        let kinds = request.kind_filter();
        let search = ProjectSearch {
            solution: &self.solution,
            pattern: &pattern,
            matcher: self.matcher.as_ref(),
            kinds: &kinds,
            builder: self.builder.as_ref(),
            cache: &self.cache,
            live: &self.live,
            cancel,
        };

        match &request.scope {
            RequestScope::Project {
                project_id,
                priority_documents,
            } => {
                let project = self.solution.project(*project_id).ok_or_else(|| {
                    NavigateToError::InvalidArgument(format!("unknown project {}", project_id))
                })?;
                search
                    .search_project(project, priority_documents, request.source, sink)
                    .await
            }
            RequestScope::Document {
                project_id,
                document_id,
            } => {
                let document = self
                    .solution
                    .document(*document_id)
                    .filter(|doc| doc.project_id == *project_id)
                    .ok_or_else(|| NavigateToError::InvalidArgument(format!("unknown document {}", document_id)))?;
                if cancel.is_cancelled() {
                    return Err(NavigateToError::Cancelled);
                }
                let items = search.search_document(document, request.source).await?;
                let reported = items.len();
                for item in items {
                    sink.report(item).await;
                }
                Ok(reported)
            }
        }
    }
}
