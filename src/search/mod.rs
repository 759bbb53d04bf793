// src/search/mod.rs
//! Navigate-to search engine
//!
//! `NavigateToEngine` is the public surface. It owns the long-lived services
//! (index builder, status oracle, matcher, cache, optional remote host) and
//! exposes searches at four scopes:
//! - one document (`search_document`)
//! - one project with priority hints (`search_project`)
//! - cache-only and generated-only variants used while the workspace loads
//! - the whole solution, priority-scheduled and deduplicated (`search`)
//!
//! Every call picks its transport once: local unless a remote host is attached.

pub mod callback;
pub mod dedup;
pub mod document_search;
pub mod error;
pub mod host;
pub mod item;
pub mod orchestrator;
pub mod priority;
pub mod project_search;

pub use callback::{ChannelCallback, ItemSink, NavigateToSearchCallback, SearchEvent};
pub use error::{NavigateToError, Result};
pub use host::{IndexBuilder, LoadStatus, StatusOracle};
pub use item::{DedupKey, SearchItem};
pub use orchestrator::{SearchOrchestrator, SearchState};
pub use priority::{PriorityPartition, PriorityTier, ProjectUnit, SearchScope};
pub use project_search::DocumentSource;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::IndexCache;
use crate::config::NavigateToOptions;
use crate::pattern::{NavigateToPattern, PatternMatcher};
use crate::remote::{LocalTransport, RemoteHost, RemoteTransport, SearchRequest, SearchTransport};
use crate::symbols::KindFilter;
use crate::workspace::{DocumentId, ProjectId, Solution};

pub struct NavigateToEngine {
    builder: Arc<dyn IndexBuilder>,
    status: Arc<dyn StatusOracle>,
    matcher: Arc<dyn PatternMatcher>,
    cache: Arc<IndexCache>,
    options: NavigateToOptions,
    remote: Option<Arc<dyn RemoteHost>>,
}

impl NavigateToEngine {
    pub fn new(builder: Arc<dyn IndexBuilder>, status: Arc<dyn StatusOracle>, options: NavigateToOptions) -> Self {
        Self {
            matcher: Arc::new(options.matcher()),
            cache: Arc::new(IndexCache::new(builder.clone())),
            builder,
            status,
            options,
            remote: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn PatternMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Share an existing cache (for example one owned by the workspace session)
    pub fn with_cache(mut self, cache: Arc<IndexCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Route every search through `host` instead of searching in-process
    pub fn with_remote_host(mut self, host: Arc<dyn RemoteHost>) -> Self {
        self.remote = Some(host);
        self
    }

    pub fn cache(&self) -> &Arc<IndexCache> {
        &self.cache
    }

    pub fn options(&self) -> &NavigateToOptions {
        &self.options
    }

    fn transport(&self, solution: &Arc<Solution>) -> Arc<dyn SearchTransport> {
        match &self.remote {
            Some(host) => Arc::new(RemoteTransport::new(host.clone())),
            None => Arc::new(LocalTransport::new(
                solution.clone(),
                self.builder.clone(),
                self.matcher.clone(),
                self.cache.clone(),
            )),
        }
    }

    /// Search a single document against its live index
    pub async fn search_document(
        &self,
        solution: &Arc<Solution>,
        document_id: DocumentId,
        pattern: &str,
        kinds: &KindFilter,
        on_item: &dyn ItemSink,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pattern = validate(pattern, kinds)?;
        let document = solution
            .document(document_id)
            .ok_or_else(|| NavigateToError::InvalidArgument(format!("unknown document {}", document_id)))?;

        let request = SearchRequest::document(
            pattern.raw(),
            kinds,
            document.project_id,
            document.id,
            DocumentSource::Live {
                include_generated: false,
            },
        );
        run_absorbing(self.transport(solution).as_ref(), &request, on_item, cancel).await
    }

    /// Search one project's documents live, `priority_documents` first
    #[allow(clippy::too_many_arguments)]
    pub async fn search_project(
        &self,
        solution: &Arc<Solution>,
        project_id: ProjectId,
        priority_documents: &[DocumentId],
        pattern: &str,
        kinds: &KindFilter,
        on_item: &dyn ItemSink,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pattern = validate(pattern, kinds)?;
        check_projects(solution, &[project_id])?;

        let request = SearchRequest::project(
            pattern.raw(),
            kinds,
            project_id,
            priority_documents.to_vec(),
            DocumentSource::Live {
                include_generated: false,
            },
        );
        run_absorbing(self.transport(solution).as_ref(), &request, on_item, cancel).await
    }

    /// Search `projects` using only cached (possibly stale) indices
    ///
    /// Items are not deduplicated across projects at this level.
    #[allow(clippy::too_many_arguments)]
    pub async fn search_cached_documents(
        &self,
        solution: &Arc<Solution>,
        projects: &[ProjectId],
        priority_documents: &[DocumentId],
        pattern: &str,
        kinds: &KindFilter,
        on_item: &dyn ItemSink,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pattern = validate(pattern, kinds)?;
        check_projects(solution, projects)?;

        let transport = self.transport(solution);
        for project_id in projects {
            if cancel.is_cancelled() {
                break;
            }
            let request = SearchRequest::project(
                pattern.raw(),
                kinds,
                *project_id,
                priority_documents.to_vec(),
                DocumentSource::Cached,
            );
            run_absorbing(transport.as_ref(), &request, on_item, cancel).await?;
        }
        Ok(())
    }

    /// Search only the source-generated documents of `projects`
    pub async fn search_generated_documents(
        &self,
        solution: &Arc<Solution>,
        projects: &[ProjectId],
        pattern: &str,
        kinds: &KindFilter,
        on_item: &dyn ItemSink,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pattern = validate(pattern, kinds)?;
        check_projects(solution, projects)?;

        let transport = self.transport(solution);
        for project_id in projects {
            if cancel.is_cancelled() {
                break;
            }
            let request =
                SearchRequest::project(pattern.raw(), kinds, *project_id, Vec::new(), DocumentSource::GeneratedOnly);
            run_absorbing(transport.as_ref(), &request, on_item, cancel).await?;
        }
        Ok(())
    }

    /// Priority-scheduled, deduplicated search of the whole solution
    ///
    /// Returns `InvalidArgument` for a blank pattern or an empty kind set, before
    /// any callback fires. Otherwise `callback.done` fires exactly once.
    pub async fn search(
        &self,
        solution: Arc<Solution>,
        pattern: &str,
        kinds: &KindFilter,
        scope: &SearchScope,
        callback: Arc<dyn NavigateToSearchCallback>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pattern = validate(pattern, kinds)?;
        let orchestrator = self.orchestrator(solution);
        orchestrator.run(&pattern, kinds, scope, callback, cancel).await
    }

    /// `search` delivered as a stream of events
    ///
    /// Arguments are validated before this returns; the search itself runs on a
    /// background task and the stream ends after `SearchEvent::Done`.
    pub fn search_stream(
        &self,
        solution: Arc<Solution>,
        pattern: &str,
        kinds: &KindFilter,
        scope: SearchScope,
        cancel: CancellationToken,
    ) -> Result<mpsc::UnboundedReceiver<SearchEvent>> {
        let pattern = validate(pattern, kinds)?;
        let orchestrator = self.orchestrator(solution);
        let (callback, events) = ChannelCallback::new();
        let callback: Arc<dyn NavigateToSearchCallback> = Arc::new(callback);
        let kinds = kinds.clone();

        tokio::spawn(async move {
            if let Err(err) = orchestrator.run(&pattern, &kinds, &scope, callback, &cancel).await {
                warn!("⚠️  Streaming search for '{}' failed: {}", pattern.raw(), err);
            }
        });

        Ok(events)
    }

    /// A fresh orchestrator for one operation against `solution`
    pub fn orchestrator(&self, solution: Arc<Solution>) -> SearchOrchestrator {
        let transport = self.transport(&solution);
        SearchOrchestrator::new(
            solution,
            transport,
            self.status.clone(),
            self.cache.clone(),
            self.options.clone(),
        )
    }
}

/// Reject caller misuse: blank pattern or nothing to look for
fn validate(pattern: &str, kinds: &KindFilter) -> Result<NavigateToPattern> {
    if kinds.is_empty() {
        return Err(NavigateToError::InvalidArgument(
            "at least one symbol kind must be requested".to_string(),
        ));
    }
    NavigateToPattern::compile(pattern)
}

fn check_projects(solution: &Solution, projects: &[ProjectId]) -> Result<()> {
    match projects.iter().find(|id| solution.project(**id).is_none()) {
        Some(missing) => Err(NavigateToError::InvalidArgument(format!("unknown project {}", missing))),
        None => Ok(()),
    }
}

/// Run one request; only caller errors escape
async fn run_absorbing(
    transport: &dyn SearchTransport,
    request: &SearchRequest,
    on_item: &dyn ItemSink,
    cancel: &CancellationToken,
) -> Result<()> {
    match transport.search(request, cancel, on_item).await {
        Ok(count) => {
            debug!("'{}' produced {} items", request.pattern, count);
            Ok(())
        }
        Err(err) if err.is_cancellation() => Ok(()),
        Err(err @ NavigateToError::InvalidArgument(_)) => Err(err),
        Err(err) => {
            warn!("⚠️  Search for '{}' failed: {}", request.pattern, err);
            Ok(())
        }
    }
}
