// src/search/orchestrator.rs
//! Priority-scheduled navigate-to over a whole solution
//!
//! One orchestrator runs one search operation:
//! 1. sample the load status once (fully loaded → drop the cache, search live)
//! 2. run the active document's project to completion
//! 3. dispatch every other project unit concurrently, bounded by a semaphore
//! 4. funnel every item through one shared dedup set, materialize, report
//!
//! `done` fires exactly once, including when the operation is cancelled or a
//! unit panics.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::callback::{ItemSink, NavigateToSearchCallback};
use super::dedup::SeenItems;
use super::error::{NavigateToError, Result};
use super::host::StatusOracle;
use super::item::SearchItem;
use super::priority::{PriorityPartition, ProjectUnit, SearchScope};
use super::project_search::DocumentSource;
use crate::cache::IndexCache;
use crate::config::NavigateToOptions;
use crate::materialize::ResultMaterializer;
use crate::pattern::NavigateToPattern;
use crate::remote::{SearchRequest, SearchTransport};
use crate::symbols::KindFilter;
use crate::workspace::{DocumentId, Solution};

/// Lifecycle of one search operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    NotStarted,
    RunningTier1,
    RunningTiers2And3,
    Cancelled,
    Done,
}

pub struct SearchOrchestrator {
    solution: Arc<Solution>,
    transport: Arc<dyn SearchTransport>,
    status: Arc<dyn StatusOracle>,
    cache: Arc<IndexCache>,
    options: NavigateToOptions,
    state: Mutex<SearchState>,
}

impl SearchOrchestrator {
    pub fn new(
        solution: Arc<Solution>,
        transport: Arc<dyn SearchTransport>,
        status: Arc<dyn StatusOracle>,
        cache: Arc<IndexCache>,
        options: NavigateToOptions,
    ) -> Self {
        Self {
            solution,
            transport,
            status,
            cache,
            options,
            state: Mutex::new(SearchState::NotStarted),
        }
    }

    pub fn state(&self) -> SearchState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(&self, next: SearchState) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Cancelled is sticky until Done
        if *state == SearchState::Cancelled && next != SearchState::Done {
            return;
        }
        debug!("Navigate-to state {:?} -> {:?}", *state, next);
        *state = next;
    }

    fn note_cancellation(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            self.transition(SearchState::Cancelled);
            true
        } else {
            false
        }
    }

    /// Run the search, streaming results to `callback`
    ///
    /// Only an empty kind set is rejected up front; every other failure is
    /// logged and absorbed.
    pub async fn run(
        &self,
        pattern: &NavigateToPattern,
        kinds: &KindFilter,
        scope: &SearchScope,
        callback: Arc<dyn NavigateToSearchCallback>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if kinds.is_empty() {
            return Err(NavigateToError::InvalidArgument(
                "at least one symbol kind must be requested".to_string(),
            ));
        }

        let started = Instant::now();
        let is_fully_loaded = self.status.is_fully_loaded(cancel).await;
        let source = if is_fully_loaded {
            self.cache.invalidate();
            DocumentSource::Live {
                include_generated: self.options.search_generated_documents,
            }
        } else {
            DocumentSource::Cached
        };

        let partition = PriorityPartition::compute(&self.solution, scope);
        callback.on_search_started(partition.total_units()).await;

        let runner = Arc::new(UnitRunner {
            transport: self.transport.clone(),
            reporter: Reporter {
                solution: self.solution.clone(),
                active_document: scope.active_document,
                kinds: kinds.clone(),
                seen: SeenItems::new(),
                materializer: ResultMaterializer::new(),
                callback: callback.clone(),
                delivered: AtomicUsize::new(0),
            },
            pattern: pattern.raw().to_string(),
            kinds: kinds.clone(),
            source,
            cancel: cancel.clone(),
        });

        self.transition(SearchState::RunningTier1);
        if let Some(unit) = &partition.active {
            if !self.note_cancellation(cancel) {
                runner.run_guarded(unit.clone()).await;
            }
        }

        if !self.note_cancellation(cancel) {
            self.transition(SearchState::RunningTiers2And3);
            self.run_background(&runner, &partition, cancel).await;
        }

        self.note_cancellation(cancel);
        self.transition(SearchState::Done);

        info!(
            "✅ Navigate-to '{}' finished: {} results from {} projects in {:.1}ms{}",
            pattern.raw(),
            runner.reporter.delivered.load(Ordering::Relaxed),
            partition.total_units(),
            started.elapsed().as_secs_f64() * 1000.0,
            if is_fully_loaded { "" } else { " (stale)" }
        );
        callback.done(is_fully_loaded).await;
        Ok(())
    }

    async fn run_background(&self, runner: &Arc<UnitRunner>, partition: &PriorityPartition, cancel: &CancellationToken) {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_projects.max(1)));
        let mut units = JoinSet::new();

        for unit in partition.background_units() {
            if cancel.is_cancelled() {
                break;
            }
            let runner = runner.clone();
            let semaphore = semaphore.clone();
            let unit = unit.clone();
            units.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if runner.cancel.is_cancelled() {
                    return;
                }
                runner.run_guarded(unit).await;
            });
        }

        while let Some(joined) = units.join_next().await {
            if let Err(err) = joined {
                warn!("⚠️  Project search task failed to join: {}", err);
            }
        }
    }
}

/// Shared state for every project unit of one operation
struct UnitRunner {
    transport: Arc<dyn SearchTransport>,
    reporter: Reporter,
    pattern: String,
    kinds: KindFilter,
    source: DocumentSource,
    cancel: CancellationToken,
}

impl UnitRunner {
    /// Run one unit and report its completion, whatever happens inside it
    async fn run_guarded(&self, unit: ProjectUnit) {
        let request = SearchRequest::project(
            &self.pattern,
            &self.kinds,
            unit.project_id,
            unit.priority_documents,
            self.source,
        );

        let outcome = AssertUnwindSafe(self.transport.search(&request, &self.cancel, &self.reporter))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(found)) => debug!("Project {} ({:?}) produced {} candidates", unit.project_id, unit.tier, found),
            Ok(Err(err)) if err.is_cancellation() => debug!("Project {} cancelled", unit.project_id),
            Ok(Err(err)) => warn!("⚠️  Project {} search failed: {}", unit.project_id, err),
            Err(_) => warn!("⚠️  Project {} search panicked", unit.project_id),
        }

        self.reporter.callback.on_project_completed().await;
    }
}

/// Dedup, filter and materialize items before they reach the callback
struct Reporter {
    solution: Arc<Solution>,
    active_document: Option<DocumentId>,
    kinds: KindFilter,
    seen: SeenItems,
    materializer: ResultMaterializer,
    callback: Arc<dyn NavigateToSearchCallback>,
    delivered: AtomicUsize,
}

#[async_trait]
impl ItemSink for Reporter {
    async fn report(&self, item: SearchItem) {
        // Remote transports return whatever the host sent; hold them to the request
        if !self.kinds.contains(item.kind) || item.declared_symbol_info.kind.item_kind() != Some(item.kind) {
            return;
        }

        // Only a resolvable item may claim its location
        let Some(result) = self
            .materializer
            .materialize(&item, &self.solution, self.active_document)
        else {
            debug!("Dropping item for vanished document {}", item.document.file_path);
            return;
        };
        if !self.seen.try_add(item.dedup_key()) {
            return;
        }

        self.delivered.fetch_add(1, Ordering::Relaxed);
        self.callback.on_item_found(result).await;
    }
}
