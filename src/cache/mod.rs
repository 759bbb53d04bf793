// src/cache/mod.rs
//! Single-flight index cache
//!
//! Maps a `DocumentKey` to its declaration index while the workspace is still
//! loading. Concurrent requests for one key share a single in-flight build; the
//! whole cache is dropped at once when the workspace reports fully loaded.
//!
//! The cache has no notion of staleness: callers decide whether a cached index
//! is good enough for what they are doing.

pub mod string_table;

pub use string_table::StringTable;

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::search::error::{NavigateToError, Result};
use crate::search::host::IndexBuilder;
use crate::symbols::DocumentIndex;
use crate::workspace::DocumentKey;

type BuildResult = std::result::Result<Arc<DocumentIndex>, NavigateToError>;
type SharedBuild = Shared<BoxFuture<'static, BuildResult>>;

enum CacheSlot {
    Ready(Arc<DocumentIndex>),
    Pending { attempt: u64, build: SharedBuild },
}

struct CacheState {
    /// Set by `invalidate`; lookups return `None` until `reopen`
    invalidated: bool,
    /// Bumped on every invalidate/reopen so late builds never land in a newer map
    generation: u64,
    next_attempt: u64,
    entries: HashMap<DocumentKey, CacheSlot>,
    strings: Arc<StringTable>,
}

/// Memoizing, single-flight cache of document indices
///
/// Constructed once per workspace session and shared through `Arc`; tests
/// create isolated instances.
pub struct IndexCache {
    builder: Arc<dyn IndexBuilder>,
    state: Mutex<CacheState>,
}

impl IndexCache {
    pub fn new(builder: Arc<dyn IndexBuilder>) -> Self {
        Self {
            builder,
            state: Mutex::new(CacheState {
                invalidated: false,
                generation: 0,
                next_attempt: 0,
                entries: HashMap::new(),
                strings: Arc::new(StringTable::new()),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        // Nothing panics while holding the lock, but never let poisoning wedge search.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the index for `key`, building it at most once across concurrent callers
    ///
    /// Returns `Ok(None)` once the cache has been invalidated. A failed build is
    /// reported to every caller that awaited that attempt and then forgotten, so
    /// the next call retries. `cancel` only stops this caller from waiting: the
    /// build itself belongs to no single caller and keeps going for the others.
    pub async fn get_or_compute_index(
        &self,
        key: &DocumentKey,
        cancel: &CancellationToken,
    ) -> Result<Option<Arc<DocumentIndex>>> {
        if cancel.is_cancelled() {
            return Err(NavigateToError::Cancelled);
        }

        let (generation, attempt, build) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            if state.invalidated {
                return Ok(None);
            }

            let in_flight = match state.entries.get(key) {
                Some(CacheSlot::Ready(index)) => return Ok(Some(index.clone())),
                Some(CacheSlot::Pending { attempt, build }) => Some((*attempt, build.clone())),
                None => None,
            };

            match in_flight {
                Some((attempt, build)) => (state.generation, attempt, build),
                None => {
                    let attempt = state.next_attempt;
                    state.next_attempt += 1;
                    let build = self.start_build(key, state.strings.clone());
                    state.entries.insert(
                        key.clone(),
                        CacheSlot::Pending {
                            attempt,
                            build: build.clone(),
                        },
                    );
                    debug!("🧱 Building cached index for {}", key.file_path);
                    (state.generation, attempt, build)
                }
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(NavigateToError::Cancelled),
            result = build => result,
        };
        self.settle(key, generation, attempt, &result);
        result.map(Some)
    }

    /// The build only makes progress while some caller awaits it; an
    /// abandoned build resumes when the next caller for the key arrives.
    fn start_build(&self, key: &DocumentKey, strings: Arc<StringTable>) -> SharedBuild {
        let builder = self.builder.clone();
        let key = key.clone();

        async move {
            match builder.build_index(&key, &CancellationToken::new()).await {
                Ok(index) => Ok(Arc::new(strings.intern_index(index))),
                Err(err) => Err(NavigateToError::IndexBuild {
                    path: key.file_path.to_string(),
                    message: format!("{:#}", err),
                }),
            }
        }
        .boxed()
        .shared()
    }

    /// Record the outcome of `attempt`, unless the cache moved on since it started
    fn settle(&self, key: &DocumentKey, generation: u64, attempt: u64, result: &BuildResult) {
        let mut guard = self.lock_state();
        let state = &mut *guard;
        if state.generation != generation {
            return;
        }

        let is_this_attempt = matches!(
            state.entries.get(key),
            Some(CacheSlot::Pending { attempt: pending, .. }) if *pending == attempt
        );
        if !is_this_attempt {
            return;
        }

        match result {
            Ok(index) => {
                state.entries.insert(key.clone(), CacheSlot::Ready(index.clone()));
            }
            Err(err) => {
                warn!("⚠️  Cached index build failed for {}: {}", key.file_path, err);
                state.entries.remove(key);
            }
        }
    }

    /// Drop every cached index and the string table in one step
    ///
    /// Builds already in flight still complete for the callers awaiting them,
    /// but their results are not stored.
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        if state.invalidated {
            return;
        }
        let dropped = state.entries.len();
        state.invalidated = true;
        state.generation += 1;
        state.entries = HashMap::new();
        state.strings = Arc::new(StringTable::new());
        info!("🧹 Index cache invalidated ({} entries dropped)", dropped);
    }

    /// Start caching again after an `invalidate`, with an empty map
    pub fn reopen(&self) {
        let mut state = self.lock_state();
        if !state.invalidated {
            return;
        }
        state.invalidated = false;
        state.generation += 1;
        debug!("Index cache reopened");
    }

    pub fn is_invalidated(&self) -> bool {
        self.lock_state().invalidated
    }

    /// Number of completed entries
    pub fn len(&self) -> usize {
        self.lock_state()
            .entries
            .values()
            .filter(|slot| matches!(slot, CacheSlot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn interned_string_count(&self) -> usize {
        let strings = self.lock_state().strings.clone();
        strings.len()
    }
}
