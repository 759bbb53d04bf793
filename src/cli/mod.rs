//! CLI support for the navto binary
//!
//! Modules:
//! - output: result formatting (text, JSON, NDJSON)
//! - progress: project progress on stderr
//!
//! `CliCallback` ties both to the engine's callback contract.
pub mod output;
pub mod progress;

pub use output::{OutputFormat, OutputWriter};
pub use progress::ProgressReporter;

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::warn;

use crate::materialize::NavigateToSearchResult;
use crate::search::NavigateToSearchCallback;

pub struct CliCallback {
    pattern: String,
    writer: Mutex<Option<OutputWriter>>,
    progress: ProgressReporter,
    results: AtomicUsize,
    fully_loaded: AtomicBool,
}

impl CliCallback {
    pub fn new(pattern: &str, writer: OutputWriter, progress: ProgressReporter) -> Self {
        Self {
            pattern: pattern.to_string(),
            writer: Mutex::new(Some(writer)),
            progress,
            results: AtomicUsize::new(0),
            fully_loaded: AtomicBool::new(false),
        }
    }

    pub fn result_count(&self) -> usize {
        self.results.load(Ordering::Relaxed)
    }

    pub fn was_fully_loaded(&self) -> bool {
        self.fully_loaded.load(Ordering::Relaxed)
    }

    /// Flush buffered output; call after the search returns
    pub fn finish(&self) -> anyhow::Result<()> {
        let writer = self.writer.lock().ok().and_then(|mut slot| slot.take());
        match writer {
            Some(writer) => writer.finish(),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NavigateToSearchCallback for CliCallback {
    async fn on_search_started(&self, total_projects: usize) {
        self.progress.started(&self.pattern, total_projects);
    }

    async fn on_item_found(&self, result: NavigateToSearchResult) {
        self.results.fetch_add(1, Ordering::Relaxed);
        let Ok(mut slot) = self.writer.lock() else {
            return;
        };
        if let Some(writer) = slot.as_mut() {
            if let Err(err) = writer.write_result(result) {
                warn!("⚠️  Failed to write result: {}", err);
            }
        }
    }

    async fn on_project_completed(&self) {
        self.progress.project_completed();
    }

    async fn done(&self, is_fully_loaded: bool) {
        self.fully_loaded.store(is_fully_loaded, Ordering::Relaxed);
        self.progress.complete(self.result_count(), is_fully_loaded);
    }
}
