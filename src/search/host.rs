//! Collaborators the engine consumes but does not implement
//!
//! Declaration extraction and workspace load tracking live outside the engine;
//! these traits are the whole contract.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

use crate::symbols::DocumentIndex;
use crate::workspace::DocumentKey;

/// Builds or deserializes the declaration index of one document
///
/// Latency is opaque and the call may fail; implementations should honor `cancel`.
#[async_trait]
pub trait IndexBuilder: Send + Sync {
    async fn build_index(&self, key: &DocumentKey, cancel: &CancellationToken) -> Result<DocumentIndex>;
}

/// Reports whether the workspace has finished loading
///
/// While it has not, searches run against cached (possibly stale) indices.
#[async_trait]
pub trait StatusOracle: Send + Sync {
    async fn is_fully_loaded(&self, cancel: &CancellationToken) -> bool;
}

/// Status oracle backed by a flag, flipped by whoever tracks workspace load
#[derive(Debug, Default)]
pub struct LoadStatus {
    fully_loaded: AtomicBool,
}

impl LoadStatus {
    pub fn new(fully_loaded: bool) -> Self {
        Self {
            fully_loaded: AtomicBool::new(fully_loaded),
        }
    }

    pub fn set_fully_loaded(&self, fully_loaded: bool) {
        self.fully_loaded.store(fully_loaded, Ordering::SeqCst);
    }
}

#[async_trait]
impl StatusOracle for LoadStatus {
    async fn is_fully_loaded(&self, _cancel: &CancellationToken) -> bool {
        self.fully_loaded.load(Ordering::SeqCst)
    }
}
