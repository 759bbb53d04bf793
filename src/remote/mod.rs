// src/remote/mod.rs
//! Transport strategy for running project searches
//!
//! The orchestrator schedules, dedups and materializes; a `SearchTransport`
//! only turns one `SearchRequest` into a stream of `SearchItem`s. The transport
//! is picked once per engine call:
//! - `LocalTransport`: searches in this process
//! - `RemoteTransport`: forwards to a `RemoteHost` and decodes JSON lines
//!
//! Everything that crosses the boundary is a flat serde value: ids, strings
//! and plain records, never handles into a live solution.

pub mod in_process;
pub mod local;

pub use in_process::InProcessRemoteHost;
pub use local::LocalTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::search::callback::ItemSink;
use crate::search::error::{NavigateToError, Result};
use crate::search::item::SearchItem;
use crate::search::project_search::DocumentSource;
use crate::symbols::{KindFilter, NavigateToItemKind};
use crate::workspace::{DocumentId, ProjectId};

/// What part of the solution a request covers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestScope {
    Document {
        project_id: ProjectId,
        document_id: DocumentId,
    },
    Project {
        project_id: ProjectId,
        #[serde(default)]
        priority_documents: Vec<DocumentId>,
    },
}

/// One unit of search work, as sent over the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub pattern: String,
    pub kinds: Vec<NavigateToItemKind>,
    pub scope: RequestScope,
    pub source: DocumentSource,
}

impl SearchRequest {
    pub fn project(
        pattern: &str,
        kinds: &KindFilter,
        project_id: ProjectId,
        priority_documents: Vec<DocumentId>,
        source: DocumentSource,
    ) -> Self {
        Self {
            pattern: pattern.to_string(),
            kinds: kinds.sorted(),
            scope: RequestScope::Project {
                project_id,
                priority_documents,
            },
            source,
        }
    }

    pub fn document(
        pattern: &str,
        kinds: &KindFilter,
        project_id: ProjectId,
        document_id: DocumentId,
        source: DocumentSource,
    ) -> Self {
        Self {
            pattern: pattern.to_string(),
            kinds: kinds.sorted(),
            scope: RequestScope::Document {
                project_id,
                document_id,
            },
            source,
        }
    }

    pub fn kind_filter(&self) -> KindFilter {
        self.kinds.iter().copied().collect()
    }
}

/// Runs one search request and reports its items
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Returns the number of items reported
    async fn search(&self, request: &SearchRequest, cancel: &CancellationToken, sink: &dyn ItemSink) -> Result<usize>;
}

/// An out-of-process search service
///
/// Items come back one JSON-encoded `SearchItem` per message; the channel
/// closing marks the end of the request.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    async fn search(&self, request: SearchRequest, cancel: CancellationToken) -> anyhow::Result<mpsc::Receiver<String>>;
}

/// Transport that forwards requests to a `RemoteHost`
pub struct RemoteTransport {
    host: Arc<dyn RemoteHost>,
}

impl RemoteTransport {
    pub fn new(host: Arc<dyn RemoteHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SearchTransport for RemoteTransport {
    async fn search(&self, request: &SearchRequest, cancel: &CancellationToken, sink: &dyn ItemSink) -> Result<usize> {
        let mut messages = self
            .host
            .search(request.clone(), cancel.clone())
            .await
            .map_err(|err| NavigateToError::Remote(format!("{:#}", err)))?;

        let mut reported = 0;
        loop {
            let message = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(NavigateToError::Cancelled),
                message = messages.recv() => message,
            };

            let Some(message) = message else {
                break;
            };

            match serde_json::from_str::<SearchItem>(&message) {
                Ok(item) => {
                    reported += 1;
                    sink.report(item).await;
                }
                Err(err) => warn!("⚠️  Dropping undecodable remote search item: {}", err),
            }
        }

        debug!("Remote search returned {} items for '{}'", reported, request.pattern);
        Ok(reported)
    }
}
