//! Loopback remote host
//!
//! Serves requests from its own solution snapshot on a background task and
//! speaks the same JSON-line protocol an out-of-process host would. Useful for
//! exercising the remote path without a second process.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{LocalTransport, RemoteHost, SearchRequest, SearchTransport};
use crate::search::callback::ItemSink;
use crate::search::item::SearchItem;

const CHANNEL_CAPACITY: usize = 256;

pub struct InProcessRemoteHost {
    transport: LocalTransport,
}

impl InProcessRemoteHost {
    pub fn new(transport: LocalTransport) -> Self {
        Self { transport }
    }
}

struct JsonLineSink {
    tx: mpsc::Sender<String>,
}

#[async_trait]
impl ItemSink for JsonLineSink {
    async fn report(&self, item: SearchItem) {
        match serde_json::to_string(&item) {
            Ok(line) => {
                // Closed channel: the caller stopped listening
                let _ = self.tx.send(line).await;
            }
            Err(err) => warn!("⚠️  Failed to encode search item: {}", err),
        }
    }
}

#[async_trait]
impl RemoteHost for InProcessRemoteHost {
    async fn search(&self, request: SearchRequest, cancel: CancellationToken) -> Result<mpsc::Receiver<String>> {
        // Round-trip the request so it is held to the same wire contract as a real host
        let wire = serde_json::to_string(&request).context("Failed to encode search request")?;
        let request: SearchRequest = serde_json::from_str(&wire).context("Failed to decode search request")?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        // A request has no operation identity, so its live indices stay private to it
        let transport = self.transport.fork();
        tokio::spawn(async move {
            let sink = JsonLineSink { tx };
            match transport.search(&request, &cancel, &sink).await {
                Ok(count) => debug!("Remote host served {} items for '{}'", count, request.pattern),
                Err(err) if err.is_cancellation() => debug!("Remote search for '{}' cancelled", request.pattern),
                Err(err) => warn!("⚠️  Remote search for '{}' failed: {}", request.pattern, err),
            }
        });

        Ok(rx)
    }
}
