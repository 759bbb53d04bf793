//! Progress callbacks and the channel stream adapter

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::item::SearchItem;
use crate::materialize::NavigateToSearchResult;

/// Receives raw, unmaterialized items from document and project searches
#[async_trait]
pub trait ItemSink: Send + Sync {
    async fn report(&self, item: SearchItem);
}

#[async_trait]
impl<F> ItemSink for F
where
    F: Fn(SearchItem) + Send + Sync,
{
    async fn report(&self, item: SearchItem) {
        self(item)
    }
}

/// Receives the results of one search as they are found
///
/// `on_item_found` may be invoked concurrently from several project units.
/// `done` is invoked exactly once per search, after every other call.
#[async_trait]
pub trait NavigateToSearchCallback: Send + Sync {
    /// Number of project units about to run; called once before any results
    async fn on_search_started(&self, _total_projects: usize) {}

    async fn on_item_found(&self, result: NavigateToSearchResult);

    /// One project unit finished (successfully, failed or cancelled)
    async fn on_project_completed(&self);

    /// `is_fully_loaded` false means results came from possibly-stale indices
    async fn done(&self, is_fully_loaded: bool);
}

/// Events delivered by `NavigateToEngine::search_stream`
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Started { total_projects: usize },
    ItemFound(Box<NavigateToSearchResult>),
    ProjectCompleted,
    Done { is_fully_loaded: bool },
}

/// Callback that forwards every notification into an unbounded channel
pub struct ChannelCallback {
    tx: mpsc::UnboundedSender<SearchEvent>,
}

impl ChannelCallback {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SearchEvent) {
        // Receiver dropped means nobody is listening anymore; keep searching quietly.
        let _ = self.tx.send(event);
    }
}

#[async_trait]
impl NavigateToSearchCallback for ChannelCallback {
    async fn on_search_started(&self, total_projects: usize) {
        self.send(SearchEvent::Started { total_projects });
    }

    async fn on_item_found(&self, result: NavigateToSearchResult) {
        self.send(SearchEvent::ItemFound(Box::new(result)));
    }

    async fn on_project_completed(&self) {
        self.send(SearchEvent::ProjectCompleted);
    }

    async fn done(&self, is_fully_loaded: bool) {
        self.send(SearchEvent::Done { is_fully_loaded });
    }
}
