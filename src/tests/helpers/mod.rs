// Shared test doubles and fixture builders
//
// - TestIndexBuilder: scripted index builder (delays, failures, panics, call counts)
// - RecordingCallback: captures everything the engine reports, in order
// - SolutionFixture: small multi-project workspaces

use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::NavigateToOptions;
use crate::materialize::NavigateToSearchResult;
use crate::search::{IndexBuilder, LoadStatus, NavigateToEngine, NavigateToSearchCallback};
use crate::symbols::{DeclaredSymbolInfo, DeclaredSymbolKind, DocumentIndex, TextSpan};
use crate::workspace::{DocumentId, DocumentKey, Project, ProjectId, Solution};

pub fn decl(name: &str, kind: DeclaredSymbolKind, start: u32) -> DeclaredSymbolInfo {
    DeclaredSymbolInfo::new(name, kind, TextSpan::new(start, name.len() as u32))
}

pub fn class(name: &str, start: u32) -> DeclaredSymbolInfo {
    decl(name, DeclaredSymbolKind::Class, start)
}

pub fn key_for(solution: &Solution, document_id: DocumentId) -> DocumentKey {
    solution
        .document(document_id)
        .map(|doc| doc.key())
        .expect("document should exist in fixture solution")
}

#[derive(Default)]
pub struct TestIndexBuilder {
    indices: HashMap<DocumentId, DocumentIndex>,
    delay: Duration,
    delays: HashMap<DocumentId, Duration>,
    failing: HashSet<DocumentId>,
    panicking: HashSet<DocumentId>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    calls_per_document: Mutex<HashMap<DocumentId, usize>>,
}

impl TestIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, document_id: DocumentId, declarations: Vec<DeclaredSymbolInfo>) -> Self {
        self.indices.insert(document_id, DocumentIndex::new(declarations));
        self
    }

    /// Delay applied to every build without a document-specific delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_document_delay(mut self, document_id: DocumentId, delay: Duration) -> Self {
        self.delays.insert(document_id, delay);
        self
    }

    pub fn failing(mut self, document_id: DocumentId) -> Self {
        self.failing.insert(document_id);
        self
    }

    pub fn panicking(mut self, document_id: DocumentId) -> Self {
        self.panicking.insert(document_id);
        self
    }

    /// The first `count` builds fail, whatever the document
    pub fn fail_first(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, document_id: DocumentId) -> usize {
        self.calls_per_document
            .lock()
            .map(|calls| calls.get(&document_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl IndexBuilder for TestIndexBuilder {
    async fn build_index(&self, key: &DocumentKey, cancel: &CancellationToken) -> Result<DocumentIndex> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls_per_document.lock() {
            *calls.entry(key.document_id).or_default() += 1;
        }

        let delay = self.delays.get(&key.document_id).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => bail!("build of {} cancelled", key.file_path),
            }
        }

        if self.panicking.contains(&key.document_id) {
            panic!("index builder exploded on {}", key.file_path);
        }
        if self.failing.contains(&key.document_id) {
            bail!("cannot parse {}", key.file_path);
        }
        let scripted_failure = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if scripted_failure {
            bail!("transient failure building {}", key.file_path);
        }

        Ok(self.indices.get(&key.document_id).cloned().unwrap_or_default())
    }
}

/// Everything the engine told us, in arrival order
#[derive(Default)]
pub struct RecordingCallback {
    results: Mutex<Vec<NavigateToSearchResult>>,
    events: Mutex<Vec<String>>,
    started: Mutex<Vec<usize>>,
    completed: AtomicUsize,
    done: Mutex<Vec<bool>>,
}

impl RecordingCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn results(&self) -> Vec<NavigateToSearchResult> {
        self.results.lock().unwrap().clone()
    }

    /// Display names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.results().into_iter().map(|r| r.display_name).collect();
        names.sort();
        names
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn started_calls(&self) -> Vec<usize> {
        self.started.lock().unwrap().clone()
    }

    pub fn completed_projects(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn done_calls(&self) -> Vec<bool> {
        self.done.lock().unwrap().clone()
    }
}

#[async_trait]
impl NavigateToSearchCallback for RecordingCallback {
    async fn on_search_started(&self, total_projects: usize) {
        self.started.lock().unwrap().push(total_projects);
    }

    async fn on_item_found(&self, result: NavigateToSearchResult) {
        self.events
            .lock()
            .unwrap()
            .push(format!("item:{}", result.display_name));
        self.results.lock().unwrap().push(result);
    }

    async fn on_project_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push("project".to_string());
    }

    async fn done(&self, is_fully_loaded: bool) {
        self.events.lock().unwrap().push(format!("done:{}", is_fully_loaded));
        self.done.lock().unwrap().push(is_fully_loaded);
    }
}

/// Builds a solution and remembers document ids by path
#[derive(Default)]
pub struct SolutionFixture {
    projects: Vec<Project>,
    documents: HashMap<(String, String), DocumentId>,
    declarations: Vec<(DocumentId, Vec<DeclaredSymbolInfo>)>,
}

impl SolutionFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, name: &str) -> Self {
        self.projects.push(Project::new(name));
        self
    }

    /// Add a document to the most recently added project
    pub fn document(self, path: &str, declarations: Vec<DeclaredSymbolInfo>) -> Self {
        self.push_document(path, declarations, false)
    }

    pub fn generated(self, path: &str, declarations: Vec<DeclaredSymbolInfo>) -> Self {
        self.push_document(path, declarations, true)
    }

    fn push_document(mut self, path: &str, declarations: Vec<DeclaredSymbolInfo>, generated: bool) -> Self {
        let project = self.projects.last_mut().expect("add a project first");
        let id = if generated {
            project.add_generated_document(path)
        } else {
            project.add_document(path)
        };
        self.documents.insert((project.name.clone(), path.to_string()), id);
        self.declarations.push((id, declarations));
        self
    }

    pub fn build(self) -> Fixture {
        let project_ids = self.projects.iter().map(|p| (p.name.clone(), p.id)).collect();
        let mut builder = TestIndexBuilder::new();
        for (id, declarations) in self.declarations {
            builder = builder.with_index(id, declarations);
        }
        Fixture {
            solution: Arc::new(Solution::new(self.projects)),
            documents: self.documents,
            project_ids,
            builder,
        }
    }
}

pub struct Fixture {
    pub solution: Arc<Solution>,
    documents: HashMap<(String, String), DocumentId>,
    project_ids: HashMap<String, ProjectId>,
    /// Scripted builder pre-loaded with the fixture's declarations
    pub builder: TestIndexBuilder,
}

impl Fixture {
    pub fn doc(&self, project: &str, path: &str) -> DocumentId {
        self.documents[&(project.to_string(), path.to_string())]
    }

    pub fn project_id(&self, project: &str) -> ProjectId {
        self.project_ids[project]
    }

    /// Move the builder out, leaving an empty one behind
    pub fn take_builder(&mut self) -> TestIndexBuilder {
        std::mem::take(&mut self.builder)
    }
}

/// Engine over `builder` with a fixed load status
pub fn engine(builder: Arc<TestIndexBuilder>, fully_loaded: bool) -> NavigateToEngine {
    let options = NavigateToOptions {
        max_concurrent_projects: 4,
        ..NavigateToOptions::default()
    };
    NavigateToEngine::new(builder, Arc::new(LoadStatus::new(fully_loaded)), options)
}
