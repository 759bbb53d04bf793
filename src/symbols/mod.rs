// src/symbols/mod.rs
//! Declaration records and per-document indices
//!
//! A `DocumentIndex` is the flat, ordered list of named declarations found in one
//! document. Navigate-to never looks at source text directly: everything it
//! matches, ranks and reports comes from these records.

pub mod kinds;

pub use kinds::{DeclaredSymbolKind, KindFilter, NavigateToItemKind};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Half-open character range `[start, start + length)` within a document
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }
}

/// Declared accessibility of a symbol
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    ProtectedAndInternal,
    Protected,
    Internal,
    ProtectedOrInternal,
    Public,
}

/// A compact, serializable summary of one named declaration
///
/// Strings are `Arc<str>` so cached indices can share one allocation per
/// distinct name across every document (see `cache::StringTable`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DeclaredSymbolInfo {
    /// Simple name as written (`Foo`, `this` is never stored for indexers)
    pub name: Arc<str>,
    /// Display suffix such as `<T>` or `(int, string)`
    pub name_suffix: Arc<str>,
    /// Container as shown to users, e.g. `Outer.Inner`
    pub container_display_name: Arc<str>,
    /// Dot-separated fully-qualified container, e.g. `System.Collections`
    pub fully_qualified_container_name: Arc<str>,
    pub kind: DeclaredSymbolKind,
    pub accessibility: Accessibility,
    pub span: TextSpan,
    pub is_partial: bool,
    pub is_nested_type: bool,
    pub parameter_count: u32,
    pub type_parameter_count: u32,
}

impl DeclaredSymbolInfo {
    pub fn new(name: impl Into<Arc<str>>, kind: DeclaredSymbolKind, span: TextSpan) -> Self {
        Self {
            name: name.into(),
            name_suffix: Arc::from(""),
            container_display_name: Arc::from(""),
            fully_qualified_container_name: Arc::from(""),
            kind,
            accessibility: Accessibility::Public,
            span,
            is_partial: false,
            is_nested_type: false,
            parameter_count: 0,
            type_parameter_count: 0,
        }
    }

    /// Sets both the display and fully-qualified container to `container`
    pub fn with_container(mut self, container: impl Into<Arc<str>>) -> Self {
        let container = container.into();
        self.container_display_name = container.clone();
        self.fully_qualified_container_name = container;
        self
    }

    pub fn with_name_suffix(mut self, suffix: impl Into<Arc<str>>) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_parameters(mut self, parameter_count: u32, type_parameter_count: u32) -> Self {
        self.parameter_count = parameter_count;
        self.type_parameter_count = type_parameter_count;
        self
    }

    pub fn partial(mut self) -> Self {
        self.is_partial = true;
        self
    }

    pub fn nested(mut self) -> Self {
        self.is_nested_type = true;
        self
    }

    /// Name the pattern is matched against
    ///
    /// Indexers have no name of their own; users find them by typing `this`.
    pub fn search_name(&self) -> &str {
        if self.kind == DeclaredSymbolKind::Indexer {
            "this"
        } else {
            &self.name
        }
    }
}

/// Ordered declarations of exactly one document; never mutated after build
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentIndex {
    declarations: Vec<DeclaredSymbolInfo>,
}

impl DocumentIndex {
    pub fn new(declarations: Vec<DeclaredSymbolInfo>) -> Self {
        Self { declarations }
    }

    pub fn declarations(&self) -> &[DeclaredSymbolInfo] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Structural lookup used to merge linked-file results across projects
    pub fn contains(&self, info: &DeclaredSymbolInfo) -> bool {
        self.declarations.iter().any(|candidate| candidate == info)
    }

    pub(crate) fn into_declarations(self) -> Vec<DeclaredSymbolInfo> {
        self.declarations
    }
}
