// Navto - Incremental Symbol Navigation Engine
//!
//! Navto finds declarations by fuzzy name across a multi-project workspace,
//! streaming results as they are found. Results from cached indices arrive
//! while the workspace is still loading and are marked stale.

pub mod cache;
pub mod cli;
pub mod config;
pub mod materialize;
pub mod pattern;
pub mod remote;
pub mod search;
pub mod symbols;
pub mod workspace;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use cache::IndexCache;
pub use config::NavigateToOptions;
pub use materialize::{NavigateToSearchResult, ResultMaterializer};
pub use pattern::{CamelCasePatternMatcher, NavigateToPattern, PatternMatchKind, PatternMatcher};
pub use search::{
    NavigateToEngine, NavigateToError, NavigateToSearchCallback, SearchEvent, SearchItem, SearchScope,
};
pub use symbols::{DeclaredSymbolInfo, DeclaredSymbolKind, DocumentIndex, KindFilter, NavigateToItemKind};
pub use workspace::{DocumentKey, Solution};
