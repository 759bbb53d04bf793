//! Engine options
//!
//! Options come from an optional TOML file; every field has a default, so a
//! missing file or a partial one is fine. `NAVTO_MAX_CONCURRENT_PROJECTS`
//! overrides the concurrency bound without editing the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::pattern::CamelCasePatternMatcher;
use crate::search::error::{NavigateToError, Result};

pub const MAX_CONCURRENT_PROJECTS_ENV: &str = "NAVTO_MAX_CONCURRENT_PROJECTS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavigateToOptions {
    /// Upper bound on project units searched at once (after the active project)
    pub max_concurrent_projects: usize,
    pub allow_fuzzy_matching: bool,
    /// Search source-generated documents once the workspace is fully loaded
    pub search_generated_documents: bool,
    /// Shortest pattern word that may match fuzzily
    pub fuzzy_min_pattern_length: usize,
}

impl Default for NavigateToOptions {
    fn default() -> Self {
        Self {
            max_concurrent_projects: num_cpus::get().max(1),
            allow_fuzzy_matching: true,
            search_generated_documents: true,
            fuzzy_min_pattern_length: 3,
        }
    }
}

impl NavigateToOptions {
    /// Load options from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let mut options = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
                .map_err(|err| NavigateToError::Config(format!("{}: {}", path.display(), err)))?
        } else {
            debug!("No options file at {}, using defaults", path.display());
            Self::default()
        };

        options.apply_env_overrides();
        info!(
            "🔧 Navigate-to options: {} concurrent projects, fuzzy={}",
            options.max_concurrent_projects, options.allow_fuzzy_matching
        );
        Ok(options)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut options: Self = toml::from_str(content)?;
        options.max_concurrent_projects = options.max_concurrent_projects.max(1);
        Ok(options)
    }

    pub fn apply_env_overrides(&mut self) {
        let Ok(value) = std::env::var(MAX_CONCURRENT_PROJECTS_ENV) else {
            return;
        };
        match value.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => self.max_concurrent_projects = limit,
            _ => warn!("⚠️  Ignoring {}={:?}: expected a positive integer", MAX_CONCURRENT_PROJECTS_ENV, value),
        }
    }

    /// The default matcher configured from these options
    pub fn matcher(&self) -> CamelCasePatternMatcher {
        CamelCasePatternMatcher::new()
            .with_fuzzy(self.allow_fuzzy_matching)
            .with_fuzzy_min_length(self.fuzzy_min_pattern_length)
    }
}
