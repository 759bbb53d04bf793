// src/pattern/mod.rs
//! Navigate-to pattern compilation and match classification
//!
//! A raw pattern like `Sys.Con` or `foo bar` is compiled once per search into
//! container segments and name words. Each word is handed to a `PatternMatcher`;
//! the per-segment outcomes are then folded into one reported `PatternMatch`.
//!
//! Folding rule:
//! - dotted pattern: report the last (rightmost) segment's outcome
//! - otherwise: report the strongest outcome among all words

pub mod camel_case;

pub use camel_case::CamelCasePatternMatcher;

use serde::{Deserialize, Serialize};

use crate::search::error::{NavigateToError, Result};
use crate::symbols::TextSpan;

/// How well a candidate matched, strongest first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PatternMatchKind {
    Exact,
    Prefix,
    Substring,
    CamelCaseExact,
    CamelCasePrefix,
    CamelCaseNonContiguousPrefix,
    CamelCaseSubstring,
    CamelCaseNonContiguousSubstring,
    Fuzzy,
}

impl PatternMatchKind {
    pub fn is_stronger_than(self, other: PatternMatchKind) -> bool {
        self < other
    }
}

/// Outcome of matching one pattern segment against one candidate string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternMatch {
    pub kind: PatternMatchKind,
    pub is_case_sensitive: bool,
    /// Character spans of the candidate that matched
    pub matched_spans: Vec<TextSpan>,
}

impl PatternMatch {
    pub fn new(kind: PatternMatchKind, is_case_sensitive: bool, matched_spans: Vec<TextSpan>) -> Self {
        Self {
            kind,
            is_case_sensitive,
            matched_spans,
        }
    }
}

/// Fuzzy string matching collaborator
pub trait PatternMatcher: Send + Sync {
    /// Match one pattern word (no dots, no spaces) against `candidate`
    fn match_word(&self, candidate: &str, word: &str) -> Option<PatternMatch>;

    /// Match dotted container segments against a fully-qualified container name
    ///
    /// Segments are aligned with the trailing segments of `qualified_name`, so
    /// `Coll.Gen` matches `System.Collections.Generic`. Outcomes are returned
    /// left to right.
    fn match_container(&self, qualified_name: &str, segments: &[String]) -> Option<Vec<PatternMatch>> {
        let candidate_segments: Vec<&str> = qualified_name
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.len() > candidate_segments.len() {
            return None;
        }

        let offset = candidate_segments.len() - segments.len();
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| self.match_word(candidate_segments[offset + i], segment))
            .collect()
    }
}

/// Shape of the raw pattern, which decides how outcomes are folded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternShape {
    Simple,
    Dotted,
    Spaced,
}

/// A raw navigate-to pattern split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateToPattern {
    raw: String,
    name_words: Vec<String>,
    container_segments: Vec<String>,
    shape: PatternShape,
}

impl NavigateToPattern {
    /// Compile `raw`; blank patterns are a caller error
    pub fn compile(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('.');
        if trimmed.is_empty() {
            return Err(NavigateToError::InvalidArgument(
                "search pattern must not be empty".to_string(),
            ));
        }

        let (container_part, name_part) = match trimmed.rfind('.') {
            Some(dot) => (&trimmed[..dot], &trimmed[dot + 1..]),
            None => ("", trimmed),
        };

        let name_words: Vec<String> = name_part.split_whitespace().map(str::to_string).collect();
        if name_words.is_empty() {
            return Err(NavigateToError::InvalidArgument(format!(
                "search pattern '{}' has no name to match",
                raw
            )));
        }

        let container_segments: Vec<String> = container_part
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        let shape = if !container_segments.is_empty() {
            PatternShape::Dotted
        } else if name_words.len() > 1 {
            PatternShape::Spaced
        } else {
            PatternShape::Simple
        };

        Ok(Self {
            raw: raw.to_string(),
            name_words,
            container_segments,
            shape,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn shape(&self) -> PatternShape {
        self.shape
    }

    pub fn name_words(&self) -> &[String] {
        &self.name_words
    }

    /// Present only when the raw pattern contained a dot
    pub fn container_segments(&self) -> Option<&[String]> {
        if self.container_segments.is_empty() {
            None
        } else {
            Some(&self.container_segments)
        }
    }

    /// Match a declaration's search name and container
    ///
    /// Every name word must match the name, and every container segment must
    /// match the container. Returns the folded outcome; matched spans always
    /// refer to the name.
    pub fn match_declaration(
        &self,
        matcher: &dyn PatternMatcher,
        name: &str,
        fully_qualified_container: &str,
    ) -> Option<PatternMatch> {
        let mut outcomes = Vec::with_capacity(self.container_segments.len() + self.name_words.len());

        if let Some(segments) = self.container_segments() {
            outcomes.extend(matcher.match_container(fully_qualified_container, segments)?);
        }

        let mut name_spans = Vec::new();
        for word in &self.name_words {
            let outcome = matcher.match_word(name, word)?;
            name_spans.extend(outcome.matched_spans.iter().copied());
            outcomes.push(outcome);
        }

        let reported = fold_outcomes(self.shape, &outcomes)?;
        name_spans.sort();
        name_spans.dedup();

        Some(PatternMatch {
            kind: reported.kind,
            is_case_sensitive: reported.is_case_sensitive,
            matched_spans: name_spans,
        })
    }
}

/// Pick the reported outcome from the ordered per-segment outcomes
pub fn fold_outcomes(shape: PatternShape, outcomes: &[PatternMatch]) -> Option<&PatternMatch> {
    match shape {
        // `Microsoft.CodeAnalysis.ISym` reports the `ISym` outcome, never `Microsoft`'s Exact
        PatternShape::Dotted => outcomes.last(),
        PatternShape::Simple | PatternShape::Spaced => outcomes.iter().min_by_key(|outcome| outcome.kind),
    }
}
