// src/pattern/camel_case.rs
//! Default word matcher: exact, prefix, word-start substring, camel humps, fuzzy
//!
//! Candidates are split into humps (`XMLHttpRequest` -> `XML`, `Http`, `Request`).
//! Pattern words containing capitals are split before each capital and each
//! piece must prefix a later hump; all-lowercase words may be split anywhere (`fobar`
//! matches `FooBar` as `fo` + `bar`).

use super::{PatternMatch, PatternMatchKind, PatternMatcher};
use crate::symbols::TextSpan;

/// Longest pattern word the hump search will try to split
const MAX_CAMEL_CASE_PATTERN: usize = 64;

#[derive(Debug, Clone)]
pub struct CamelCasePatternMatcher {
    allow_fuzzy: bool,
    fuzzy_min_length: usize,
}

impl Default for CamelCasePatternMatcher {
    fn default() -> Self {
        Self {
            allow_fuzzy: true,
            fuzzy_min_length: 3,
        }
    }
}

impl CamelCasePatternMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fuzzy(mut self, allow_fuzzy: bool) -> Self {
        self.allow_fuzzy = allow_fuzzy;
        self
    }

    pub fn with_fuzzy_min_length(mut self, min_length: usize) -> Self {
        self.fuzzy_min_length = min_length.max(1);
        self
    }

    fn camel_case_match(&self, candidate: &[char], word: &[char], humps: &[(usize, usize)]) -> Option<PatternMatch> {
        if word.len() > MAX_CAMEL_CASE_PATTERN || humps.is_empty() {
            return None;
        }

        // (hump index, start in candidate, length)
        let mut assignment = Vec::new();
        let found = if word.iter().any(|c| c.is_uppercase()) {
            let chunks = pattern_chunks(word);
            let mut dead_ends = DeadEnds::new(chunks.len(), humps.len());
            match_fixed_chunks(candidate, word, humps, &chunks, 0, 0, &mut assignment, &mut dead_ends)
        } else {
            let mut dead_ends = DeadEnds::new(word.len(), humps.len());
            match_flexible_chunks(candidate, word, humps, 0, 0, &mut assignment, &mut dead_ends)
        };
        if !found || assignment.is_empty() {
            return None;
        }

        let first_hump = assignment[0].0;
        let contiguous = assignment.windows(2).all(|pair| pair[1].0 == pair[0].0 + 1);
        let kind = match (first_hump == 0, contiguous) {
            (true, true) if assignment.len() == humps.len() => PatternMatchKind::CamelCaseExact,
            (true, true) => PatternMatchKind::CamelCasePrefix,
            (true, false) => PatternMatchKind::CamelCaseNonContiguousPrefix,
            (false, true) => PatternMatchKind::CamelCaseSubstring,
            (false, false) => PatternMatchKind::CamelCaseNonContiguousSubstring,
        };

        let mut word_offset = 0;
        let mut is_case_sensitive = true;
        let mut spans = Vec::with_capacity(assignment.len());
        for (_, start, length) in &assignment {
            if candidate[*start..*start + *length] != word[word_offset..word_offset + *length] {
                is_case_sensitive = false;
            }
            word_offset += *length;
            spans.push(TextSpan::new(*start as u32, *length as u32));
        }

        Some(PatternMatch::new(kind, is_case_sensitive, spans))
    }

    fn fuzzy_match(&self, candidate: &[char], word: &[char]) -> Option<PatternMatch> {
        if !self.allow_fuzzy || word.len() < self.fuzzy_min_length {
            return None;
        }

        let threshold = if word.len() <= 5 { 1 } else { 2 };
        if candidate.len().abs_diff(word.len()) > threshold {
            return None;
        }

        let candidate: Vec<char> = candidate.iter().map(|c| fold_case(*c)).collect();
        let word: Vec<char> = word.iter().map(|c| fold_case(*c)).collect();
        if edit_distance(&candidate, &word) <= threshold {
            Some(PatternMatch::new(PatternMatchKind::Fuzzy, false, Vec::new()))
        } else {
            None
        }
    }
}

impl PatternMatcher for CamelCasePatternMatcher {
    fn match_word(&self, candidate: &str, word: &str) -> Option<PatternMatch> {
        let candidate_chars: Vec<char> = candidate.chars().collect();
        let word_chars: Vec<char> = word.chars().collect();
        if candidate_chars.is_empty() || word_chars.is_empty() {
            return None;
        }

        let full_span = || vec![TextSpan::new(0, word_chars.len() as u32)];

        if candidate_chars.len() == word_chars.len() && eq_ignore_case(&candidate_chars, &word_chars) {
            return Some(PatternMatch::new(
                PatternMatchKind::Exact,
                candidate == word,
                full_span(),
            ));
        }

        if candidate_chars.len() > word_chars.len()
            && eq_ignore_case(&candidate_chars[..word_chars.len()], &word_chars)
        {
            return Some(PatternMatch::new(
                PatternMatchKind::Prefix,
                candidate_chars[..word_chars.len()] == word_chars[..],
                full_span(),
            ));
        }

        let humps = word_humps(&candidate_chars);
        for &(start, _) in &humps {
            let end = start + word_chars.len();
            if start == 0 || end > candidate_chars.len() {
                continue;
            }
            if eq_ignore_case(&candidate_chars[start..end], &word_chars) {
                return Some(PatternMatch::new(
                    PatternMatchKind::Substring,
                    candidate_chars[start..end] == word_chars[..],
                    vec![TextSpan::new(start as u32, word_chars.len() as u32)],
                ));
            }
        }

        self.camel_case_match(&candidate_chars, &word_chars, &humps)
            .or_else(|| self.fuzzy_match(&candidate_chars, &word_chars))
    }
}

/// Split an identifier into `(start, end)` hump ranges
///
/// Non-alphanumeric characters separate humps and belong to none.
pub fn word_humps(chars: &[char]) -> Vec<(usize, usize)> {
    let mut humps = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_alphanumeric() {
            i += 1;
            continue;
        }

        let start = i;
        i += 1;
        if chars[start].is_uppercase() {
            if i < chars.len() && chars[i].is_uppercase() {
                while i < chars.len() && chars[i].is_uppercase() {
                    i += 1;
                }
                // `XMLParser`: the last capital of the run starts the next hump
                if i < chars.len() && chars[i].is_lowercase() {
                    i -= 1;
                }
            } else {
                while i < chars.len() && chars[i].is_lowercase() {
                    i += 1;
                }
            }
        } else if chars[start].is_numeric() {
            while i < chars.len() && chars[i].is_numeric() {
                i += 1;
            }
        } else {
            while i < chars.len() && chars[i].is_lowercase() {
                i += 1;
            }
        }

        humps.push((start, i));
    }

    humps
}

/// Split a pattern word before every capital: `FB` -> `F`, `B`; `fooBar` -> `foo`, `Bar`
fn pattern_chunks(word: &[char]) -> Vec<(usize, usize)> {
    let mut chunks = Vec::new();
    let mut start = None;
    for (i, c) in word.iter().enumerate() {
        if !c.is_alphanumeric() {
            if let Some(s) = start.take() {
                chunks.push((s, i));
            }
            continue;
        }
        if c.is_uppercase() {
            if let Some(s) = start {
                chunks.push((s, i));
            }
            start = Some(i);
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        chunks.push((s, word.len()));
    }
    chunks
}

/// Search states already known to fail, keyed by (pattern position, first free hump)
///
/// Whether the rest of the word fits depends only on those two values, so each
/// state is explored at most once and the backtracking stays polynomial.
struct DeadEnds {
    width: usize,
    failed: Vec<bool>,
}

impl DeadEnds {
    fn new(positions: usize, humps: usize) -> Self {
        let width = humps + 1;
        Self {
            width,
            failed: vec![false; (positions + 1) * width],
        }
    }

    fn contains(&self, position: usize, first_hump: usize) -> bool {
        self.failed[position * self.width + first_hump]
    }

    fn insert(&mut self, position: usize, first_hump: usize) {
        self.failed[position * self.width + first_hump] = true;
    }
}

#[allow(clippy::too_many_arguments)]
fn match_fixed_chunks(
    candidate: &[char],
    word: &[char],
    humps: &[(usize, usize)],
    chunks: &[(usize, usize)],
    chunk_index: usize,
    first_hump: usize,
    assignment: &mut Vec<(usize, usize, usize)>,
    dead_ends: &mut DeadEnds,
) -> bool {
    let Some(&(chunk_start, chunk_end)) = chunks.get(chunk_index) else {
        return true;
    };
    if dead_ends.contains(chunk_index, first_hump) {
        return false;
    }
    let chunk = &word[chunk_start..chunk_end];

    for (hump_index, &(hump_start, hump_end)) in humps.iter().enumerate().skip(first_hump) {
        if chunk.len() > hump_end - hump_start {
            continue;
        }
        if !eq_ignore_case(&candidate[hump_start..hump_start + chunk.len()], chunk) {
            continue;
        }
        assignment.push((hump_index, hump_start, chunk.len()));
        if match_fixed_chunks(
            candidate,
            word,
            humps,
            chunks,
            chunk_index + 1,
            hump_index + 1,
            assignment,
            dead_ends,
        ) {
            return true;
        }
        assignment.pop();
    }

    dead_ends.insert(chunk_index, first_hump);
    false
}

fn match_flexible_chunks(
    candidate: &[char],
    word: &[char],
    humps: &[(usize, usize)],
    word_offset: usize,
    first_hump: usize,
    assignment: &mut Vec<(usize, usize, usize)>,
    dead_ends: &mut DeadEnds,
) -> bool {
    if word_offset == word.len() {
        return true;
    }
    if dead_ends.contains(word_offset, first_hump) {
        return false;
    }

    for (hump_index, &(hump_start, hump_end)) in humps.iter().enumerate().skip(first_hump) {
        let shared = candidate[hump_start..hump_end]
            .iter()
            .zip(&word[word_offset..])
            .take_while(|(a, b)| chars_eq_ignore_case(**a, **b))
            .count();

        for length in (1..=shared).rev() {
            assignment.push((hump_index, hump_start, length));
            if match_flexible_chunks(
                candidate,
                word,
                humps,
                word_offset + length,
                hump_index + 1,
                assignment,
                dead_ends,
            ) {
                return true;
            }
            assignment.pop();
        }
    }

    dead_ends.insert(word_offset, first_hump);
    false
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || fold_case(a) == fold_case(b)
}

fn eq_ignore_case(a: &[char], b: &[char]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| chars_eq_ignore_case(*x, *y))
}

/// Optimal string alignment distance (adjacent transpositions count once)
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let width = b.len() + 1;
    let mut before_previous = vec![0usize; width];
    let mut previous: Vec<usize> = (0..width).collect();
    let mut current = vec![0usize; width];

    for i in 1..=a.len() {
        current[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (previous[j] + 1).min(current[j - 1] + 1).min(previous[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(before_previous[j - 2] + 1);
            }
            current[j] = best;
        }
        std::mem::swap(&mut before_previous, &mut previous);
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humps_split_on_case_runs_and_separators() {
        let chars: Vec<char> = "XMLHttp_request2Go".chars().collect();
        let humps: Vec<String> = word_humps(&chars)
            .into_iter()
            .map(|(s, e)| chars[s..e].iter().collect())
            .collect();
        assert_eq!(humps, vec!["XML", "Http", "request", "2", "Go"]);
    }

    #[test]
    fn pattern_chunks_start_at_each_capital() {
        let chars: Vec<char> = "FBar_x".chars().collect();
        assert_eq!(pattern_chunks(&chars), vec![(0, 1), (1, 4), (5, 6)]);
    }

    #[test]
    fn edit_distance_counts_transposition_once() {
        let a: Vec<char> = "form".chars().collect();
        let b: Vec<char> = "from".chars().collect();
        assert_eq!(edit_distance(&a, &b), 1);
    }
}
