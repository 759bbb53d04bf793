// Pattern compilation, word matching and outcome folding

use crate::pattern::{
    CamelCasePatternMatcher, NavigateToPattern, PatternMatch, PatternMatchKind, PatternMatcher, PatternShape,
    fold_outcomes,
};
use crate::search::NavigateToError;
use crate::symbols::TextSpan;

fn kind_of(candidate: &str, word: &str) -> Option<PatternMatchKind> {
    CamelCasePatternMatcher::new()
        .match_word(candidate, word)
        .map(|outcome| outcome.kind)
}

#[test]
fn exact_beats_prefix() {
    // Scenario: `Foo` is Exact, `FooBar` is Prefix for pattern `Foo`
    assert_eq!(kind_of("Foo", "Foo"), Some(PatternMatchKind::Exact));
    assert_eq!(kind_of("FooBar", "Foo"), Some(PatternMatchKind::Prefix));
    assert!(PatternMatchKind::Exact.is_stronger_than(PatternMatchKind::Prefix));
}

#[test]
fn many_humps_without_a_match_finish_quickly() {
    let candidate = "Aa".repeat(24);
    let lowercase = format!("{}b", "a".repeat(22));
    let capitals = format!("{}B", "A".repeat(22));

    let started = std::time::Instant::now();
    assert_eq!(kind_of(&candidate, &lowercase), None);
    assert_eq!(kind_of(&candidate, &capitals), None);
    assert!(
        started.elapsed() < std::time::Duration::from_secs(1),
        "took {:?}",
        started.elapsed()
    );

    // Still finds the assignment when one exists
    assert!(kind_of(&format!("{candidate}Bb"), &lowercase).is_some());
}

#[test]
fn matching_ignores_case_but_reports_it() {
    let matcher = CamelCasePatternMatcher::new();

    let exact = matcher.match_word("Foo", "Foo").unwrap();
    assert!(exact.is_case_sensitive);

    let folded = matcher.match_word("Foo", "foo").unwrap();
    assert_eq!(folded.kind, PatternMatchKind::Exact);
    assert!(!folded.is_case_sensitive);
}

#[test]
fn substring_only_at_word_starts() {
    assert_eq!(kind_of("FooBar", "Bar"), Some(PatternMatchKind::Substring));
    assert_eq!(kind_of("read_file", "file"), Some(PatternMatchKind::Substring));
    // `oBa` starts mid-hump; it is not a substring match
    assert_eq!(kind_of("FooBar", "oBa"), None);
}

#[test]
fn camel_case_variants() {
    assert_eq!(kind_of("FooBar", "FB"), Some(PatternMatchKind::CamelCaseExact));
    assert_eq!(kind_of("FooBarBaz", "FB"), Some(PatternMatchKind::CamelCasePrefix));
    assert_eq!(kind_of("FooBarBaz", "FBaz"), Some(PatternMatchKind::CamelCaseNonContiguousPrefix));
    assert_eq!(kind_of("FooBarBaz", "BB"), Some(PatternMatchKind::CamelCaseSubstring));
    assert_eq!(
        kind_of("FooBarQuxBaz", "BBa"),
        Some(PatternMatchKind::CamelCaseNonContiguousSubstring)
    );
}

#[test]
fn lowercase_words_split_anywhere_on_humps() {
    let outcome = CamelCasePatternMatcher::new().match_word("FooBar", "fobar").unwrap();
    assert_eq!(outcome.kind, PatternMatchKind::CamelCaseExact);
    assert!(!outcome.is_case_sensitive);
    assert_eq!(outcome.matched_spans, vec![TextSpan::new(0, 2), TextSpan::new(3, 3)]);
}

#[test]
fn fuzzy_is_last_resort_and_optional() {
    assert_eq!(kind_of("Console", "Consloe"), Some(PatternMatchKind::Fuzzy));

    let strict = CamelCasePatternMatcher::new().with_fuzzy(false);
    assert!(strict.match_word("Console", "Consloe").is_none());

    // Too short to match fuzzily
    assert_eq!(kind_of("Foo", "Fx"), None);
}

#[test]
fn compile_splits_container_and_name() {
    let pattern = NavigateToPattern::compile("System.Collections.List").unwrap();
    assert_eq!(pattern.shape(), PatternShape::Dotted);
    assert_eq!(pattern.name_words(), ["List".to_string()]);
    assert_eq!(
        pattern.container_segments().unwrap(),
        ["System".to_string(), "Collections".to_string()]
    );

    let spaced = NavigateToPattern::compile("  get user ").unwrap();
    assert_eq!(spaced.shape(), PatternShape::Spaced);
    assert!(spaced.container_segments().is_none());

    let trailing = NavigateToPattern::compile("Foo.").unwrap();
    assert_eq!(trailing.shape(), PatternShape::Simple);
}

#[test]
fn blank_patterns_are_rejected() {
    for raw in ["", "   ", "...", " . "] {
        let err = NavigateToPattern::compile(raw).unwrap_err();
        assert!(matches!(err, NavigateToError::InvalidArgument(_)), "{raw:?} gave {err:?}");
    }
}

#[test]
fn dotted_pattern_reports_last_segment() {
    // Scenario: `Sys.Con` against `Console` in `System`
    let matcher = CamelCasePatternMatcher::new();
    let pattern = NavigateToPattern::compile("System.Con").unwrap();

    let outcome = pattern.match_declaration(&matcher, "Console", "System").unwrap();
    // Container matched Exact, name matched Prefix; the name wins
    assert_eq!(outcome.kind, PatternMatchKind::Prefix);
    assert_eq!(outcome.matched_spans, vec![TextSpan::new(0, 3)]);

    let abbreviated = NavigateToPattern::compile("Sys.Con").unwrap();
    assert!(abbreviated.match_declaration(&matcher, "Console", "System").is_some());
    assert!(abbreviated.match_declaration(&matcher, "Console", "Microsoft").is_none());
    assert!(abbreviated.match_declaration(&matcher, "Console", "").is_none());
}

#[test]
fn container_segments_align_to_the_end() {
    let matcher = CamelCasePatternMatcher::new();
    let pattern = NavigateToPattern::compile("Coll.Gen.List").unwrap();

    assert!(pattern
        .match_declaration(&matcher, "List", "System.Collections.Generic")
        .is_some());
    assert!(pattern
        .match_declaration(&matcher, "List", "System.Generic.Collections")
        .is_none());
}

#[test]
fn spaced_pattern_reports_best_word() {
    let matcher = CamelCasePatternMatcher::new();
    let pattern = NavigateToPattern::compile("user get").unwrap();

    let outcome = pattern.match_declaration(&matcher, "GetUser", "").unwrap();
    // `get` is a Prefix, `user` a Substring: the best is reported
    assert_eq!(outcome.kind, PatternMatchKind::Prefix);
    assert_eq!(outcome.matched_spans, vec![TextSpan::new(0, 3), TextSpan::new(3, 4)]);

    // Every word has to match
    assert!(pattern.match_declaration(&matcher, "GetAccount", "").is_none());
}

#[test]
fn fold_rules() {
    let outcomes = vec![
        PatternMatch::new(PatternMatchKind::Exact, true, vec![]),
        PatternMatch::new(PatternMatchKind::CamelCasePrefix, false, vec![]),
    ];
    assert_eq!(
        fold_outcomes(PatternShape::Dotted, &outcomes).map(|m| m.kind),
        Some(PatternMatchKind::CamelCasePrefix)
    );
    assert_eq!(
        fold_outcomes(PatternShape::Spaced, &outcomes).map(|m| m.kind),
        Some(PatternMatchKind::Exact)
    );
    assert!(fold_outcomes(PatternShape::Simple, &[]).is_none());
}
