//! Integration tests for core matching functionality
//!
//! These tests cover the fundamental matching operations including:
//! - Anchors (start/end of input)
//! - Literal and range matching
//! - Repetition
//! - Sequence and ordered choice
//! - Recursive rules and the arithmetic grammar

use topdown::builder::Lit;
use topdown::prelude::*;

/// The arithmetic demonstration grammar
fn calculator() -> Grammar {
    GrammarBuilder::new()
        .rule("Toplevel", start().then(ref_("Additive")).then(end()))
        .rule(
            "Additive",
            ref_("Multiplicative")
                .then(lit('+'))
                .then(ref_("Additive"))
                .or(ref_("Multiplicative")),
        )
        .rule(
            "Multiplicative",
            ref_("Primary")
                .then(lit('*'))
                .then(ref_("Multiplicative"))
                .or(ref_("Primary")),
        )
        .rule(
            "Primary",
            lit('(')
                .then(ref_("Additive"))
                .then(lit(')'))
                .or(ref_("Number")),
        )
        .rule("Number", range('0', '9').many1())
        .build()
        .expect("calculator grammar builds")
}

// ============================================================================
// Anchor Tests
// ============================================================================

#[test]
fn test_end_matches_empty_input() {
    let grammar = GrammarBuilder::new().rule("eof", end()).build().unwrap();

    assert_eq!(grammar.match_len(""), Some(0));
    assert_eq!(grammar.match_len("a"), None);
}

#[test]
fn test_start_only_matches_offset_zero() {
    let grammar = GrammarBuilder::new()
        .rule("anchored", lit('a').then(start()))
        .build()
        .unwrap();

    // After consuming 'a' the offset is 1, so the inner anchor fails
    assert_eq!(grammar.match_len("a"), None);
}

#[test]
fn test_fully_anchored_match() {
    let grammar = GrammarBuilder::new()
        .rule("exact", start().then(lit('h')).then(lit('i')).then(end()))
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("hi"), Some(2));
    assert_eq!(grammar.match_len("hi there"), None);
}

// ============================================================================
// Leaf Matcher Tests
// ============================================================================

#[test]
fn test_literal_match() {
    let grammar = GrammarBuilder::new().rule("a", lit('a')).build().unwrap();

    assert_eq!(grammar.match_len("a"), Some(1));
    assert_eq!(grammar.match_len("abc"), Some(1));
    assert_eq!(grammar.match_len("b"), None);
    assert_eq!(grammar.match_len(""), None);
}

#[test]
fn test_range_no_match() {
    let grammar = GrammarBuilder::new()
        .rule("digit", range('0', '9'))
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("x"), None);
    assert_eq!(grammar.match_len("5"), Some(1));
}

#[test]
fn test_literal_unicode_consumes_utf8_width() {
    let grammar = GrammarBuilder::new()
        .rule("forall", lit('∀'))
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("∀x"), Some(3));
    assert_eq!(grammar.match_len("x"), None);
}

// ============================================================================
// Repetition Tests
// ============================================================================

#[test]
fn test_one_or_more_digits() {
    let grammar = GrammarBuilder::new()
        .rule("number", range('0', '9').many1())
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("123abc"), Some(3));
    assert_eq!(grammar.match_len("9"), Some(1));
    assert_eq!(grammar.match_len("abc"), None);
    assert_eq!(grammar.match_len(""), None);
}

#[test]
fn test_zero_or_more_digits() {
    let grammar = GrammarBuilder::new()
        .rule("digits", range('0', '9').many())
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("123abc"), Some(3));
    assert_eq!(grammar.match_len("abc"), Some(0));
    assert_eq!(grammar.match_len(""), Some(0));
}

#[test]
fn test_repetition_of_composite() {
    // ("ab")+ consumes pairs, stopping at the first incomplete pair
    let grammar = GrammarBuilder::new()
        .rule("pairs", lit('a').then(lit('b')).many1())
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("ababab"), Some(6));
    assert_eq!(grammar.match_len("ababa"), Some(4));
    assert_eq!(grammar.match_len("ba"), None);
}

// ============================================================================
// Sequence Tests
// ============================================================================

#[test]
fn test_sequence_sums_consumed_lengths() {
    let grammar = GrammarBuilder::new()
        .rule(
            "version",
            range('0', '9').many1().then(lit('.')).then(range('0', '9').many1()),
        )
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("10.4-rc"), Some(4));
}

#[test]
fn test_sequence_discards_partial_consumption() {
    let grammar = GrammarBuilder::new()
        .rule("ab", lit('a').then(lit('b')))
        .build()
        .unwrap();

    // 'a' alone matched, but the sequence as a whole reports nothing
    assert_eq!(grammar.match_len("ac"), None);
    assert_eq!(grammar.match_len("a"), None);
}

// ============================================================================
// Ordered Choice Tests
// ============================================================================

#[test]
fn test_choice_commits_to_first_success() {
    // The single 'a' alternative wins even though the run is longer
    let grammar = GrammarBuilder::new()
        .rule("greedy_loser", lit('a').or(lit('a').many1()))
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("aaaa"), Some(1));
}

#[test]
fn test_choice_falls_through_to_later_alternatives() {
    let grammar = GrammarBuilder::new()
        .rule("sign", lit('+').or(lit('-')).or(lit('~')))
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("+"), Some(1));
    assert_eq!(grammar.match_len("-"), Some(1));
    assert_eq!(grammar.match_len("~"), Some(1));
    assert_eq!(grammar.match_len("*"), None);
}

#[test]
fn test_choice_of_many_via_vec() {
    let grammar = GrammarBuilder::new()
        .rule(
            "keyword",
            choice(vec![
                dynamic(lit('i').then(lit('f'))),
                dynamic(lit('f').then(lit('n'))),
            ]),
        )
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("if x"), Some(2));
    assert_eq!(grammar.match_len("fn x"), Some(2));
    assert_eq!(grammar.match_len("let"), None);
}

// ============================================================================
// Recursive Grammar Tests
// ============================================================================

#[test]
fn test_calculator_full_expression() {
    let grammar = calculator();

    assert_eq!(grammar.match_rule("Toplevel", "(1+1)+1*(5+5)"), Some(13));
}

#[test]
fn test_calculator_root_is_first_rule() {
    let grammar = calculator();

    // "Toplevel" was registered first, so match_len runs the same rule
    assert_eq!(grammar.match_len("(1+1)+1*(5+5)"), Some(13));
}

#[test]
fn test_calculator_simple_forms() {
    let grammar = calculator();

    assert_eq!(grammar.match_rule("Toplevel", "7"), Some(1));
    assert_eq!(grammar.match_rule("Toplevel", "1+1"), Some(3));
    assert_eq!(grammar.match_rule("Toplevel", "1*2*3+4"), Some(7));
    assert_eq!(grammar.match_rule("Toplevel", "((((5))))"), Some(9));
}

#[test]
fn test_calculator_rejects_malformed_input() {
    let grammar = calculator();

    assert_eq!(grammar.match_rule("Toplevel", ""), None);
    assert_eq!(grammar.match_rule("Toplevel", "(1+1"), None);
    assert_eq!(grammar.match_rule("Toplevel", "1+"), None);
    assert_eq!(grammar.match_rule("Toplevel", "+1"), None);
    assert_eq!(grammar.match_rule("Toplevel", "1+1x"), None);
}

#[test]
fn test_calculator_subrules_match_unanchored() {
    let grammar = calculator();

    // Additive is not anchored, so it matches a prefix
    assert_eq!(grammar.match_rule("Additive", "12ab"), Some(2));
    assert_eq!(grammar.match_rule("Number", "450+2"), Some(3));
}

#[test]
fn test_mutually_recursive_rules() {
    // evens = "" | 'a' odds ; odds = 'a' evens -- matches runs of 'a'
    // and reports the longest even prefix
    let grammar = GrammarBuilder::new()
        .rule("evens", lit('a').then(ref_("odds")).or(seq::<_, Lit>(vec![])))
        .rule("odds", lit('a').then(ref_("evens")))
        .build()
        .unwrap();

    assert_eq!(grammar.match_len("aaaa"), Some(4));
    assert_eq!(grammar.match_len("aaa"), Some(2));
    assert_eq!(grammar.match_len(""), Some(0));
}

// ============================================================================
// Registry and Serialization Tests
// ============================================================================

#[test]
fn test_match_rule_unknown_name_is_none() {
    let grammar = calculator();

    assert_eq!(grammar.match_rule("NoSuchRule", "123"), None);
    assert!(grammar.rule("NoSuchRule").is_none());
    assert!(grammar.rule("Toplevel").is_some());
}

#[test]
fn test_json_roundtrip_preserves_matching() {
    let grammar = calculator();
    let json = grammar.to_json().unwrap();
    let restored = Grammar::from_json(&json).unwrap();

    assert_eq!(restored, grammar);
    assert_eq!(restored.match_rule("Toplevel", "(1+1)+1*(5+5)"), Some(13));
    assert_eq!(restored.match_rule("Toplevel", "(1+1"), None);
}

#[test]
fn test_calculator_has_no_warnings() {
    let grammar = calculator();

    let warnings = grammar.analyze_warnings();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_matching_at_explicit_offsets() {
    let grammar = calculator();
    let matcher = Matcher::new(&grammar, "xx1+2");
    let number = grammar.rule("Number").unwrap();

    assert_eq!(matcher.match_atom(number, 0), None);
    assert_eq!(matcher.match_atom(number, 2), Some(1));
    assert_eq!(matcher.match_atom(number, 4), Some(1));
    assert_eq!(matcher.match_atom(number, 5), None);
}
