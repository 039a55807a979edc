// tests/generator_tests.rs
//
// End-to-end enumeration properties: combinatorial counts, recursion
// bounding, determinism, and the iteration protocol.

use std::collections::HashSet;

use enumgram::errors::ErrorCategory;
use enumgram::{statements, ErrorKind, GrammarStore};

fn store(source: &str) -> GrammarStore {
    GrammarStore::from_source("test grammar", source).unwrap()
}

fn collect(source: &str, start: &str) -> Vec<String> {
    statements(&store(source), start).unwrap().collect()
}

#[test]
fn enumerates_the_worked_example_in_order() {
    assert_eq!(
        collect("S: 'A' X | 'B'\nX: 'C'", "S"),
        vec!["A C ".to_string(), "B ".to_string()]
    );
}

#[test]
fn right_recursion_terminates_without_sentinel_text() {
    // S expands at most twice on any path before the cutoff, and the
    // alternative holding the cut-off branch is pruned away.
    let rendered = collect("S: 'X' S | 'Y'", "S");
    assert_eq!(rendered, vec!["X Y ", "Y "]);
    for statement in &rendered {
        for word in statement.split_whitespace() {
            assert!(word == "X" || word == "Y", "unexpected word {word:?}");
        }
    }
}

#[test]
fn count_is_the_product_of_alternative_counts_without_recursion() {
    // No pruning happens, so |S| = |A| * |B| through the A B alternative,
    // plus the lone 'z' alternative.
    let source = "S: A B | 'z'\nA: 'a1' | 'a2' | 'a3'\nB: 'b1' | 'b2'";
    let rendered = collect(source, "S");
    assert_eq!(rendered.len(), 3 * 2 + 1);

    let distinct: HashSet<_> = rendered.iter().collect();
    assert_eq!(distinct.len(), rendered.len(), "statements must be distinct");
}

#[test]
fn enumeration_is_deterministic_across_sessions() {
    let source = "S: A B | B A\nA: 'a1' | 'a2'\nB: 'b1' | 'b2'";
    let shared = store(source);
    let first: Vec<String> = statements(&shared, "S").unwrap().collect();
    let second: Vec<String> = statements(&shared, "S").unwrap().collect();
    assert_eq!(first, second);

    // A freshly parsed store yields the same sequence again.
    assert_eq!(first, collect(source, "S"));
}

#[test]
fn has_next_is_idempotent() {
    let mut sequence = statements(&store("S: 'A' | 'B'"), "S").unwrap();
    assert!(sequence.has_next());
    assert!(sequence.has_next());
    assert_eq!(sequence.next_statement().unwrap(), "A ");

    assert!(sequence.has_next());
    assert!(sequence.has_next());
    assert_eq!(sequence.next_statement().unwrap(), "B ");

    assert!(!sequence.has_next());
    assert!(!sequence.has_next());
}

#[test]
fn next_after_exhaustion_is_a_usage_error() {
    let mut sequence = statements(&store("S: 'A'"), "S").unwrap();
    assert_eq!(sequence.next_statement().unwrap(), "A ");
    assert!(!sequence.has_next());

    let error = sequence.next_statement().unwrap_err();
    assert_eq!(error.kind, ErrorKind::Exhausted);
    assert_eq!(error.category(), ErrorCategory::Usage);
}

#[test]
fn every_rendered_word_comes_from_a_quoted_symbol() {
    let source = "stmt: verb noun | verb\nverb: 'select' | 'drop'\nnoun: 'table'";
    let quoted: HashSet<&str> = ["select", "drop", "table"].into();
    for statement in collect(source, "stmt") {
        for word in statement.split_whitespace() {
            assert!(quoted.contains(word), "word {word:?} not from a literal");
        }
    }
}

#[test]
fn keywords_render_verbatim() {
    assert_eq!(
        collect("stmt: SELECT name\nname: 'x' | 'y'", "stmt"),
        vec!["SELECT x ", "SELECT y "]
    );
}

#[test]
fn empty_quoted_literal_renders_nothing() {
    assert_eq!(collect("S: '' 'A'", "S"), vec!["A "]);
}

#[test]
fn empty_alternative_renders_an_empty_statement() {
    assert_eq!(collect("S: 'A' | ", "S"), vec!["A ".to_string(), String::new()]);
}

#[test]
fn undefined_reference_fails_before_any_statement() {
    let error = statements(&store("S: missing 'A'"), "S").unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::ProductionNotFound {
            name: "missing".into()
        }
    );
    assert_eq!(error.category(), ErrorCategory::Grammar);
}

#[test]
fn unknown_start_production_fails() {
    let error = statements(&store("S: 'A'"), "nope").unwrap_err();
    assert!(matches!(error.kind, ErrorKind::ProductionNotFound { .. }));
}

#[test]
fn duplicate_heads_fail_at_store_construction() {
    let error = GrammarStore::from_source("dup", "S: 'A'\nS: 'B'").unwrap_err();
    assert!(matches!(
        error.kind,
        ErrorKind::DuplicateProduction { ref head, .. } if head == "S"
    ));
    assert_eq!(error.category(), ErrorCategory::Grammar);
}

#[test]
fn hopeless_recursion_is_reported_as_no_finite_derivation() {
    // Every alternative of S recurses forever; pruning empties the root.
    let error = statements(&store("S: S"), "S").unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::NoFiniteDerivation { start: "S".into() }
    );
    assert_eq!(error.category(), ErrorCategory::Grammar);
}

#[test]
fn dead_branches_are_pruned_away_cleanly() {
    // The A branch can never terminate; only the literal branch survives.
    let rendered = collect("S: A | 'ok'\nA: A", "S");
    assert_eq!(rendered, vec!["ok "]);
}

#[test]
fn mutual_recursion_is_bounded() {
    let rendered = collect("a: 'x' b | 'end'\nb: a", "a");
    assert!(!rendered.is_empty());
    for statement in &rendered {
        assert!(statement.ends_with("end "), "statement {statement:?}");
    }
    let distinct: HashSet<_> = rendered.iter().collect();
    assert_eq!(distinct.len(), rendered.len());
}

#[test]
fn binary_operator_grammars_expand_a_few_levels() {
    // Expression-shaped self recursion: finite, deterministic, and every
    // statement is an alternating operand/operator chain.
    let source = "expr: term '+' expr | term\nterm: '1' | '2'";
    let rendered = collect(source, "expr");
    let distinct: HashSet<_> = rendered.iter().collect();
    assert_eq!(distinct.len(), rendered.len());
    assert!(rendered.contains(&"1 ".to_string()));
    assert!(rendered.contains(&"1 + 2 ".to_string()));
    for statement in &rendered {
        let words: Vec<_> = statement.split_whitespace().collect();
        assert!(words.len() % 2 == 1, "operand/operator chain {statement:?}");
    }
}
