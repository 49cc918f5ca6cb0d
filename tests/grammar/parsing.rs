//! Grammar parsing tests.
//!
//! Tests for turning grammar text into trees and rejecting malformed text.

use miles_foundation::ErrorKind;
use miles_grammar::{CommandComponent as C, parse_grammar};

fn syntax_error(source: &str) -> (String, usize) {
    let err = parse_grammar(source).unwrap_err();
    let syntax = err.as_grammar_syntax().expect("grammar syntax error");
    (syntax.fragment.clone(), syntax.offset)
}

// =============================================================================
// Accepted Grammars
// =============================================================================

#[test]
fn canvas_command() {
    let ast = parse_grammar("(ADD, DRAW) { color } shape AT coordinates").unwrap();
    assert_eq!(
        ast,
        C::root(vec![
            C::choice(vec![vec![C::word("ADD")], vec![C::word("DRAW")]]),
            C::optional(vec![C::matching("color")]),
            C::matching("shape"),
            C::word("AT"),
            C::matching("coordinates"),
        ])
    );
}

#[test]
fn whitespace_is_insignificant() {
    let tight = parse_grammar("(A,B){c}[D]").unwrap();
    let loose = parse_grammar("  ( A , B )  { c }\n[ D ]  ").unwrap();
    assert_eq!(tight, loose);
}

#[test]
fn list_of_separated_items() {
    let ast = parse_grammar("(HI, HELLO) someone [comma someone]").unwrap();
    assert_eq!(
        ast,
        C::root(vec![
            C::choice(vec![vec![C::word("HI")], vec![C::word("HELLO")]]),
            C::matching("someone"),
            C::list(vec![C::matching("comma"), C::matching("someone")]),
        ])
    );
    assert_eq!(
        ast.placeholders().into_iter().collect::<Vec<_>>(),
        vec!["comma", "someone"]
    );
}

#[test]
fn capture_wraps_one_expression() {
    let ast = parse_grammar("who=name SAID what=[word]").unwrap();
    assert_eq!(
        ast,
        C::root(vec![
            C::named("who", C::matching("name")),
            C::word("SAID"),
            C::named("what", C::list(vec![C::matching("word")])),
        ])
    );
}

#[test]
fn nested_groups() {
    let ast = parse_grammar("[{(A, B c)}]").unwrap();
    assert_eq!(
        ast,
        C::root(vec![C::list(vec![C::optional(vec![C::choice(vec![
            vec![C::word("A")],
            vec![C::word("B"), C::matching("c")],
        ])])])])
    );
}

#[test]
fn underscores_and_digits_in_placeholders() {
    let ast = parse_grammar("_private student_list2").unwrap();
    assert_eq!(
        ast,
        C::root(vec![C::matching("_private"), C::matching("student_list2")])
    );
    assert!(!ast.is_literal_only());
    assert!(parse_grammar("HELLO WORLD").unwrap().is_literal_only());
}

// =============================================================================
// Rejected Grammars
// =============================================================================

#[test]
fn errors_are_grammar_syntax_errors() {
    for source in ["", "A [", "A ]", "{}", "(A, )", "n=", "Hello", "A ; B"] {
        let err = parse_grammar(source).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::GrammarSyntax(_)),
            "{source:?} gave {err}"
        );
    }
}

#[test]
fn errors_cite_the_offending_text() {
    assert_eq!(syntax_error("MOVE Shape"), ("Shape".to_string(), 5));
    assert_eq!(syntax_error("MOVE ; TO"), (";".to_string(), 5));
    assert_eq!(syntax_error("A (B, C"), ("(B, C".to_string(), 2));
    assert_eq!(syntax_error("A {B}}"), ("}".to_string(), 5));
}

#[test]
fn error_display_mentions_fragment() {
    let err = parse_grammar("GO Home").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Home"), "{message}");
    assert!(message.contains("offset 3"), "{message}");
}
