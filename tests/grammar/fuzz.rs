//! Property tests for the grammar parser.
//!
//! The parser must never panic, and every well-formed tree must survive a
//! trip through its grammar text.

use miles_grammar::{CommandComponent, parse_grammar};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn word() -> impl Strategy<Value = CommandComponent> {
    "[A-Z]{1,6}".prop_map(CommandComponent::Word)
}

fn placeholder_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,5}".prop_map(String::from)
}

fn expression() -> impl Strategy<Value = CommandComponent> {
    let leaf = prop_oneof![word(), placeholder_name().prop_map(CommandComponent::Matching)];
    leaf.prop_recursive(3, 32, 4, |inner| {
        let sequence = prop::collection::vec(inner.clone(), 1..4).prop_map(CommandComponent::Sequence);
        prop_oneof![
            sequence.clone().prop_map(|s| CommandComponent::Optional(Box::new(s))),
            sequence.clone().prop_map(|s| CommandComponent::List(Box::new(s))),
            prop::collection::vec(sequence, 1..4).prop_map(CommandComponent::Choice),
            (placeholder_name(), inner).prop_map(|(name, e)| CommandComponent::Named(name, Box::new(e))),
        ]
    })
}

fn grammar() -> impl Strategy<Value = CommandComponent> {
    prop::collection::vec(expression(), 1..5).prop_map(CommandComponent::root)
}

/// Text built from grammar punctuation and identifiers, balanced or not.
fn grammar_like_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[A-Z]{1,4}".prop_map(String::from),
        "[a-z]{1,4}".prop_map(String::from),
        "[a-z]{1,4}=".prop_map(String::from),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(" ".to_string()),
    ];
    prop::collection::vec(piece, 0..40).prop_map(|parts| parts.concat())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn never_panics_on_arbitrary_text(source in "\\PC{0,80}") {
        let _ = parse_grammar(&source);
    }

    #[test]
    fn never_panics_on_grammar_like_text(source in grammar_like_text()) {
        if let Ok(ast) = parse_grammar(&source) {
            // Whatever parses renders to text that parses to the same tree.
            prop_assert_eq!(parse_grammar(&ast.to_grammar_text()).unwrap(), ast);
        }
    }

    #[test]
    fn grammar_text_reparses(ast in grammar()) {
        let text = ast.to_grammar_text();
        let reparsed = parse_grammar(&text);
        prop_assert!(reparsed.is_ok(), "{} failed to parse", text);
        prop_assert_eq!(reparsed.unwrap(), ast);
    }

    #[test]
    fn literal_grammars_have_a_sentence(ast in grammar()) {
        if ast.is_literal_only() {
            let sentence = ast.canonical_sentence();
            prop_assert!(sentence.is_some());
            prop_assert!(sentence.unwrap().iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
        }
    }
}
