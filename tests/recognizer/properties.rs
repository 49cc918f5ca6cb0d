//! Property tests for the recognizer.
//!
//! A grammar made only of words must accept its own canonical sentence,
//! and the recognizer must never panic on arbitrary input.

use miles_foundation::Flags;
use miles_grammar::CommandComponent;
use miles_matcher::{MatcherCompiler, NormalizedMatcher};
use miles_recognizer::{AnyWordAnalyzer, Environment, Recognizer, TextAnalyzer, Tokenizer};
use proptest::prelude::*;

fn literal() -> impl Strategy<Value = CommandComponent> {
    let word = "[A-Z]{1,5}".prop_map(CommandComponent::Word);
    word.prop_recursive(3, 24, 3, |inner| {
        let sequence = prop::collection::vec(inner, 1..3).prop_map(CommandComponent::Sequence);
        prop_oneof![
            sequence.clone().prop_map(|s| CommandComponent::Optional(Box::new(s))),
            sequence.clone().prop_map(|s| CommandComponent::List(Box::new(s))),
            prop::collection::vec(sequence, 1..3).prop_map(CommandComponent::Choice),
        ]
    })
}

fn literal_grammar() -> impl Strategy<Value = CommandComponent> {
    prop::collection::vec(literal(), 1..4).prop_map(CommandComponent::root)
}

fn compile(grammar: &CommandComponent, env: &Environment) -> NormalizedMatcher {
    let graph = MatcherCompiler::command_graph([("c", grammar)], env.priorities()).unwrap();
    MatcherCompiler::finish(&graph, env.priorities())
}

proptest! {
    #[test]
    fn canonical_sentence_is_recognized(grammar in literal_grammar()) {
        let env = Environment::new();
        let matcher = compile(&grammar, &env);
        let sentence = grammar.canonical_sentence().unwrap();
        let pointer = Recognizer::new(&matcher, &env).recognize(&sentence, 0, &Flags::new());
        prop_assert!(pointer.is_ok(), "{} rejected {:?}", grammar.to_grammar_text(), sentence);
        prop_assert_eq!(pointer.unwrap().recognized(), Some("c"));
    }

    #[test]
    fn arbitrary_input_never_panics(text in "[a-z ,.]{0,30}") {
        let env = Environment::new()
            .with_matching("thing", AnyWordAnalyzer)
            .with_matching("rest", TextAnalyzer);
        let grammar = miles_grammar::parse_grammar("(LOOK, GO) { AT } [thing { AND }] { rest }").unwrap();
        let matcher = compile(&grammar, &env);
        let tokens = Tokenizer::tokenize(&text);
        if let Err(err) = Recognizer::new(&matcher, &env).recognize(&tokens, 0, &Flags::new()) {
            let failure = err.as_recognizer().unwrap();
            prop_assert!(failure.position.is_none_or(|p| p >= 1 && p <= tokens.len()));
        }
    }
}
