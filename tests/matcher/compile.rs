//! Compilation tests.
//!
//! Tests for building state graphs from grammar trees and namespace prefixes.

use miles_foundation::ErrorKind;
use miles_grammar::parse_grammar;
use miles_matcher::{
    AutoLabel, ConnectionLabel, MatcherCompiler, PriorityManager, StateGraph, StateId, StaticRule,
};

fn graph_of(commands: &[(&str, &str)]) -> StateGraph {
    let trees: Vec<_> = commands
        .iter()
        .map(|(name, syntax)| (*name, parse_grammar(syntax).unwrap()))
        .collect();
    MatcherCompiler::command_graph(
        trees.iter().map(|(name, tree)| (*name, tree)),
        &PriorityManager::new(),
    )
    .unwrap()
}

fn prefix(words: &str) -> Vec<String> {
    words.split_whitespace().map(str::to_string).collect()
}

// =============================================================================
// Command Graphs
// =============================================================================

#[test]
fn commands_share_leading_words() {
    let graph = graph_of(&[("color", "SET COLOR color"), ("shape", "SET SHAPE shape")]);
    let initial = graph.state(graph.initial());
    assert_eq!(initial.connections.len(), 1);
    assert_eq!(initial.connections[0].label, ConnectionLabel::Word("SET".into()));

    let set = graph.state(initial.connections[0].destination);
    let labels: Vec<String> = set.connections.iter().map(|c| c.label.to_string()).collect();
    assert_eq!(labels, vec!["COLOR", "SHAPE"]);
}

#[test]
fn every_command_gets_its_own_final_state() {
    let graph = graph_of(&[("short", "HI"), ("long", "HI THERE")]);
    let finals: Vec<StateId> = graph
        .states()
        .iter()
        .filter(|s| s.is_final)
        .map(|s| s.id)
        .collect();
    assert_eq!(finals.len(), 2);

    let accepted: Vec<String> = graph
        .states()
        .iter()
        .flat_map(|s| &s.connections)
        .filter_map(|c| match &c.label {
            ConnectionLabel::Automatic(AutoLabel::Recognize(name)) => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(accepted, vec!["short", "long"]);
}

#[test]
fn lowercase_words_are_stored_uppercase() {
    let mut graph = StateGraph::new();
    let tree = miles_grammar::CommandComponent::root(vec![miles_grammar::CommandComponent::word(
        "look",
    )]);
    MatcherCompiler::compile_command(&mut graph, "look", &tree, &PriorityManager::new()).unwrap();
    assert_eq!(
        graph.state(graph.initial()).connections[0].label,
        ConnectionLabel::Word("LOOK".into())
    );
}

#[test]
fn only_accepting_edges_lead_to_final_states() {
    let graph = graph_of(&[
        ("draw", "(ADD, DRAW) { color } shape AT coordinates"),
        ("erase", "ERASE [shape { AND }]"),
    ]);
    for state in graph.states() {
        for connection in &state.connections {
            let accepts = matches!(
                connection.label,
                ConnectionLabel::Automatic(AutoLabel::Recognize(_))
            );
            assert_eq!(accepts, graph.state(connection.destination).is_final);
        }
    }
}

#[test]
fn every_state_is_reachable() {
    let graph = graph_of(&[("draw", "(ADD, DRAW) { color } shape AT coordinates")]);
    assert_eq!(graph.reachable().len(), graph.len());
}

// =============================================================================
// Priority Conflicts
// =============================================================================

#[test]
fn equal_priorities_merge() {
    let mut graph = StateGraph::new();
    let manager = PriorityManager::new();
    let first = parse_grammar("HI").unwrap();
    let second = parse_grammar("HI THERE").unwrap();
    MatcherCompiler::compile_command(&mut graph, "a", &first, &manager).unwrap();
    MatcherCompiler::compile_command(&mut graph, "b", &second, &manager).unwrap();
    assert_eq!(graph.state(graph.initial()).connections.len(), 1);
}

#[test]
fn differing_priorities_conflict() {
    let mut graph = StateGraph::new();
    let first = parse_grammar("HI").unwrap();
    MatcherCompiler::compile_command(&mut graph, "a", &first, &PriorityManager::new()).unwrap();

    let mut louder = PriorityManager::new();
    louder.apply(StaticRule::SpecificWord("HI".into(), 5));
    let second = parse_grammar("HI THERE").unwrap();
    let err = MatcherCompiler::compile_command(&mut graph, "b", &second, &louder).unwrap_err();

    match err.kind {
        ErrorKind::Matcher(conflict) => {
            assert_eq!(conflict.existing, 0);
            assert_eq!(conflict.requested, 5);
            assert!(conflict.connection.contains("HI"));
        }
        other => panic!("expected a matcher conflict, got {other:?}"),
    }
}

#[test]
fn capture_names_keep_edges_apart() {
    let graph = graph_of(&[("a", "GO target=place"), ("b", "GO place")]);
    let go = graph.state(graph.initial()).connections[0].destination;
    let names: Vec<Option<String>> = graph
        .state(go)
        .connections
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(names, vec![Some("target".to_string()), None]);
}

// =============================================================================
// Namespace Graphs
// =============================================================================

#[test]
fn namespace_prefixes_share_words() {
    let letters = prefix("n s p");
    let numbers = prefix("n x");
    let graph = MatcherCompiler::namespace_graph([
        ("letters", letters.as_slice()),
        ("numbers", numbers.as_slice()),
    ])
    .unwrap();

    let initial = graph.state(graph.initial());
    assert_eq!(initial.connections.len(), 1);
    assert_eq!(initial.connections[0].label, ConnectionLabel::Word("N".into()));

    let trace = graph.trace();
    assert!(trace.iter().any(|line| line.contains("(recognize letters)")));
    assert!(trace.iter().any(|line| line.contains("(recognize numbers)")));
}

#[test]
fn namespace_without_prefix_is_rejected() {
    let mut graph = StateGraph::new();
    let err = MatcherCompiler::compile_namespace(&mut graph, "empty", &[], &PriorityManager::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EmptyPrefix(ref name) if name == "empty"));
    assert_eq!(graph.len(), 1);
}
