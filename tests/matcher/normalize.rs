//! Normalization tests.
//!
//! Tests for collapsing compiled graphs into the matcher the recognizer runs on.

use miles_grammar::parse_grammar;
use miles_matcher::{MatcherCompiler, NodeKind, NormalizedMatcher, Normalizer, PriorityManager};

fn matcher_of(commands: &[(&str, &str)]) -> NormalizedMatcher {
    let trees: Vec<_> = commands
        .iter()
        .map(|(name, syntax)| (*name, parse_grammar(syntax).unwrap()))
        .collect();
    let priorities = PriorityManager::new();
    let graph =
        MatcherCompiler::command_graph(trees.iter().map(|(name, tree)| (*name, tree)), &priorities)
            .unwrap();
    MatcherCompiler::finish(&graph, &priorities)
}

fn shapes(matcher: &NormalizedMatcher) -> Vec<Vec<(String, usize)>> {
    matcher
        .states()
        .iter()
        .map(|s| {
            s.connections
                .iter()
                .map(|c| {
                    let nodes: Vec<String> = c.nodes.iter().map(ToString::to_string).collect();
                    (nodes.join(" "), c.destination.index())
                })
                .collect()
        })
        .collect()
}

const CANVAS: &[(&str, &str)] = &[
    ("draw", "(ADD, DRAW) { color } shape AT coordinates"),
    ("erase", "ERASE [shape { AND }]"),
    ("clear", "CLEAR { ALL }"),
];

// =============================================================================
// Shape of the Matcher
// =============================================================================

#[test]
fn list_becomes_find_again_loop() {
    let matcher = matcher_of(&[("go", "GO [STEP]")]);
    assert_eq!(
        matcher.to_string(),
        "0 ->\n  GO -- 1\n1 ->\n  (begin list) STEP -- 3\n3 ->\n  (repeat list) STEP -- 3\n  (end list) (recognize go) -- 5 *\n5 ->\n"
    );
}

#[test]
fn runs_end_at_consuming_nodes_or_acceptance() {
    let matcher = matcher_of(CANVAS);
    for state in matcher.states() {
        for connection in &state.connections {
            let terminal = connection.terminal().unwrap();
            let accepting = matcher.state(connection.destination).is_final;
            assert!(terminal.kind() != NodeKind::Automatic || accepting);
            assert!(
                connection.nodes[..connection.nodes.len() - 1]
                    .iter()
                    .all(|n| n.kind() == NodeKind::Automatic)
            );
        }
    }
}

#[test]
fn final_states_have_no_connections() {
    let matcher = matcher_of(CANVAS);
    let finals: Vec<_> = matcher.states().iter().filter(|s| s.is_final).collect();
    assert_eq!(finals.len(), 3);
    assert!(finals.iter().all(|s| s.connections.is_empty()));
}

#[test]
fn no_duplicate_connections_within_a_state() {
    let matcher = matcher_of(CANVAS);
    for state in matcher.states() {
        for (i, a) in state.connections.iter().enumerate() {
            for b in &state.connections[i + 1..] {
                assert!(a.nodes != b.nodes || a.destination != b.destination);
            }
        }
    }
}

#[test]
fn optional_word_offers_both_paths() {
    let matcher = matcher_of(&[("clear", "CLEAR { ALL }")]);
    let clear = matcher.state(matcher.initial()).connections[0].destination;
    let runs: Vec<String> = matcher
        .state(clear)
        .connections
        .iter()
        .map(|c| c.nodes.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))
        .collect();
    assert_eq!(
        runs,
        vec!["(skip optional) (recognize clear)", "(begin optional) ALL"]
    );
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn normalizing_an_export_reproduces_the_matcher() {
    let once = matcher_of(CANVAS);
    let twice = Normalizer::normalize(&once.export());
    assert_eq!(shapes(&once), shapes(&twice));
    assert_eq!(once.len(), twice.len());
}

#[test]
fn export_keeps_priorities() {
    let once = matcher_of(CANVAS);
    let exported = once.export();
    let initial = &exported.state(exported.initial()).connections;
    assert!(!initial.is_empty());
    assert!(initial.iter().all(|c| c.priority == 0));
    assert_eq!(exported.states().iter().filter(|s| s.is_final).count(), 3);
}
