//! Collapses automatic edges into composite connections.
//!
//! Starting from the initial state, every maximal run of automatic edges is
//! enumerated with an explicit-stack depth-first search. A run ends at a
//! word or placeholder edge, or at an edge into a final state. Its
//! destination becomes a key state that is normalized in turn.
//!
//! A destination already on the search stack closes an automatic cycle and
//! is pruned, which guarantees termination. List loops survive because the
//! loop body always ends in a consuming edge.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::graph::{Connection, StateGraph, StateId};
use crate::normalized::{NormalizedConnection, NormalizedMatcher, NormalizedNode, NormalizedState};

/// Converts raw state graphs into normalized matchers.
pub struct Normalizer;

/// A terminated run of connections.
struct Run {
    nodes: Vec<NormalizedNode>,
    destination: StateId,
}

/// A search frame: the state being expanded, the next connection to try,
/// and the path that led here.
struct Frame<'g> {
    state: StateId,
    next: usize,
    path: Vec<&'g Connection>,
}

impl Normalizer {
    /// Normalizes every state reachable from the initial state.
    #[must_use]
    pub fn normalize(graph: &StateGraph) -> NormalizedMatcher {
        let initial = graph.initial();
        let mut dense: HashMap<StateId, StateId> = HashMap::from([(initial, StateId::INITIAL)]);
        let mut states = vec![NormalizedState::new(
            StateId::INITIAL,
            initial,
            graph.state(initial).is_final,
        )];
        let mut queue = VecDeque::from([initial]);

        while let Some(raw) = queue.pop_front() {
            let id = dense[&raw];
            for run in Self::runs(graph, raw) {
                let destination = match dense.get(&run.destination) {
                    Some(existing) => *existing,
                    None => {
                        let next = StateId::new(states.len());
                        dense.insert(run.destination, next);
                        states.push(NormalizedState::new(
                            next,
                            run.destination,
                            graph.state(run.destination).is_final,
                        ));
                        queue.push_back(run.destination);
                        next
                    }
                };
                states[id.index()].push(NormalizedConnection::new(run.nodes, destination));
            }
        }

        let matcher = NormalizedMatcher::from_states(states);
        debug!(
            raw_states = graph.len(),
            raw_connections = graph.connection_count(),
            states = matcher.len(),
            connections = matcher.connection_count(),
            "normalized matcher"
        );
        matcher
    }

    /// Enumerates all terminated runs leaving `origin`.
    fn runs(graph: &StateGraph, origin: StateId) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut stack = vec![Frame {
            state: origin,
            next: 0,
            path: Vec::new(),
        }];

        while let Some(top) = stack.last_mut() {
            let Some(connection) = graph.state(top.state).connections.get(top.next) else {
                stack.pop();
                continue;
            };
            top.next += 1;
            let mut path = top.path.clone();
            path.push(connection);

            let destination = graph.state(connection.destination);
            let terminates = !connection.label.is_automatic() || destination.is_final;
            if terminates {
                runs.push(Run {
                    nodes: path
                        .iter()
                        .map(|c| NormalizedNode::new(c.label.clone(), c.name.clone()))
                        .collect(),
                    destination: connection.destination,
                });
            } else if stack.iter().all(|f| f.state != connection.destination) {
                stack.push(Frame {
                    state: connection.destination,
                    next: 0,
                    path,
                });
            }
        }
        runs
    }
}
