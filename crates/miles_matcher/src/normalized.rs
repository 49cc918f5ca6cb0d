//! The normalized matcher searched by the recognizer.
//!
//! Each [`NormalizedConnection`] is a run of automatic edges ending in one
//! word, one placeholder, or a final state. States keep their raw graph id
//! for diagnostics but are addressed densely, initial state first.

use std::fmt;

use crate::graph::{AutoLabel, ConnectionLabel, NodeKind, StateGraph, StateId};

/// One step of a normalized connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NormalizedNode {
    /// What the step matches.
    pub label: ConnectionLabel,
    /// Capture name.
    pub name: Option<String>,
}

impl NormalizedNode {
    /// Creates a node.
    #[must_use]
    pub fn new(label: ConnectionLabel, name: Option<String>) -> Self {
        Self { label, name }
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.label.kind()
    }

    /// Returns the word, placeholder name, or automatic label text.
    #[must_use]
    pub fn argument(&self) -> String {
        self.label.argument()
    }

    /// Returns the structural marker of an automatic node.
    #[must_use]
    pub const fn auto_label(&self) -> Option<&AutoLabel> {
        match &self.label {
            ConnectionLabel::Automatic(label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}=")?;
        }
        write!(f, "{}", self.label)
    }
}

/// A collapsed run of connections between two key states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedConnection {
    /// Steps in traversal order.
    pub nodes: Vec<NormalizedNode>,
    /// Dense id of the destination state.
    pub destination: StateId,
    /// Static priority assigned by the priority strategy.
    pub priority: i32,
}

impl NormalizedConnection {
    /// Creates a connection with priority 0.
    #[must_use]
    pub fn new(nodes: Vec<NormalizedNode>, destination: StateId) -> Self {
        Self {
            nodes,
            destination,
            priority: 0,
        }
    }

    /// The node that consumes input, i.e. the last one.
    #[must_use]
    pub fn terminal(&self) -> Option<&NormalizedNode> {
        self.nodes.last()
    }
}

/// A key state of the normalized matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedState {
    /// Dense id.
    pub id: StateId,
    /// Id of the corresponding state in the raw graph.
    pub source: StateId,
    /// Whether this state accepts.
    pub is_final: bool,
    /// Outgoing connections in insertion order.
    pub connections: Vec<NormalizedConnection>,
    order: Vec<usize>,
}

impl NormalizedState {
    pub(crate) fn new(id: StateId, source: StateId, is_final: bool) -> Self {
        Self {
            id,
            source,
            is_final,
            connections: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Connection indices sorted by static priority, highest first; ties
    /// keep insertion order.
    #[must_use]
    pub fn static_order(&self) -> &[usize] {
        &self.order
    }

    pub(crate) fn push(&mut self, connection: NormalizedConnection) {
        let duplicate = self
            .connections
            .iter()
            .any(|c| c.nodes == connection.nodes && c.destination == connection.destination);
        if !duplicate {
            self.connections.push(connection);
        }
    }

    pub(crate) fn refresh_order(&mut self) {
        let mut order: Vec<usize> = (0..self.connections.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.connections[i].priority));
        self.order = order;
    }
}

/// The priority-ordered matcher the recognizer runs on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedMatcher {
    states: Vec<NormalizedState>,
}

impl NormalizedMatcher {
    pub(crate) fn from_states(mut states: Vec<NormalizedState>) -> Self {
        for state in &mut states {
            state.refresh_order();
        }
        Self { states }
    }

    /// The initial state id.
    #[must_use]
    pub const fn initial(&self) -> StateId {
        StateId::INITIAL
    }

    /// Returns a state by dense id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this matcher.
    #[must_use]
    pub fn state(&self, id: StateId) -> &NormalizedState {
        &self.states[id.index()]
    }

    /// All states, initial first.
    #[must_use]
    pub fn states(&self) -> &[NormalizedState] {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut [NormalizedState] {
        &mut self.states
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the initial state has no connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.first().is_none_or(|s| s.connections.is_empty())
    }

    /// Total number of normalized connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.states.iter().map(|s| s.connections.len()).sum()
    }

    /// Expands every composite connection back into a chain of raw
    /// connections.
    ///
    /// State `i` of this matcher becomes raw state `i`; intermediate chain
    /// states are appended after them. Normalizing the result reproduces
    /// this matcher's connections.
    #[must_use]
    pub fn export(&self) -> StateGraph {
        let mut graph = StateGraph::new();
        for state in self.states.iter().skip(1) {
            graph.add_state(state.is_final);
        }
        for state in &self.states {
            for connection in &state.connections {
                let mut from = state.id;
                let last = connection.nodes.len().saturating_sub(1);
                for (i, node) in connection.nodes.iter().enumerate() {
                    let to = if i == last {
                        connection.destination
                    } else {
                        graph.add_state(false)
                    };
                    graph.push_raw(from, node.label.clone(), node.name.clone(), connection.priority, to);
                    from = to;
                }
            }
        }
        graph
    }
}

impl fmt::Display for NormalizedMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.states {
            writeln!(f, "{} ->", state.source)?;
            for connection in &state.connections {
                let nodes: Vec<String> = connection.nodes.iter().map(ToString::to_string).collect();
                let destination = self.state(connection.destination);
                let accept = if destination.is_final { " *" } else { "" };
                writeln!(f, "  {} -- {}{accept}", nodes.join(" "), destination.source)?;
            }
        }
        Ok(())
    }
}
