//! Search frontier elements.
//!
//! A [`Pointer`] is one branch of the search: a matcher state, an input
//! position, an accumulated certainty and the history of nodes it matched.
//! Pointers never change once built; advancing one produces a new pointer
//! that shares its history through a persistent vector.

use miles_foundation::{Flags, Value};
use miles_matcher::{NormalizedNode, StateId};

use crate::context::Guards;

/// One matched node and the input it covered.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<'m> {
    /// The node from the matcher.
    pub node: &'m NormalizedNode,
    /// First position covered.
    pub start: usize,
    /// Position after the node.
    pub end: usize,
    /// Tokens recorded as the node's text.
    pub values: Vec<String>,
    /// Value set by the node's analyzer.
    pub result: Option<Value>,
}

impl<'m> Step<'m> {
    /// A step for a node that consumes nothing.
    #[must_use]
    pub fn automatic(node: &'m NormalizedNode, position: usize) -> Self {
        Self {
            node,
            start: position,
            end: position,
            values: Vec::new(),
            result: None,
        }
    }
}

/// One branch of the recognition search.
#[derive(Clone, Debug)]
pub struct Pointer<'m> {
    state: StateId,
    start: usize,
    position: usize,
    certainty: f64,
    history: im::Vector<Step<'m>>,
    flags: Flags,
    guards: Guards,
    idle: im::HashSet<StateId>,
}

impl<'m> Pointer<'m> {
    /// Creates the initial pointer of a search.
    #[must_use]
    pub fn initial(state: StateId, position: usize, certainty: f64, flags: Flags, guards: Guards) -> Self {
        Self {
            state,
            start: position,
            position,
            certainty,
            history: im::Vector::new(),
            flags,
            guards,
            idle: im::HashSet::new(),
        }
    }

    /// Returns a pointer that followed a connection to `state`.
    #[must_use]
    pub fn advance(
        &self,
        state: StateId,
        position: usize,
        certainty: f64,
        steps: Vec<Step<'m>>,
        flags: Flags,
    ) -> Self {
        let mut history = self.history.clone();
        history.extend(steps);
        let idle = if position == self.position {
            self.idle.update(self.state)
        } else {
            im::HashSet::new()
        };
        Self {
            state,
            start: self.start,
            position,
            certainty,
            history,
            flags,
            guards: self.guards.clone(),
            idle,
        }
    }

    /// Current matcher state.
    #[must_use]
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Position the search started at.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Next unconsumed position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Accumulated certainty.
    #[must_use]
    pub fn certainty(&self) -> f64 {
        self.certainty
    }

    /// Matched nodes, oldest first.
    #[must_use]
    pub fn history(&self) -> &im::Vector<Step<'m>> {
        &self.history
    }

    /// This branch's flags.
    #[must_use]
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Extended grammars active on this branch.
    #[must_use]
    pub fn guards(&self) -> &Guards {
        &self.guards
    }

    /// Returns true if this branch already passed through `state` without
    /// consuming input since.
    #[must_use]
    pub fn is_idle_at(&self, state: StateId) -> bool {
        state == self.state || self.idle.contains(&state)
    }

    /// Name of the command or namespace this pointer recognized, if it
    /// passed a `recognize` node.
    #[must_use]
    pub fn recognized(&self) -> Option<&'m str> {
        self.history.iter().rev().find_map(|step| match step.node.auto_label() {
            Some(miles_matcher::AutoLabel::Recognize(name)) => Some(name.as_str()),
            _ => None,
        })
    }
}
