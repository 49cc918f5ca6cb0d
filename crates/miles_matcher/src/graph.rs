//! The raw state graph produced by the matcher compiler.
//!
//! States live in a single arena and are addressed by [`StateId`]. A state
//! owns its outgoing connections; connections refer to their destination by
//! id, so list loops are plain back edges.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::fmt;

use miles_foundation::{Error, Result};

/// Handle to a state in a [`StateGraph`] or a normalized matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StateId(u32);

impl StateId {
    /// The initial state of every graph.
    pub const INITIAL: Self = Self(0);

    /// Creates an id from an arena index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a connection or normalized node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// Consumes one token equal to a literal word.
    Word,
    /// Delegates to a placeholder analyzer.
    Matching,
    /// Consumes nothing; marks grammar structure.
    Automatic,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word => write!(f, "WORD"),
            Self::Matching => write!(f, "MATCHING"),
            Self::Automatic => write!(f, "AUTOMATIC"),
        }
    }
}

/// Structural marker carried by an automatic connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AutoLabel {
    /// Bypasses an optional group.
    SkipOptional,
    /// Enters an optional group.
    BeginOptional,
    /// Leaves an optional group.
    EndOptional,
    /// Enters a list.
    BeginList,
    /// Loops back for another list item.
    RepeatList,
    /// Leaves a list.
    EndList,
    /// Enters a choice.
    BeginChoice,
    /// Selects the alternative with this index.
    Option(usize),
    /// Leaves a choice.
    EndChoice,
    /// Accepts the command or namespace with this name.
    Recognize(String),
}

impl fmt::Display for AutoLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkipOptional => write!(f, "skip optional"),
            Self::BeginOptional => write!(f, "begin optional"),
            Self::EndOptional => write!(f, "end optional"),
            Self::BeginList => write!(f, "begin list"),
            Self::RepeatList => write!(f, "repeat list"),
            Self::EndList => write!(f, "end list"),
            Self::BeginChoice => write!(f, "begin choice"),
            Self::Option(index) => write!(f, "option {index}"),
            Self::EndChoice => write!(f, "end choice"),
            Self::Recognize(name) => write!(f, "recognize {name}"),
        }
    }
}

/// What a connection matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionLabel {
    /// A literal word, stored uppercase.
    Word(String),
    /// A placeholder name.
    Matching(String),
    /// A structural marker.
    Automatic(AutoLabel),
}

impl ConnectionLabel {
    /// Returns the connection kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Word(_) => NodeKind::Word,
            Self::Matching(_) => NodeKind::Matching,
            Self::Automatic(_) => NodeKind::Automatic,
        }
    }

    /// Returns the argument used for priority lookups: the word, the
    /// placeholder name, or the automatic label text.
    #[must_use]
    pub fn argument(&self) -> String {
        match self {
            Self::Word(text) | Self::Matching(text) => text.clone(),
            Self::Automatic(label) => label.to_string(),
        }
    }

    /// Returns true for automatic connections.
    #[must_use]
    pub const fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic(_))
    }
}

impl fmt::Display for ConnectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(text) => write!(f, "{text}"),
            Self::Matching(name) => write!(f, "<{name}>"),
            Self::Automatic(label) => write!(f, "({label})"),
        }
    }
}

/// A single-step transition between states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    /// What this connection matches.
    pub label: ConnectionLabel,
    /// Capture name stamped by a `name=` component.
    pub name: Option<String>,
    /// Static priority.
    pub priority: i32,
    /// Destination state.
    pub destination: StateId,
}

impl Connection {
    fn describe(&self, from: StateId) -> String {
        match &self.name {
            Some(name) => format!("{from} -{name}={}-> {}", self.label, self.destination),
            None => format!("{from} -{}-> {}", self.label, self.destination),
        }
    }
}

/// A state and its outgoing connections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    /// Arena id.
    pub id: StateId,
    /// Whether reaching this state accepts a command or namespace.
    pub is_final: bool,
    /// Outgoing connections in insertion order.
    pub connections: Vec<Connection>,
}

/// Arena of states forming a nondeterministic matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateGraph {
    states: Vec<State>,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// Creates a graph holding only the initial state.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = Self { states: Vec::new() };
        graph.add_state(false);
        graph
    }

    /// Returns the initial state id.
    #[must_use]
    pub const fn initial(&self) -> StateId {
        StateId::INITIAL
    }

    /// Adds a new state.
    pub fn add_state(&mut self, is_final: bool) -> StateId {
        let id = StateId::new(self.states.len());
        self.states.push(State {
            id,
            is_final,
            connections: Vec::new(),
        });
        id
    }

    /// Returns a state by id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this graph.
    #[must_use]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    /// Returns all states in arena order.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the graph holds only the initial state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.len() == 1 && self.states[0].connections.is_empty()
    }

    /// Total number of connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.states.iter().map(|s| s.connections.len()).sum()
    }

    /// Adds a word or placeholder connection from `from`, reusing an existing
    /// one with the same label and name. Returns the destination.
    ///
    /// Automatic labels always get a fresh destination.
    ///
    /// # Errors
    /// Returns a matcher error if the connection already exists with a
    /// different priority.
    pub fn connect(
        &mut self,
        from: StateId,
        label: ConnectionLabel,
        name: Option<&str>,
        priority: i32,
    ) -> Result<StateId> {
        if !label.is_automatic() {
            let existing = self.states[from.index()]
                .connections
                .iter()
                .find(|c| c.label == label && c.name.as_deref() == name);
            if let Some(existing) = existing {
                if existing.priority != priority {
                    return Err(Error::matcher_conflict(
                        existing.describe(from),
                        existing.priority,
                        priority,
                    ));
                }
                return Ok(existing.destination);
            }
        }
        let destination = self.add_state(false);
        self.push(from, label, name, priority, destination);
        Ok(destination)
    }

    /// Adds a connection from `from` to an existing `destination`.
    ///
    /// Adding an identical connection again is a no-op.
    ///
    /// # Errors
    /// Returns a matcher error if the connection already exists with a
    /// different priority.
    pub fn connect_to(
        &mut self,
        from: StateId,
        label: ConnectionLabel,
        name: Option<&str>,
        priority: i32,
        destination: StateId,
    ) -> Result<()> {
        let existing = self.states[from.index()].connections.iter().find(|c| {
            c.label == label && c.name.as_deref() == name && c.destination == destination
        });
        match existing {
            Some(existing) if existing.priority != priority => Err(Error::matcher_conflict(
                existing.describe(from),
                existing.priority,
                priority,
            )),
            Some(_) => Ok(()),
            None => {
                self.push(from, label, name, priority, destination);
                Ok(())
            }
        }
    }

    fn push(
        &mut self,
        from: StateId,
        label: ConnectionLabel,
        name: Option<&str>,
        priority: i32,
        destination: StateId,
    ) {
        self.push_raw(from, label, name.map(str::to_string), priority, destination);
    }

    /// Appends a connection without any merging.
    pub(crate) fn push_raw(
        &mut self,
        from: StateId,
        label: ConnectionLabel,
        name: Option<String>,
        priority: i32,
        destination: StateId,
    ) {
        self.states[from.index()].connections.push(Connection {
            label,
            name,
            priority,
            destination,
        });
    }

    /// Returns a canonical listing of every reachable connection.
    ///
    /// States are identified by a label path from the initial state rather
    /// than by arena id, so two graphs holding the same connections compare
    /// equal regardless of the order they were built in. Lines are sorted.
    #[must_use]
    pub fn trace(&self) -> Vec<String> {
        let signatures = self.signatures();
        let mut lines = Vec::new();
        for state in &self.states {
            let Some(from) = signatures.get(&state.id) else {
                continue;
            };
            for connection in &state.connections {
                let to = &signatures[&connection.destination];
                let name = connection
                    .name
                    .as_deref()
                    .map(|n| format!("{n}="))
                    .unwrap_or_default();
                let accept = if self.state(connection.destination).is_final {
                    " *"
                } else {
                    ""
                };
                lines.push(format!(
                    "[{from}] {name}{}@{} -> [{to}]{accept}",
                    connection.label, connection.priority
                ));
            }
        }
        lines.sort();
        lines
    }

    /// Breadth-first signatures: the smallest label path among parents in
    /// the previous layer.
    fn signatures(&self) -> HashMap<StateId, String> {
        let mut signatures = HashMap::new();
        signatures.insert(self.initial(), String::new());
        let mut layer = vec![self.initial()];
        while !layer.is_empty() {
            let mut candidates: HashMap<StateId, String> = HashMap::new();
            for id in &layer {
                let base = &signatures[id];
                for connection in &self.state(*id).connections {
                    if signatures.contains_key(&connection.destination) {
                        continue;
                    }
                    let name = connection.name.as_deref().unwrap_or("");
                    let candidate = format!("{base}/{name}{}", connection.label);
                    match candidates.entry(connection.destination) {
                        Entry::Occupied(mut entry) => {
                            if candidate < *entry.get() {
                                entry.insert(candidate);
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(candidate);
                        }
                    }
                }
            }
            let mut next: Vec<StateId> = candidates.keys().copied().collect();
            next.sort();
            signatures.extend(candidates);
            layer = next;
        }
        signatures
    }

    /// Returns states reachable from the initial state, in breadth-first order.
    #[must_use]
    pub fn reachable(&self) -> Vec<StateId> {
        let mut seen = vec![false; self.states.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([self.initial()]);
        seen[0] = true;
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for connection in &self.state(id).connections {
                let index = connection.destination.index();
                if !seen[index] {
                    seen[index] = true;
                    queue.push_back(connection.destination);
                }
            }
        }
        order
    }
}
