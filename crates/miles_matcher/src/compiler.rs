//! Compiles grammar trees into state graphs.
//!
//! Each component is compiled by a recursive function that takes the state
//! the component starts from and returns the state it exits through. The
//! graph and priority table travel in a [`CompilerState`].
//!
//! | Component  | Edges added                                                    |
//! |------------|----------------------------------------------------------------|
//! | `WORD`     | word edge to a new or merged state                             |
//! | `name`     | placeholder edge to a new or merged state                      |
//! | `{...}`    | `skip optional` and `begin optional`, body, `end optional`     |
//! | `[...]`    | `begin list`, body, `repeat list` back, `end list` out         |
//! | `(a, b)`   | `begin choice`, `option N` per body, `end choice` to one exit  |
//! | root       | body, then `recognize <command>` into a final state            |

use miles_foundation::{Error, ErrorKind, Result};
use miles_grammar::CommandComponent;
use tracing::debug;

use crate::graph::{AutoLabel, ConnectionLabel, StateGraph, StateId};
use crate::normalized::NormalizedMatcher;
use crate::normalizer::Normalizer;
use crate::priority::{PriorityAssigner, PriorityManager};

/// Compiles grammars and namespace prefixes into matchers.
pub struct MatcherCompiler;

/// Mutable compilation state threaded through the recursive walk.
struct CompilerState<'a> {
    graph: &'a mut StateGraph,
    priorities: &'a PriorityManager,
}

impl CompilerState<'_> {
    fn priority(&self, label: &ConnectionLabel, name: Option<&str>) -> i32 {
        self.priorities
            .node_priority(label.kind(), &label.argument(), name)
    }

    /// Adds an edge to a new (or, for words and placeholders, merged) state.
    fn step(&mut self, from: StateId, label: ConnectionLabel, name: Option<&str>) -> Result<StateId> {
        let priority = self.priority(&label, name);
        self.graph.connect(from, label, name, priority)
    }

    /// Adds an automatic edge to an existing state.
    fn link(&mut self, from: StateId, label: AutoLabel, name: Option<&str>, to: StateId) -> Result<()> {
        let label = ConnectionLabel::Automatic(label);
        let priority = self.priority(&label, name);
        self.graph.connect_to(from, label, name, priority, to)
    }

    fn visit(
        &mut self,
        component: &CommandComponent,
        from: StateId,
        name: Option<&str>,
    ) -> Result<StateId> {
        match component {
            CommandComponent::Word(text) => {
                self.step(from, ConnectionLabel::Word(text.to_uppercase()), name)
            }
            CommandComponent::Matching(placeholder) => {
                self.step(from, ConnectionLabel::Matching(placeholder.clone()), name)
            }
            CommandComponent::Named(inner_name, inner) => self.visit(inner, from, Some(inner_name)),
            CommandComponent::Sequence(children) => {
                let mut cursor = from;
                for (i, child) in children.iter().enumerate() {
                    cursor = self.visit(child, cursor, if i == 0 { name } else { None })?;
                }
                Ok(cursor)
            }
            CommandComponent::Optional(inner) => {
                let end = self.graph.add_state(false);
                self.link(from, AutoLabel::SkipOptional, name, end)?;
                let begin = self.step(from, ConnectionLabel::Automatic(AutoLabel::BeginOptional), name)?;
                let exit = self.visit(inner, begin, None)?;
                self.link(exit, AutoLabel::EndOptional, name, end)?;
                Ok(end)
            }
            CommandComponent::List(inner) => {
                let begin = self.step(from, ConnectionLabel::Automatic(AutoLabel::BeginList), name)?;
                let exit = self.visit(inner, begin, None)?;
                self.link(exit, AutoLabel::RepeatList, name, begin)?;
                self.step(exit, ConnectionLabel::Automatic(AutoLabel::EndList), name)
            }
            CommandComponent::Choice(options) => {
                let begin = self.step(from, ConnectionLabel::Automatic(AutoLabel::BeginChoice), name)?;
                let end = self.graph.add_state(false);
                for (index, option) in options.iter().enumerate() {
                    let start =
                        self.step(begin, ConnectionLabel::Automatic(AutoLabel::Option(index)), name)?;
                    let exit = self.visit(option, start, None)?;
                    self.link(exit, AutoLabel::EndChoice, name, end)?;
                }
                Ok(end)
            }
            CommandComponent::Root(inner) => self.visit(inner, from, name),
        }
    }

    /// Adds `recognize <target>` into a new final state.
    fn accept(&mut self, from: StateId, target: &str) -> Result<StateId> {
        let accepted = self.graph.add_state(true);
        self.link(from, AutoLabel::Recognize(target.to_string()), None, accepted)?;
        Ok(accepted)
    }
}

impl MatcherCompiler {
    /// Adds one command to `graph`, starting at the initial state.
    /// Returns the command's final state.
    ///
    /// # Errors
    /// Returns a matcher error on conflicting connection priorities.
    pub fn compile_command(
        graph: &mut StateGraph,
        command: &str,
        grammar: &CommandComponent,
        priorities: &PriorityManager,
    ) -> Result<StateId> {
        let mut state = CompilerState { graph, priorities };
        let initial = state.graph.initial();
        let exit = state.visit(grammar, initial, None)?;
        state.accept(exit, command)
    }

    /// Adds one namespace prefix to `graph` as a chain of words.
    /// Returns the namespace's final state.
    ///
    /// # Errors
    /// Returns an error if `prefix` is empty or priorities conflict.
    pub fn compile_namespace(
        graph: &mut StateGraph,
        namespace: &str,
        prefix: &[String],
        priorities: &PriorityManager,
    ) -> Result<StateId> {
        if prefix.is_empty() {
            return Err(Error::new(ErrorKind::EmptyPrefix(namespace.to_string())));
        }
        let mut state = CompilerState { graph, priorities };
        let mut cursor = state.graph.initial();
        for word in prefix {
            cursor = state.step(cursor, ConnectionLabel::Word(word.to_uppercase()), None)?;
        }
        state.accept(cursor, namespace)
    }

    /// Compiles every command of a namespace into one graph.
    ///
    /// # Errors
    /// Returns a matcher error on conflicting connection priorities.
    pub fn command_graph<'a, I>(commands: I, priorities: &PriorityManager) -> Result<StateGraph>
    where
        I: IntoIterator<Item = (&'a str, &'a CommandComponent)>,
    {
        let mut graph = StateGraph::new();
        for (name, grammar) in commands {
            Self::compile_command(&mut graph, name, grammar, priorities)?;
        }
        debug!(
            states = graph.len(),
            connections = graph.connection_count(),
            "compiled command graph"
        );
        Ok(graph)
    }

    /// Compiles namespace prefixes into one graph.
    ///
    /// # Errors
    /// Returns an error if a prefix is empty.
    pub fn namespace_graph<'a, I>(namespaces: I) -> Result<StateGraph>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let priorities = PriorityManager::new();
        let mut graph = StateGraph::new();
        for (name, prefix) in namespaces {
            Self::compile_namespace(&mut graph, name, prefix, &priorities)?;
        }
        debug!(states = graph.len(), "compiled namespace graph");
        Ok(graph)
    }

    /// Normalizes `graph` and assigns static priorities.
    #[must_use]
    pub fn finish(graph: &StateGraph, priorities: &PriorityManager) -> NormalizedMatcher {
        let mut matcher = Normalizer::normalize(graph);
        PriorityAssigner::assign(&mut matcher, priorities);
        matcher
    }
}
