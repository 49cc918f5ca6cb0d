//! Temporary sub-grammars recognized from inside an analyzer.
//!
//! An [`ExtendedGrammar`] is a small set of commands compiled on demand
//! against the calling namespace's environment. Recognition collects every
//! command that matches a prefix of the remaining input, so the calling
//! analyzer can offer each of them as a candidate. Grammars may refer to
//! placeholders whose analyzers recognize the same grammar again; the
//! `(title, position)` guard carried by the search stops a grammar from
//! re-entering itself without consuming input.

use std::fmt;
use std::sync::Arc;

use miles_foundation::{Flags, Result, Value};
use miles_grammar::{CommandComponent, parse_grammar};
use miles_matcher::{MatcherCompiler, NormalizedMatcher};
use tracing::debug;

use crate::analyzer::Analyzer;
use crate::context::{Guards, MatchContext};
use crate::env::Environment;
use crate::recognizer::Recognizer;
use crate::structure::{CommandStructure, NamespaceStructure, StructureBuilder};

/// A named set of commands recognized as a prefix of the input.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedGrammar {
    title: String,
    commands: Vec<(String, CommandComponent)>,
}

impl ExtendedGrammar {
    /// Creates an empty grammar.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            commands: Vec::new(),
        }
    }

    /// Adds a command parsed from grammar text.
    ///
    /// # Errors
    /// Returns a grammar syntax error if `syntax` is malformed.
    pub fn command(mut self, name: impl Into<String>, syntax: &str) -> Result<Self> {
        let grammar = parse_grammar(syntax)?;
        self.commands.push((name.into(), grammar));
        Ok(self)
    }

    /// Adds an already-parsed command.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, grammar: CommandComponent) -> Self {
        self.commands.push((name.into(), grammar));
        self
    }

    /// The grammar's title, which is also its recursion guard key.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The commands, in insertion order.
    #[must_use]
    pub fn commands(&self) -> &[(String, CommandComponent)] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if the grammar has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Compiles the commands with `env`'s priorities.
    ///
    /// # Errors
    /// Returns a matcher error on conflicting connection priorities.
    pub fn compile(&self, env: &Environment) -> Result<NormalizedMatcher> {
        let commands = self.commands.iter().map(|(name, grammar)| (name.as_str(), grammar));
        let graph = MatcherCompiler::command_graph(commands, env.priorities())?;
        Ok(MatcherCompiler::finish(&graph, env.priorities()))
    }

    /// Every structure matching a prefix of `tokens[position..]`, in search
    /// order. Analyzers should use [`MatchContext::extended`] instead, which
    /// carries the recursion guard.
    ///
    /// # Errors
    /// Returns a matcher error if the commands do not compile, or
    /// [`miles_foundation::ErrorKind::UnknownMatching`] if the search reaches
    /// a placeholder `env` has no analyzer for.
    pub fn recognize_prefixes(
        &self,
        env: &Environment,
        tokens: &[String],
        position: usize,
        flags: &Flags,
    ) -> Result<Vec<CommandStructure>> {
        let guards = Guards::unit((self.title.clone(), position));
        self.recognize(env, tokens, position, flags, guards)
    }

    pub(crate) fn recognize(
        &self,
        env: &Environment,
        tokens: &[String],
        position: usize,
        flags: &Flags,
        guards: Guards,
    ) -> Result<Vec<CommandStructure>> {
        let matcher = self.compile(env)?;
        let namespace = NamespaceStructure::new(self.title.clone(), Vec::new());
        let structures: Vec<CommandStructure> = Recognizer::new(&matcher, env)
            .recognize_prefix(tokens, position, flags, guards)?
            .iter()
            .map(|pointer| StructureBuilder::build(pointer, tokens, namespace.clone()))
            .collect();
        debug!(grammar = %self.title, position, found = structures.len(), "extended grammar recognized");
        Ok(structures)
    }
}

type ResultMapper = Arc<dyn Fn(&CommandStructure) -> Value + Send + Sync>;

/// Analyzer offering every prefix match of an [`ExtendedGrammar`].
///
/// Each structure becomes one candidate spanning the structure's tokens,
/// with the structure's certainty. The candidate's result is the structure
/// itself, or whatever the mapper builds from it.
#[derive(Clone)]
pub struct ExtendedAnalyzer {
    grammar: ExtendedGrammar,
    mapper: Option<ResultMapper>,
}

impl ExtendedAnalyzer {
    /// Creates an analyzer for `grammar`.
    #[must_use]
    pub fn new(grammar: ExtendedGrammar) -> Self {
        Self { grammar, mapper: None }
    }

    /// Builds each candidate's result with `mapper`.
    #[must_use]
    pub fn with_result<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&CommandStructure) -> Value + Send + Sync + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// The grammar.
    #[must_use]
    pub fn grammar(&self) -> &ExtendedGrammar {
        &self.grammar
    }
}

impl Analyzer for ExtendedAnalyzer {
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        let structures = match ctx.extended(&self.grammar) {
            Ok(structures) => structures,
            Err(err) => {
                ctx.fail_with(err);
                return;
            }
        };
        for structure in structures {
            let result = match &self.mapper {
                Some(mapper) => mapper(&structure),
                None => Value::opaque(structure.clone()),
            };
            ctx.set_result(result);
            ctx.variant(structure.size(), structure.certainty());
        }
    }
}

impl fmt::Debug for ExtendedAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedAnalyzer")
            .field("grammar", &self.grammar.title)
            .field("mapped", &self.mapper.is_some())
            .finish()
    }
}
