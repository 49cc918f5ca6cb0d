//! The frozen, shareable recognition engine.

use std::sync::Arc;

use miles_foundation::{Error, ErrorContext, ErrorKind, Flags, Result};
use miles_matcher::NormalizedMatcher;
use miles_recognizer::{
    CommandStructure, Environment, ExtendedGrammar, NamespaceStructure, Recognizer, StructureBuilder,
    Tokenizer,
};
use tracing::debug;

use crate::executor::CommandExecutor;

pub(crate) struct CompiledCommand<C> {
    pub(crate) name: String,
    pub(crate) executor: Option<Arc<dyn CommandExecutor<C>>>,
}

pub(crate) struct CompiledNamespace<C> {
    pub(crate) identifier: String,
    pub(crate) plugin: String,
    pub(crate) prefix: Vec<String>,
    pub(crate) env: Environment,
    pub(crate) matcher: NormalizedMatcher,
    pub(crate) commands: Vec<CompiledCommand<C>>,
}

/// Recognizes text against every registered namespace and dispatches to
/// executors.
///
/// Built by [`Registry::build`](crate::Registry::build) and read-only
/// afterwards; recognitions share nothing mutable and can run concurrently.
pub struct MatchingCore<C> {
    namespace_matcher: NormalizedMatcher,
    namespace_env: Environment,
    namespaces: Vec<CompiledNamespace<C>>,
}

impl<C> MatchingCore<C> {
    pub(crate) fn new(
        namespace_matcher: NormalizedMatcher,
        namespace_env: Environment,
        namespaces: Vec<CompiledNamespace<C>>,
    ) -> Self {
        Self {
            namespace_matcher,
            namespace_env,
            namespaces,
        }
    }

    /// Splits text into tokens.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        Tokenizer::tokenize(text)
    }

    /// Namespace identifiers with their prefix words, in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.namespaces
            .iter()
            .map(|n| (n.identifier.as_str(), n.prefix.as_slice()))
    }

    /// The environment of a namespace.
    #[must_use]
    pub fn environment(&self, namespace: &str) -> Option<&Environment> {
        self.find(namespace).map(|n| &n.env)
    }

    /// Every literal word used by the grammars and namespace prefixes, in
    /// lowercase. Useful for completion.
    #[must_use]
    pub fn vocabulary(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .namespaces
            .iter()
            .flat_map(|n| {
                n.prefix.iter().cloned().chain(
                    n.matcher
                        .states()
                        .iter()
                        .flat_map(|s| s.connections.iter())
                        .flat_map(|c| c.nodes.iter())
                        .filter_map(|node| match &node.label {
                            miles_matcher::ConnectionLabel::Word(w) => Some(w.to_lowercase()),
                            _ => None,
                        }),
                )
            })
            .collect();
        words.sort();
        words.dedup();
        words
    }

    fn find(&self, identifier: &str) -> Option<&CompiledNamespace<C>> {
        self.namespaces.iter().find(|n| n.identifier == identifier)
    }

    /// Recognizes `text`.
    ///
    /// Without `namespace`, the leading words select the namespace and the
    /// command grammar starts after them. With `namespace`, the whole text is
    /// the command.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownNamespace`] or a recognizer error.
    pub fn recognize(&self, text: &str, namespace: Option<&str>, flags: &Flags) -> Result<CommandStructure> {
        let tokens = self.tokenize(text);
        self.recognize_tokens(&tokens, namespace, flags)
    }

    /// Recognizes pre-tokenized input. See [`MatchingCore::recognize`].
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownNamespace`] or a recognizer error.
    pub fn recognize_tokens(
        &self,
        tokens: &[String],
        namespace: Option<&str>,
        flags: &Flags,
    ) -> Result<CommandStructure> {
        let (compiled, start) = match namespace {
            Some(identifier) => {
                let compiled = self
                    .find(identifier)
                    .ok_or_else(|| Error::new(ErrorKind::UnknownNamespace(identifier.to_string())))?;
                (compiled, 0)
            }
            None => {
                let pointer = Recognizer::new(&self.namespace_matcher, &self.namespace_env)
                    .recognize_namespace(tokens, flags)?;
                let identifier = pointer.recognized().unwrap_or_default();
                let compiled = self
                    .find(identifier)
                    .ok_or_else(|| Error::new(ErrorKind::UnknownNamespace(identifier.to_string())))?;
                (compiled, pointer.position())
            }
        };

        let context = || ErrorContext::new().with_plugin(compiled.plugin.clone()).with_namespace(compiled.identifier.clone());
        let pointer = Recognizer::new(&compiled.matcher, &compiled.env)
            .recognize(tokens, start, flags)
            .map_err(|e| e.with_context(context()))?;
        let namespace = NamespaceStructure::new(compiled.identifier.clone(), tokens[..start].to_vec());
        let structure = StructureBuilder::build(&pointer, tokens, namespace);
        debug!(
            namespace = %compiled.identifier,
            command = structure.command_name(),
            certainty = structure.certainty(),
            "command recognized"
        );
        Ok(structure)
    }

    /// Recognizes `text` and runs the command's executor with `context`.
    /// Returns the structure the executor saw.
    ///
    /// # Errors
    /// Returns a recognition error, [`ErrorKind::MissingExecutor`], or the
    /// executor's own error wrapped in [`ErrorKind::Executor`].
    pub fn recognize_and_execute(
        &self,
        text: &str,
        namespace: Option<&str>,
        context: &mut C,
        flags: &Flags,
    ) -> Result<CommandStructure> {
        let structure = self.recognize(text, namespace, flags)?;
        self.execute(&structure, context)?;
        Ok(structure)
    }

    /// Runs the executor bound to an already recognized command.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownNamespace`], [`ErrorKind::MissingExecutor`],
    /// or the executor's error wrapped in [`ErrorKind::Executor`].
    pub fn execute(&self, structure: &CommandStructure, context: &mut C) -> Result<()> {
        let identifier = &structure.namespace().identifier;
        let compiled = self
            .find(identifier)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNamespace(identifier.clone())))?;
        let name = structure.command_name();
        let executor = compiled
            .commands
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.executor.as_ref())
            .ok_or_else(|| {
                Error::new(ErrorKind::MissingExecutor(name.to_string())).with_context(
                    ErrorContext::new()
                        .with_plugin(compiled.plugin.clone())
                        .with_namespace(identifier.clone()),
                )
            })?;
        debug!(namespace = %identifier, command = name, "executing command");
        executor.execute(structure, context).map_err(Error::executor)
    }

    /// Recognizes `grammar` as a prefix of `text` with a namespace's
    /// analyzers.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownNamespace`], or the grammar's compile or
    /// search error (such as [`ErrorKind::UnknownMatching`]) with the
    /// namespace attached.
    pub fn recognize_extended(
        &self,
        grammar: &ExtendedGrammar,
        text: &str,
        namespace: &str,
        flags: &Flags,
    ) -> Result<Vec<CommandStructure>> {
        let compiled = self
            .find(namespace)
            .ok_or_else(|| Error::new(ErrorKind::UnknownNamespace(namespace.to_string())))?;
        let tokens = self.tokenize(text);
        grammar
            .recognize_prefixes(&compiled.env, &tokens, 0, flags)
            .map_err(|e| {
                e.with_context(
                    ErrorContext::new()
                        .with_plugin(compiled.plugin.clone())
                        .with_namespace(namespace),
                )
            })
    }
}

impl<C> std::fmt::Debug for MatchingCore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingCore")
            .field("namespaces", &self.namespaces().map(|(id, _)| id).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
