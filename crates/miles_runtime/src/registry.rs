//! Plugin, namespace and command registration.
//!
//! Registration happens once, before any recognition:
//!
//! ```text
//! Registry ── create_plugin ──▶ PluginBuilder ── add_namespace ──▶ NamespaceBuilder
//!                                                                   ├─ add_command
//!                                                                   ├─ add_matching
//!                                                                   └─ priorities, policies
//! Registry::build ──▶ MatchingCore (read-only)
//! ```
//!
//! Grammars are parsed as they are added, so syntax errors surface at the
//! call that introduced them. Placeholder bindings are checked by
//! [`Registry::build`], once every analyzer has had a chance to register.

use std::sync::Arc;

use miles_foundation::{Error, ErrorContext, ErrorKind, Result};
use miles_grammar::{CommandComponent, parse_grammar};
use miles_matcher::{DynamicPriorityRule, MatcherCompiler, PriorityStrategy, StaticRule};
use miles_recognizer::{Analyzer, CertaintyEffect, Environment, Tokenizer, WordAnalyzerFactory};
use tracing::debug;

use crate::config::RegistryConfig;
use crate::core::{CompiledCommand, CompiledNamespace, MatchingCore};
use crate::executor::CommandExecutor;

pub(crate) struct CommandDef<C> {
    pub(crate) name: String,
    pub(crate) grammar: CommandComponent,
    pub(crate) executor: Option<Arc<dyn CommandExecutor<C>>>,
}

pub(crate) struct NamespaceDef<C> {
    pub(crate) identifier: String,
    pub(crate) plugin: String,
    pub(crate) prefix: Vec<String>,
    pub(crate) commands: Vec<CommandDef<C>>,
    pub(crate) env: Environment,
}

/// Collects plugins before they are compiled into a [`MatchingCore`].
///
/// `C` is the context type executors receive.
pub struct Registry<C> {
    config: RegistryConfig,
    plugins: Vec<String>,
    namespaces: Vec<NamespaceDef<C>>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Registry<C> {
    /// Creates an empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            plugins: Vec::new(),
            namespaces: Vec::new(),
        }
    }

    /// The registry configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a plugin.
    ///
    /// # Errors
    /// Returns [`ErrorKind::DuplicatePlugin`] if the name is taken.
    pub fn create_plugin(&mut self, name: impl Into<String>) -> Result<PluginBuilder<'_, C>> {
        let name = name.into();
        if self.plugins.contains(&name) {
            return Err(Error::new(ErrorKind::DuplicatePlugin(name)));
        }
        self.plugins.push(name.clone());
        Ok(PluginBuilder { registry: self, name })
    }

    /// Returns the builder of an already registered plugin.
    #[must_use]
    pub fn plugin(&mut self, name: &str) -> Option<PluginBuilder<'_, C>> {
        self.plugins.iter().any(|p| p == name).then(|| PluginBuilder {
            registry: self,
            name: name.to_string(),
        })
    }

    /// Registered plugin names, in registration order.
    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Registered namespace identifiers, in registration order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        self.namespaces.iter().map(|n| n.identifier.as_str()).collect()
    }

    /// Compiles every namespace and freezes the registry.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownMatching`] for a placeholder with no
    /// analyzer, or a matcher error for conflicting priorities.
    pub fn build(self) -> Result<MatchingCore<C>> {
        let prefixes: Vec<(&str, &[String])> = self
            .namespaces
            .iter()
            .map(|n| (n.identifier.as_str(), n.prefix.as_slice()))
            .collect();
        let graph = MatcherCompiler::namespace_graph(prefixes)?;
        let namespace_env = Environment::new().with_config(self.config.recognizer.clone());
        let namespace_matcher = MatcherCompiler::finish(&graph, namespace_env.priorities());

        let mut compiled = Vec::with_capacity(self.namespaces.len());
        for namespace in self.namespaces {
            compiled.push(compile_namespace(namespace)?);
        }

        debug!(namespaces = compiled.len(), "registry built");
        Ok(MatchingCore::new(namespace_matcher, namespace_env, compiled))
    }
}

fn compile_namespace<C>(namespace: NamespaceDef<C>) -> Result<CompiledNamespace<C>> {
    let context = || {
        ErrorContext::new()
            .with_plugin(namespace.plugin.clone())
            .with_namespace(namespace.identifier.clone())
    };
    for command in &namespace.commands {
        if let Some(missing) = command
            .grammar
            .placeholders()
            .into_iter()
            .find(|p| !namespace.env.has_matching(p))
        {
            return Err(Error::new(ErrorKind::UnknownMatching(missing))
                .with_context(context().with_command(command.name.clone())));
        }
    }

    let graph = MatcherCompiler::command_graph(
        namespace.commands.iter().map(|c| (c.name.as_str(), &c.grammar)),
        namespace.env.priorities(),
    )
    .map_err(|e| e.with_context(context()))?;
    let matcher = MatcherCompiler::finish(&graph, namespace.env.priorities());
    debug!(
        namespace = %namespace.identifier,
        commands = namespace.commands.len(),
        states = matcher.len(),
        connections = matcher.connection_count(),
        "compiled namespace"
    );

    let commands = namespace
        .commands
        .into_iter()
        .map(|c| CompiledCommand {
            name: c.name,
            executor: c.executor,
        })
        .collect();
    Ok(CompiledNamespace {
        identifier: namespace.identifier,
        plugin: namespace.plugin,
        prefix: namespace.prefix,
        env: namespace.env,
        matcher,
        commands,
    })
}

/// Handle for adding namespaces to one plugin.
pub struct PluginBuilder<'r, C> {
    registry: &'r mut Registry<C>,
    name: String,
}

impl<C> PluginBuilder<'_, C> {
    /// The plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a namespace selected by the words of `prefix`.
    ///
    /// `prefix` is tokenized like input, so `"n s p"` is three words.
    ///
    /// # Errors
    /// Returns [`ErrorKind::DuplicateNamespace`], [`ErrorKind::EmptyPrefix`],
    /// or [`ErrorKind::PrefixConflict`] when one namespace's prefix starts
    /// another's.
    pub fn add_namespace(&mut self, name: impl Into<String>, prefix: &str) -> Result<NamespaceBuilder<'_, C>> {
        let identifier = name.into();
        let context = ErrorContext::new()
            .with_plugin(self.name.clone())
            .with_namespace(identifier.clone());
        let registry = &mut *self.registry;

        if registry.namespaces.iter().any(|n| n.identifier == identifier) {
            return Err(Error::new(ErrorKind::DuplicateNamespace(identifier)).with_context(context));
        }
        let words: Vec<String> = Tokenizer::tokenize(prefix)
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            return Err(Error::new(ErrorKind::EmptyPrefix(identifier)).with_context(context));
        }
        if let Some(existing) = registry
            .namespaces
            .iter()
            .find(|n| n.prefix.starts_with(&words) || words.starts_with(&n.prefix))
        {
            return Err(Error::new(ErrorKind::PrefixConflict {
                existing: existing.prefix.join(" "),
                requested: words.join(" "),
            })
            .with_context(context));
        }

        let config = &registry.config;
        let env = Environment::new()
            .with_priorities(config.namespace.priorities())
            .with_config(config.recognizer.clone());
        registry.namespaces.push(NamespaceDef {
            identifier,
            plugin: self.name.clone(),
            prefix: words,
            commands: Vec::new(),
            env,
        });
        let index = registry.namespaces.len() - 1;
        Ok(NamespaceBuilder {
            namespace: &mut registry.namespaces[index],
        })
    }

    /// Returns the builder of a namespace of this plugin.
    #[must_use]
    pub fn namespace(&mut self, identifier: &str) -> Option<NamespaceBuilder<'_, C>> {
        let plugin = self.name.as_str();
        self.registry
            .namespaces
            .iter_mut()
            .find(|n| n.identifier == identifier && n.plugin == plugin)
            .map(|namespace| NamespaceBuilder { namespace })
    }
}

/// Handle for adding commands, analyzers and policies to one namespace.
pub struct NamespaceBuilder<'r, C> {
    namespace: &'r mut NamespaceDef<C>,
}

impl<C> NamespaceBuilder<'_, C> {
    /// The namespace identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.namespace.identifier
    }

    /// The namespace's prefix words.
    #[must_use]
    pub fn prefix(&self) -> &[String] {
        &self.namespace.prefix
    }

    /// Adds a command with an executor.
    ///
    /// # Errors
    /// Returns a grammar syntax error, or [`ErrorKind::DuplicateCommand`].
    pub fn add_command(
        &mut self,
        name: impl Into<String>,
        syntax: &str,
        executor: impl CommandExecutor<C> + 'static,
    ) -> Result<&mut Self> {
        self.push_command(name.into(), syntax, Some(Arc::new(executor)))
    }

    /// Adds a command that can be recognized but not executed.
    ///
    /// # Errors
    /// Returns a grammar syntax error, or [`ErrorKind::DuplicateCommand`].
    pub fn add_grammar(&mut self, name: impl Into<String>, syntax: &str) -> Result<&mut Self> {
        self.push_command(name.into(), syntax, None)
    }

    fn push_command(
        &mut self,
        name: String,
        syntax: &str,
        executor: Option<Arc<dyn CommandExecutor<C>>>,
    ) -> Result<&mut Self> {
        let context = || {
            ErrorContext::new()
                .with_plugin(self.namespace.plugin.clone())
                .with_namespace(self.namespace.identifier.clone())
                .with_command(name.clone())
        };
        if self.namespace.commands.iter().any(|c| c.name == name) {
            return Err(Error::new(ErrorKind::DuplicateCommand(name.clone())).with_context(context()));
        }
        let grammar = parse_grammar(syntax).map_err(|e| e.with_context(context()))?;
        self.namespace.commands.push(CommandDef {
            name,
            grammar,
            executor,
        });
        Ok(self)
    }

    /// Binds an analyzer to a placeholder name.
    pub fn add_matching(&mut self, name: impl Into<String>, analyzer: impl Analyzer + 'static) -> &mut Self {
        self.namespace.env.add_matching(name, Arc::new(analyzer));
        self
    }

    /// Adds a static priority rule.
    pub fn add_static_priority_rule(&mut self, rule: StaticRule) -> &mut Self {
        self.namespace.env.priorities_mut().apply(rule);
        self
    }

    /// Adds a dynamic priority rule.
    pub fn add_dynamic_priority_rule(&mut self, rule: impl DynamicPriorityRule + 'static) -> &mut Self {
        self.namespace.env.add_dynamic_rule(Arc::new(rule));
        self
    }

    /// Sets how composite connection priorities are folded.
    pub fn set_priority_strategy(&mut self, strategy: PriorityStrategy) -> &mut Self {
        self.namespace.env.priorities_mut().set_strategy(strategy);
        self
    }

    /// Sets the priority of nodes without a rule.
    pub fn set_default_priority(&mut self, priority: i32) -> &mut Self {
        self.namespace.env.priorities_mut().set_default_priority(priority);
        self
    }

    /// Replaces exact word comparison.
    pub fn set_word_analyzer_factory(&mut self, factory: impl WordAnalyzerFactory + 'static) -> &mut Self {
        self.namespace.env.set_word_factory(Arc::new(factory));
        self
    }

    /// Sets how same-priority candidates are resolved.
    pub fn set_certainty_effect(&mut self, effect: impl CertaintyEffect + 'static) -> &mut Self {
        self.namespace.env.set_certainty_effect(Arc::new(effect));
        self
    }

    /// The namespace environment as configured so far.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.namespace.env
    }
}
