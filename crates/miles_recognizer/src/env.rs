//! Everything a recognition needs besides the matcher itself.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use miles_matcher::{DynamicPriorityRule, DynamicRuleSet, PriorityManager};

use crate::analyzer::{Analyzer, ExactWordFactory, WordAnalyzerFactory};
use crate::certainty::{CertaintyEffect, SortByCertainty};
use crate::config::RecognizerConfig;

/// The analyzers, priorities and policies of one namespace.
///
/// Built during registration and read-only afterwards. Cloning is cheap;
/// analyzers and policies are shared.
#[derive(Clone)]
pub struct Environment {
    matchings: HashMap<String, Arc<dyn Analyzer>>,
    word_factory: Arc<dyn WordAnalyzerFactory>,
    priorities: PriorityManager,
    dynamic_rules: DynamicRuleSet,
    certainty_effect: Arc<dyn CertaintyEffect>,
    config: RecognizerConfig,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment with exact word matching, neutral priorities
    /// and [`SortByCertainty`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            matchings: HashMap::new(),
            word_factory: Arc::new(ExactWordFactory),
            priorities: PriorityManager::new(),
            dynamic_rules: DynamicRuleSet::new(),
            certainty_effect: Arc::new(SortByCertainty),
            config: RecognizerConfig::default(),
        }
    }

    /// Binds an analyzer to a placeholder name.
    #[must_use]
    pub fn with_matching(mut self, name: impl Into<String>, analyzer: impl Analyzer + 'static) -> Self {
        self.add_matching(name, Arc::new(analyzer));
        self
    }

    /// Sets the word analyzer factory.
    #[must_use]
    pub fn with_word_factory(mut self, factory: impl WordAnalyzerFactory + 'static) -> Self {
        self.set_word_factory(Arc::new(factory));
        self
    }

    /// Sets the static priority table.
    #[must_use]
    pub fn with_priorities(mut self, priorities: PriorityManager) -> Self {
        self.priorities = priorities;
        self
    }

    /// Adds a dynamic priority rule.
    #[must_use]
    pub fn with_dynamic_rule(mut self, rule: impl DynamicPriorityRule + 'static) -> Self {
        self.add_dynamic_rule(Arc::new(rule));
        self
    }

    /// Sets the certainty effect.
    #[must_use]
    pub fn with_certainty_effect(mut self, effect: impl CertaintyEffect + 'static) -> Self {
        self.set_certainty_effect(Arc::new(effect));
        self
    }

    /// Sets the recognizer configuration.
    #[must_use]
    pub fn with_config(mut self, config: RecognizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds an analyzer to a placeholder name, replacing any previous one.
    pub fn add_matching(&mut self, name: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        self.matchings.insert(name.into(), analyzer);
    }

    /// Sets the word analyzer factory.
    pub fn set_word_factory(&mut self, factory: Arc<dyn WordAnalyzerFactory>) {
        self.word_factory = factory;
    }

    /// Adds a dynamic priority rule.
    pub fn add_dynamic_rule(&mut self, rule: Arc<dyn DynamicPriorityRule>) {
        self.dynamic_rules.add(rule);
    }

    /// Sets the certainty effect.
    pub fn set_certainty_effect(&mut self, effect: Arc<dyn CertaintyEffect>) {
        self.certainty_effect = effect;
    }

    /// Mutable access to the static priority table.
    pub fn priorities_mut(&mut self) -> &mut PriorityManager {
        &mut self.priorities
    }

    /// Sets the recognizer configuration.
    pub fn set_config(&mut self, config: RecognizerConfig) {
        self.config = config;
    }

    /// The analyzer bound to a placeholder.
    #[must_use]
    pub fn matching(&self, name: &str) -> Option<&Arc<dyn Analyzer>> {
        self.matchings.get(name)
    }

    /// Returns true if a placeholder has an analyzer.
    #[must_use]
    pub fn has_matching(&self, name: &str) -> bool {
        self.matchings.contains_key(name)
    }

    /// Builds the analyzer for a literal word.
    #[must_use]
    pub fn word_analyzer(&self, word: &str) -> Box<dyn Analyzer> {
        self.word_factory.build(word)
    }

    /// The static priority table.
    #[must_use]
    pub fn priorities(&self) -> &PriorityManager {
        &self.priorities
    }

    /// The dynamic priority rules.
    #[must_use]
    pub fn dynamic_rules(&self) -> &DynamicRuleSet {
        &self.dynamic_rules
    }

    /// The certainty effect.
    #[must_use]
    pub fn certainty_effect(&self) -> &dyn CertaintyEffect {
        self.certainty_effect.as_ref()
    }

    /// The recognizer configuration.
    #[must_use]
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut matchings: Vec<&String> = self.matchings.keys().collect();
        matchings.sort();
        f.debug_struct("Environment")
            .field("matchings", &matchings)
            .field("priorities", &self.priorities)
            .field("dynamic_rules", &self.dynamic_rules)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
