//! Registry configuration.

use miles_matcher::{PriorityManager, PriorityStrategy};
use miles_recognizer::RecognizerConfig;

/// Defaults applied to every new namespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// How composite connection priorities are folded.
    pub strategy: PriorityStrategy,
    /// Priority of nodes without a rule.
    pub default_priority: i32,
}

impl NamespaceConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the priority strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: PriorityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the default priority.
    #[must_use]
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    /// A priority table seeded with these defaults.
    #[must_use]
    pub fn priorities(&self) -> PriorityManager {
        PriorityManager::new()
            .with_strategy(self.strategy)
            .with_default_priority(self.default_priority)
    }
}

/// Configuration for a whole [`Registry`](crate::Registry).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegistryConfig {
    /// Namespace defaults.
    pub namespace: NamespaceConfig,
    /// Recognizer settings shared by every namespace.
    pub recognizer: RecognizerConfig,
}

impl RegistryConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace defaults.
    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceConfig) -> Self {
        self.namespace = namespace;
        self
    }

    /// Sets the recognizer settings.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: RecognizerConfig) -> Self {
        self.recognizer = recognizer;
        self
    }
}
