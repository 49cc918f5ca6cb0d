//! Per-namespace static priority table.

use std::collections::HashMap;

use crate::graph::NodeKind;

use super::strategy::PriorityStrategy;

/// A static priority rule registered on a namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaticRule {
    /// Default priority of every word node.
    GeneralWord(i32),
    /// Default priority of every placeholder node.
    GeneralMatching(i32),
    /// Default priority of every automatic node.
    GeneralAutomatic(i32),
    /// Priority of one literal word (uppercase).
    SpecificWord(String, i32),
    /// Priority of one placeholder.
    SpecificMatching(String, i32),
    /// Priority of one automatic label, e.g. `"skip optional"`.
    SpecificAutomatic(String, i32),
    /// Priority of any node carrying this capture name.
    Named(String, i32),
}

/// Static priorities for one namespace.
///
/// A node's priority is its specific or named override (the larger of the
/// two when both exist), otherwise its category default, otherwise the
/// namespace default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityManager {
    default_priority: i32,
    strategy: PriorityStrategy,
    word: Option<i32>,
    matching: Option<i32>,
    automatic: Option<i32>,
    specific: HashMap<(NodeKind, String), i32>,
    named: HashMap<String, i32>,
}

impl Default for PriorityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityManager {
    /// Creates a manager where every node has priority 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_priority: 0,
            strategy: PriorityStrategy::default(),
            word: None,
            matching: None,
            automatic: None,
            specific: HashMap::new(),
            named: HashMap::new(),
        }
    }

    /// Sets the strategy used to fold node priorities.
    #[must_use]
    pub fn with_strategy(mut self, strategy: PriorityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the namespace default priority.
    #[must_use]
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    /// Sets the strategy used to fold node priorities.
    pub fn set_strategy(&mut self, strategy: PriorityStrategy) {
        self.strategy = strategy;
    }

    /// Sets the namespace default priority.
    pub fn set_default_priority(&mut self, priority: i32) {
        self.default_priority = priority;
    }

    /// Returns the folding strategy.
    #[must_use]
    pub const fn strategy(&self) -> PriorityStrategy {
        self.strategy
    }

    /// Returns the namespace default priority.
    #[must_use]
    pub const fn default_priority(&self) -> i32 {
        self.default_priority
    }

    /// Registers a static rule. Later rules replace earlier ones for the same key.
    pub fn apply(&mut self, rule: StaticRule) {
        match rule {
            StaticRule::GeneralWord(p) => self.word = Some(p),
            StaticRule::GeneralMatching(p) => self.matching = Some(p),
            StaticRule::GeneralAutomatic(p) => self.automatic = Some(p),
            StaticRule::SpecificWord(word, p) => {
                self.specific
                    .insert((NodeKind::Word, word.to_uppercase()), p);
            }
            StaticRule::SpecificMatching(name, p) => {
                self.specific.insert((NodeKind::Matching, name), p);
            }
            StaticRule::SpecificAutomatic(label, p) => {
                self.specific.insert((NodeKind::Automatic, label), p);
            }
            StaticRule::Named(name, p) => {
                self.named.insert(name, p);
            }
        }
    }

    /// Returns the static priority of one node.
    #[must_use]
    pub fn node_priority(&self, kind: NodeKind, argument: &str, name: Option<&str>) -> i32 {
        let specific = self.specific.get(&(kind, argument.to_string())).copied();
        let named = name.and_then(|n| self.named.get(n)).copied();
        match (specific, named) {
            (Some(a), Some(b)) => a.max(b),
            (Some(p), None) | (None, Some(p)) => p,
            (None, None) => self.category_default(kind),
        }
    }

    fn category_default(&self, kind: NodeKind) -> i32 {
        let category = match kind {
            NodeKind::Word => self.word,
            NodeKind::Matching => self.matching,
            NodeKind::Automatic => self.automatic,
        };
        category.unwrap_or(self.default_priority)
    }
}
