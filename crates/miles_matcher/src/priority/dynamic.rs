//! Context-sensitive priority rules evaluated during recognition.

use std::fmt;
use std::sync::Arc;

use miles_foundation::Flags;

use crate::graph::NodeKind;
use crate::normalized::NormalizedNode;

/// Read-only view handed to dynamic rules.
///
/// Describes the consuming node of a candidate connection and the input
/// remaining at the point the connection would be tried.
pub struct DynamicContext<'a> {
    tokens: &'a [String],
    position: usize,
    node: &'a NormalizedNode,
    static_priority: i32,
    flags: &'a Flags,
}

impl<'a> DynamicContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(
        tokens: &'a [String],
        position: usize,
        node: &'a NormalizedNode,
        static_priority: i32,
        flags: &'a Flags,
    ) -> Self {
        Self {
            tokens,
            position,
            node,
            static_priority,
            flags,
        }
    }

    /// All input tokens.
    #[must_use]
    pub fn tokens(&self) -> &'a [String] {
        self.tokens
    }

    /// Index of the next unconsumed token.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The next unconsumed token.
    #[must_use]
    pub fn current(&self) -> Option<&'a str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    /// Up to `n` tokens starting at the current one.
    #[must_use]
    pub fn lookahead(&self, n: usize) -> &'a [String] {
        let start = self.position.min(self.tokens.len());
        let end = (start + n).min(self.tokens.len());
        &self.tokens[start..end]
    }

    /// Number of unconsumed tokens.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    /// Kind of the node being ranked.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// The word, placeholder name, or automatic label of the node.
    #[must_use]
    pub fn argument(&self) -> String {
        self.node.argument()
    }

    /// Capture name of the node.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.node.name.as_deref()
    }

    /// Returns true if the node is a literal word.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.kind() == NodeKind::Word
    }

    /// Returns true if the node is a placeholder.
    #[must_use]
    pub fn is_matching(&self) -> bool {
        self.kind() == NodeKind::Matching
    }

    /// Returns true if the node is automatic.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        self.kind() == NodeKind::Automatic
    }

    /// The connection's static priority.
    #[must_use]
    pub fn static_priority(&self) -> i32 {
        self.static_priority
    }

    /// The caller's flag bag.
    #[must_use]
    pub fn flags(&self) -> &'a Flags {
        self.flags
    }
}

/// A rule that may override a connection's priority at search time.
pub trait DynamicPriorityRule: Send + Sync {
    /// Returns true if this rule has an opinion about the context.
    fn is_applicable(&self, ctx: &DynamicContext<'_>) -> bool;

    /// Returns the overriding priority.
    fn priority(&self, ctx: &DynamicContext<'_>) -> i32;

    /// Rules with lower order are consulted first.
    fn order(&self) -> i32 {
        0
    }
}

/// Ordered collection of dynamic rules.
///
/// The first applicable rule decides; with none applicable the static
/// priority stands.
#[derive(Clone, Default)]
pub struct DynamicRuleSet {
    rules: Vec<Arc<dyn DynamicPriorityRule>>,
}

impl DynamicRuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, keeping rules sorted by [`DynamicPriorityRule::order`].
    /// Rules of equal order keep insertion order.
    pub fn add(&mut self, rule: Arc<dyn DynamicPriorityRule>) {
        let position = self
            .rules
            .iter()
            .position(|r| r.order() > rule.order())
            .unwrap_or(self.rules.len());
        self.rules.insert(position, rule);
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Effective priority for the context.
    #[must_use]
    pub fn evaluate(&self, ctx: &DynamicContext<'_>) -> i32 {
        self.rules
            .iter()
            .find(|rule| rule.is_applicable(ctx))
            .map_or(ctx.static_priority(), |rule| rule.priority(ctx))
    }
}

impl fmt::Debug for DynamicRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicRuleSet")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Prefers words whose length matches the next token.
///
/// Priority is `base - |len(token) - len(word)|`, so with typo-tolerant word
/// analyzers an exact-length candidate is tried first.
#[derive(Clone, Debug)]
pub struct WordLengthRule {
    base: i32,
}

impl WordLengthRule {
    /// Creates the rule with the given base priority.
    #[must_use]
    pub const fn new(base: i32) -> Self {
        Self { base }
    }
}

impl Default for WordLengthRule {
    fn default() -> Self {
        Self::new(50)
    }
}

impl DynamicPriorityRule for WordLengthRule {
    fn is_applicable(&self, ctx: &DynamicContext<'_>) -> bool {
        ctx.is_word() && ctx.current().is_some()
    }

    fn priority(&self, ctx: &DynamicContext<'_>) -> i32 {
        let token = ctx.current().map_or(0, |t| t.chars().count());
        let word = ctx.argument().chars().count();
        let distance = i32::try_from(token.abs_diff(word)).unwrap_or(i32::MAX);
        self.base.saturating_sub(distance)
    }
}

/// Raises one placeholder's priority when the next token is one of a fixed
/// set of keywords, e.g. month names for a `month` placeholder.
#[derive(Clone, Debug)]
pub struct KeywordListRule {
    placeholder: String,
    keywords: Vec<String>,
    priority: i32,
}

impl KeywordListRule {
    /// Creates the rule. Keywords compare case-insensitively.
    #[must_use]
    pub fn new<I, S>(placeholder: impl Into<String>, keywords: I, priority: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            placeholder: placeholder.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            priority,
        }
    }
}

impl DynamicPriorityRule for KeywordListRule {
    fn is_applicable(&self, ctx: &DynamicContext<'_>) -> bool {
        ctx.is_matching() && ctx.argument() == self.placeholder
    }

    fn priority(&self, ctx: &DynamicContext<'_>) -> i32 {
        match ctx.current() {
            Some(token) if self.keywords.contains(&token.to_lowercase()) => self.priority,
            _ => ctx.static_priority(),
        }
    }
}
