//! Abstract syntax tree for command grammars.
//!
//! A parsed grammar is always a [`CommandComponent::Root`] wrapping a
//! [`CommandComponent::Sequence`]. Optional, list and choice bodies are
//! sequences as well, so every group has the same shape.

use std::collections::BTreeSet;

use crate::visitor::{AstVisitor, walk};

/// A node of a command grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandComponent {
    /// Literal word, stored uppercase.
    Word(String),
    /// Placeholder bound to an analyzer.
    Matching(String),
    /// Captures the inner component under a name.
    Named(String, Box<CommandComponent>),
    /// Components matched one after another.
    Sequence(Vec<CommandComponent>),
    /// Inner sequence present zero or one times.
    Optional(Box<CommandComponent>),
    /// Inner sequence repeated one or more times.
    List(Box<CommandComponent>),
    /// Exactly one of the alternative sequences.
    Choice(Vec<CommandComponent>),
    /// The whole command.
    Root(Box<CommandComponent>),
}

impl CommandComponent {
    /// Creates a literal word.
    #[must_use]
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }

    /// Creates a placeholder.
    #[must_use]
    pub fn matching(name: impl Into<String>) -> Self {
        Self::Matching(name.into())
    }

    /// Wraps `inner` under a capture name.
    #[must_use]
    pub fn named(name: impl Into<String>, inner: Self) -> Self {
        Self::Named(name.into(), Box::new(inner))
    }

    /// Creates a sequence.
    #[must_use]
    pub fn sequence(children: Vec<Self>) -> Self {
        Self::Sequence(children)
    }

    /// Creates an optional group over a sequence of `children`.
    #[must_use]
    pub fn optional(children: Vec<Self>) -> Self {
        Self::Optional(Box::new(Self::Sequence(children)))
    }

    /// Creates a list over a sequence of `children`.
    #[must_use]
    pub fn list(children: Vec<Self>) -> Self {
        Self::List(Box::new(Self::Sequence(children)))
    }

    /// Creates a choice where each alternative is a sequence.
    #[must_use]
    pub fn choice(options: Vec<Vec<Self>>) -> Self {
        Self::Choice(options.into_iter().map(Self::Sequence).collect())
    }

    /// Creates a root over a sequence of `children`.
    #[must_use]
    pub fn root(children: Vec<Self>) -> Self {
        Self::Root(Box::new(Self::Sequence(children)))
    }

    /// Returns the tag used in debug renderings.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Word(_) => "WORD",
            Self::Matching(_) => "MATCHING",
            Self::Named(..) => "NAMED",
            Self::Sequence(_) => "SEQUENCE",
            Self::Optional(_) => "OPTIONAL",
            Self::List(_) => "LIST",
            Self::Choice(_) => "CHOICE",
            Self::Root(_) => "ROOT",
        }
    }

    /// Returns the direct children of this node.
    #[must_use]
    pub fn children(&self) -> Vec<&CommandComponent> {
        match self {
            Self::Word(_) | Self::Matching(_) => Vec::new(),
            Self::Named(_, inner) | Self::Optional(inner) | Self::List(inner) | Self::Root(inner) => {
                vec![inner.as_ref()]
            }
            Self::Sequence(children) | Self::Choice(children) => children.iter().collect(),
        }
    }

    /// Returns every placeholder name used in this grammar.
    #[must_use]
    pub fn placeholders(&self) -> BTreeSet<String> {
        struct Collector(BTreeSet<String>);

        impl AstVisitor for Collector {
            fn visit_matching(&mut self, name: &str) {
                self.0.insert(name.to_string());
            }
        }

        let mut collector = Collector(BTreeSet::new());
        walk(&mut collector, self);
        collector.0
    }

    /// Returns true if the grammar contains no placeholders.
    #[must_use]
    pub fn is_literal_only(&self) -> bool {
        self.placeholders().is_empty()
    }
}
