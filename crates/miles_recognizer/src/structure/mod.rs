//! Parse trees of recognized commands.
//!
//! A [`CommandStructure`] is rebuilt from the history of an accepted
//! pointer. Its root is an `ITEM` node; groups nest the way they appear in
//! the grammar:
//!
//! ```text
//! V [(A, B)]   on "v a b"
//!
//! (ITEM#0 WORD:v (LIST (ITEM#0 (CHOICE#0 WORD:a)) (ITEM#1 (CHOICE#1 WORD:b))))
//! ```

mod builder;
mod node;

pub use builder::StructureBuilder;
pub use node::{CommandNode, NodeKind};

use miles_foundation::Flags;

/// The namespace a command was recognized in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceStructure {
    /// Namespace identifier.
    pub identifier: String,
    /// The prefix tokens that selected it.
    pub tokens: Vec<String>,
}

impl NamespaceStructure {
    /// Creates a namespace structure.
    #[must_use]
    pub fn new(identifier: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            tokens,
        }
    }
}

/// A recognized command and its parse tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandStructure {
    command: String,
    namespace: NamespaceStructure,
    tokens: Vec<String>,
    start: usize,
    end: usize,
    certainty: f64,
    flags: Flags,
    root: CommandNode,
}

impl CommandStructure {
    /// Name of the recognized command.
    #[must_use]
    pub fn command_name(&self) -> &str {
        &self.command
    }

    /// The namespace the command belongs to.
    #[must_use]
    pub fn namespace(&self) -> &NamespaceStructure {
        &self.namespace
    }

    /// The full token stream.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Position the command started at.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Position after the command.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of tokens the command covers.
    #[must_use]
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Certainty of the accepted path.
    #[must_use]
    pub fn certainty(&self) -> f64 {
        self.certainty
    }

    /// Flags as the accepted path left them.
    #[must_use]
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// The `index`-th child of the root.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&CommandNode> {
        self.root.get(index)
    }

    /// Every node matching `predicate`, in pre-order.
    #[must_use]
    pub fn find_all<P>(&self, predicate: P) -> Vec<&CommandNode>
    where
        P: Fn(&CommandNode) -> bool,
    {
        self.root.descendants().filter(|n| predicate(n)).collect()
    }

    /// Nodes captured under `name`.
    #[must_use]
    pub fn find_named(&self, name: &str) -> Vec<&CommandNode> {
        self.find_all(|n| n.name() == Some(name))
    }

    /// The first node captured under `name`.
    #[must_use]
    pub fn first_named(&self, name: &str) -> Option<&CommandNode> {
        self.root.descendants().find(|n| n.name() == Some(name))
    }

    /// Word leaves for `word`, compared case-insensitively.
    #[must_use]
    pub fn find_word(&self, word: &str) -> Vec<&CommandNode> {
        self.find_all(|n| {
            n.kind() == NodeKind::Word && n.argument().is_some_and(|a| a.eq_ignore_ascii_case(word))
        })
    }

    /// Placeholder leaves for `placeholder`.
    #[must_use]
    pub fn find_matching(&self, placeholder: &str) -> Vec<&CommandNode> {
        self.find_all(|n| n.kind() == NodeKind::Matching && n.argument() == Some(placeholder))
    }

    /// Nodes of one kind.
    #[must_use]
    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<&CommandNode> {
        self.find_all(|n| n.kind() == kind)
    }

    /// Word and placeholder leaves in input order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&CommandNode> {
        self.find_all(CommandNode::is_leaf)
    }
}

impl std::fmt::Display for CommandStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.command, self.root)
    }
}
