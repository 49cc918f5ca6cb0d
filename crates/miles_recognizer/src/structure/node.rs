//! Parse tree nodes.

use std::any::Any;
use std::fmt;

use miles_foundation::Value;

/// Kind of a parse tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A literal word.
    Word,
    /// A placeholder.
    Matching,
    /// An optional group; empty when skipped.
    Optional,
    /// A list; its children are the repetitions.
    List,
    /// A choice; its number is the selected option.
    Choice,
    /// The root, or one list repetition.
    Item,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "WORD",
            Self::Matching => "MATCHING",
            Self::Optional => "OPTIONAL",
            Self::List => "LIST",
            Self::Choice => "CHOICE",
            Self::Item => "ITEM",
        };
        f.write_str(name)
    }
}

/// A node of a recognized command's parse tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandNode {
    kind: NodeKind,
    name: Option<String>,
    argument: Option<String>,
    values: Vec<String>,
    number: usize,
    result: Option<Value>,
    children: Vec<CommandNode>,
}

impl CommandNode {
    /// Creates a group node.
    #[must_use]
    pub fn group(kind: NodeKind, name: Option<String>, number: usize) -> Self {
        Self {
            kind,
            name,
            argument: None,
            values: Vec::new(),
            number,
            result: None,
            children: Vec::new(),
        }
    }

    /// Creates a word or placeholder leaf.
    #[must_use]
    pub fn leaf(
        kind: NodeKind,
        argument: impl Into<String>,
        name: Option<String>,
        values: Vec<String>,
        result: Option<Value>,
    ) -> Self {
        Self {
            kind,
            name,
            argument: Some(argument.into()),
            values,
            number: 0,
            result,
            children: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, child: CommandNode) {
        self.children.push(child);
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    /// The node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Capture name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The word (uppercase) or placeholder name of a leaf.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Tokens consumed by a leaf.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Consumed tokens joined by spaces. For groups, the text of all leaves.
    #[must_use]
    pub fn text(&self) -> String {
        if self.is_leaf() {
            return self.values.join(" ");
        }
        let parts: Vec<String> = self
            .children
            .iter()
            .map(CommandNode::text)
            .filter(|t| !t.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Selected option of a choice, or repetition index of a list item.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Value set by the analyzer.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// The analyzer's result as application data of type `T`.
    #[must_use]
    pub fn typed_result<T: Any>(&self) -> Option<&T> {
        self.result.as_ref().and_then(Value::downcast_ref)
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// The `index`-th child.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CommandNode> {
        self.children.get(index)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true for word and placeholder nodes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Word | NodeKind::Matching)
    }

    /// Pre-order traversal of this node and its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &CommandNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}=")?;
        }
        match self.kind {
            NodeKind::Word | NodeKind::Matching => {
                write!(f, "{}:{}", self.kind, self.values.join(" "))
            }
            _ => {
                write!(f, "({}", self.kind)?;
                if matches!(self.kind, NodeKind::Choice | NodeKind::Item) {
                    write!(f, "#{}", self.number)?;
                }
                for child in &self.children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
