//! Replaying a pointer's history into a parse tree.

use miles_matcher::{AutoLabel, ConnectionLabel};
use tracing::warn;

use super::node::{CommandNode, NodeKind};
use super::{CommandStructure, NamespaceStructure};
use crate::pointer::Pointer;

/// Builds [`CommandStructure`]s from accepted pointers.
pub struct StructureBuilder;

impl StructureBuilder {
    /// Replays the automatic markers and leaves of `pointer` into a tree.
    ///
    /// Groups open on their begin marker and close on their end marker.
    /// Each list repetition becomes an `ITEM` child of its `LIST`. A
    /// skipped optional still appears as an empty `OPTIONAL`.
    #[must_use]
    pub fn build(pointer: &Pointer<'_>, tokens: &[String], namespace: NamespaceStructure) -> CommandStructure {
        let mut stack = vec![CommandNode::group(NodeKind::Item, None, 0)];
        let mut command = String::new();

        for step in pointer.history() {
            let name = step.node.name.clone();
            match &step.node.label {
                ConnectionLabel::Word(word) => top(&mut stack).push(CommandNode::leaf(
                    NodeKind::Word,
                    word.as_str(),
                    name,
                    step.values.clone(),
                    step.result.clone(),
                )),
                ConnectionLabel::Matching(placeholder) => top(&mut stack).push(CommandNode::leaf(
                    NodeKind::Matching,
                    placeholder.as_str(),
                    name,
                    step.values.clone(),
                    step.result.clone(),
                )),
                ConnectionLabel::Automatic(label) => match label {
                    AutoLabel::SkipOptional => {
                        top(&mut stack).push(CommandNode::group(NodeKind::Optional, name, 0));
                    }
                    AutoLabel::BeginOptional => {
                        stack.push(CommandNode::group(NodeKind::Optional, name, 0));
                    }
                    AutoLabel::BeginChoice => {
                        stack.push(CommandNode::group(NodeKind::Choice, name, 0));
                    }
                    AutoLabel::Option(index) => top(&mut stack).set_number(*index),
                    AutoLabel::BeginList => {
                        stack.push(CommandNode::group(NodeKind::List, name, 0));
                        stack.push(CommandNode::group(NodeKind::Item, None, 0));
                    }
                    AutoLabel::RepeatList => {
                        close(&mut stack);
                        let next = top(&mut stack).len();
                        stack.push(CommandNode::group(NodeKind::Item, None, next));
                    }
                    AutoLabel::EndList => {
                        close(&mut stack);
                        close(&mut stack);
                    }
                    AutoLabel::EndOptional | AutoLabel::EndChoice => close(&mut stack),
                    AutoLabel::Recognize(recognized) => command.clone_from(recognized),
                },
            }
        }

        if stack.len() > 1 {
            warn!(command = %command, open = stack.len() - 1, "unbalanced markers in recognized path");
        }
        while stack.len() > 1 {
            close(&mut stack);
        }
        let root = stack.pop().unwrap_or_else(|| CommandNode::group(NodeKind::Item, None, 0));

        CommandStructure {
            command,
            namespace,
            tokens: tokens.to_vec(),
            start: pointer.start(),
            end: pointer.position(),
            certainty: pointer.certainty(),
            flags: pointer.flags().clone(),
            root,
        }
    }
}

fn top(stack: &mut [CommandNode]) -> &mut CommandNode {
    let last = stack.len() - 1;
    &mut stack[last]
}

fn close(stack: &mut Vec<CommandNode>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(node) = stack.pop() {
        top(stack).push(node);
    }
}
