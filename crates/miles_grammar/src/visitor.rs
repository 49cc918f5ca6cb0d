//! Read-only traversal of grammar trees.
//!
//! # Example
//!
//! ```
//! use miles_grammar::{parse_grammar, AstVisitor, walk};
//!
//! struct WordCounter(usize);
//!
//! impl AstVisitor for WordCounter {
//!     fn visit_word(&mut self, _text: &str) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let ast = parse_grammar("(ADD, DRAW) shape AT point").unwrap();
//! let mut counter = WordCounter(0);
//! walk(&mut counter, &ast);
//! assert_eq!(counter.0, 3);
//! ```

use crate::ast::CommandComponent;

/// Trait for read-only grammar visitors.
///
/// Implement the methods for nodes of interest; the defaults do nothing.
/// Use [`walk`] to traverse a tree and call visitor methods.
#[allow(unused_variables)]
pub trait AstVisitor {
    /// Visit a literal word.
    fn visit_word(&mut self, text: &str) {}

    /// Visit a placeholder.
    fn visit_matching(&mut self, name: &str) {}

    /// Called before visiting a named component.
    fn enter_named(&mut self, name: &str) {}

    /// Called after visiting a named component.
    fn leave_named(&mut self, name: &str) {}

    /// Called before visiting an optional body.
    fn enter_optional(&mut self) {}

    /// Called after visiting an optional body.
    fn leave_optional(&mut self) {}

    /// Called before visiting a list body.
    fn enter_list(&mut self) {}

    /// Called after visiting a list body.
    fn leave_list(&mut self) {}

    /// Called before visiting the alternative at `index` of a choice.
    fn enter_option(&mut self, index: usize) {}

    /// Called after visiting the alternative at `index` of a choice.
    fn leave_option(&mut self, index: usize) {}
}

/// Walks `component` depth-first, calling visitor methods in source order.
pub fn walk<V: AstVisitor + ?Sized>(visitor: &mut V, component: &CommandComponent) {
    match component {
        CommandComponent::Word(text) => visitor.visit_word(text),
        CommandComponent::Matching(name) => visitor.visit_matching(name),
        CommandComponent::Named(name, inner) => {
            visitor.enter_named(name);
            walk(visitor, inner);
            visitor.leave_named(name);
        }
        CommandComponent::Sequence(children) => {
            for child in children {
                walk(visitor, child);
            }
        }
        CommandComponent::Optional(inner) => {
            visitor.enter_optional();
            walk(visitor, inner);
            visitor.leave_optional();
        }
        CommandComponent::List(inner) => {
            visitor.enter_list();
            walk(visitor, inner);
            visitor.leave_list();
        }
        CommandComponent::Choice(options) => {
            for (index, option) in options.iter().enumerate() {
                visitor.enter_option(index);
                walk(visitor, option);
                visitor.leave_option(index);
            }
        }
        CommandComponent::Root(inner) => walk(visitor, inner),
    }
}
