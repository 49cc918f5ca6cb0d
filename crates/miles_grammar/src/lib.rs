//! Command grammar syntax for Miles.
//!
//! Grammars are short strings describing a spoken or typed command:
//!
//! ```text
//! (ADD, DRAW) { color } shape AT coordinates
//! ```
//!
//! - `WORD` - an uppercase literal, matched case-insensitively
//! - `name` - a lowercase placeholder bound to an analyzer
//! - `label=expr` - captures `expr` under `label`
//! - `(a, b)` - a choice between alternatives
//! - `[a]` - a list, repeated one or more times
//! - `{a}` - an optional part
//!
//! # Example
//!
//! ```
//! use miles_grammar::parse_grammar;
//!
//! let ast = parse_grammar("HELLO { name }").unwrap();
//! assert_eq!(
//!     ast.to_string(),
//!     "(ROOT:(SEQUENCE:(WORD:HELLO),(OPTIONAL:(SEQUENCE:(MATCHING:name)))))"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod span;
pub mod token;
pub mod visitor;

pub use ast::CommandComponent;
pub use lexer::Lexer;
pub use parser::{Parser, parse_grammar};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use visitor::{AstVisitor, walk};
