//! Core types shared by every Miles layer.
//!
//! This crate provides:
//! - [`Error`] - Rich error types covering grammar, matcher, recognition and registration failures
//! - [`Value`] - The result payload analyzers attach to matched placeholders
//! - [`Flags`] - The string-keyed property bag threaded through recognition

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod flags;
pub mod value;

pub use error::{
    Error, ErrorContext, ErrorKind, GrammarSyntaxError, MatcherError, RecognitionTarget,
    RecognizerError, Result,
};
pub use flags::Flags;
pub use value::{OpaqueValue, Value};
