//! Miles - Grammar-driven command recognition
//!
//! This crate re-exports all layers of the Miles system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: miles_runtime     - Plugin registry, dispatch, REPL
//! Layer 3: miles_recognizer  - Analyzers, search, command structures
//! Layer 2: miles_matcher     - Grammar compilation, priorities, normalization
//! Layer 1: miles_grammar     - Grammar text parser and AST
//! Layer 0: miles_foundation  - Core types (Value, Flags, Error)
//! ```

pub use miles_foundation as foundation;
pub use miles_grammar as grammar;
pub use miles_matcher as matcher;
pub use miles_recognizer as recognizer;
pub use miles_runtime as runtime;
