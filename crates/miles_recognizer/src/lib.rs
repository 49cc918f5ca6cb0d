//! Recognition for Miles.
//!
//! This crate searches a [`NormalizedMatcher`](miles_matcher::NormalizedMatcher)
//! for a path that covers a token stream:
//!
//! - [`Tokenizer`] splits text into tokens
//! - [`Environment`] holds a namespace's analyzers, priorities and policies
//! - [`Analyzer`]s decide what words and placeholders consume, reporting
//!   candidates through a [`MatchContext`]
//! - [`Recognizer`] runs the search over [`Pointer`]s, ordered by priority
//!   and resolved by a [`CertaintyEffect`]
//! - [`StructureBuilder`] turns the accepted pointer into a
//!   [`CommandStructure`]
//! - [`ExtendedGrammar`]s let analyzers recognize sub-grammars recursively

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod certainty;
pub mod config;
pub mod context;
pub mod env;
pub mod extended;
pub mod pointer;
pub mod recognizer;
pub mod structure;
pub mod tokenizer;

pub use analyzer::{
    Analyzer, AnyWordAnalyzer, ExactWordFactory, FnAnalyzer, NumberAnalyzer, OptimizationStrategy,
    TextAnalyzer, TypoWordAnalyzer, TypoWordFactory, WordAnalyzer, WordAnalyzerFactory, analyze,
    best_match, compare_words,
};
pub use certainty::{
    CertaintyDecision, CertaintyEffect, CertaintyItem, OnePerGroup, OnlyMostCertain,
    SortByCertainty,
};
pub use config::RecognizerConfig;
pub use context::{Candidate, Guards, MatchContext};
pub use env::Environment;
pub use extended::{ExtendedAnalyzer, ExtendedGrammar};
pub use pointer::{Pointer, Step};
pub use recognizer::Recognizer;
pub use structure::{CommandNode, CommandStructure, NamespaceStructure, NodeKind, StructureBuilder};
pub use tokenizer::Tokenizer;
