//! Matcher compilation for Miles.
//!
//! Grammars are compiled in three steps:
//!
//! 1. [`MatcherCompiler`] turns grammar trees into a nondeterministic
//!    [`StateGraph`] of word, placeholder and automatic connections
//! 2. [`Normalizer`] collapses runs of automatic connections into
//!    [`NormalizedConnection`]s that each consume input or accept
//! 3. [`PriorityAssigner`] stamps static priorities using the namespace's
//!    [`PriorityManager`] and [`PriorityStrategy`]
//!
//! Dynamic priority rules ([`DynamicPriorityRule`]) are evaluated later, by
//! the recognizer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compiler;
pub mod graph;
pub mod normalized;
pub mod normalizer;
pub mod priority;

pub use compiler::MatcherCompiler;
pub use graph::{AutoLabel, Connection, ConnectionLabel, NodeKind, State, StateGraph, StateId};
pub use normalized::{NormalizedConnection, NormalizedMatcher, NormalizedNode, NormalizedState};
pub use normalizer::Normalizer;
pub use priority::{
    DynamicContext, DynamicPriorityRule, DynamicRuleSet, KeywordListRule, PriorityAssigner,
    PriorityManager, PriorityStrategy, StaticRule, WordLengthRule,
};
