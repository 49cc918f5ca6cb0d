//! Integration tests for Layer 2: Matcher
//!
//! Tests for grammar compilation, normalization and priorities.

mod compile;
mod normalize;
mod priorities;
