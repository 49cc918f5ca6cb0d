//! Integration tests for Layer 3: Recognizer
//!
//! Tests for tokenization, the search, parse trees and extended grammars.

mod properties;
