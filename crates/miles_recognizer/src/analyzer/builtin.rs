//! Analyzers shipped with the engine.

use miles_foundation::Value;

use super::{Analyzer, OptimizationStrategy};
use crate::context::MatchContext;

/// Consumes one token equal to a word, ignoring case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordAnalyzer {
    word: String,
}

impl WordAnalyzer {
    /// Creates an analyzer for `word`.
    #[must_use]
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into().to_lowercase(),
        }
    }
}

impl Analyzer for WordAnalyzer {
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        match ctx.current() {
            Some(token) if token.to_lowercase() == self.word => {
                ctx.consume(1);
                ctx.set_result(token);
            }
            _ => ctx.fail(),
        }
    }
}

/// Consumes exactly one token of any kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyWordAnalyzer;

impl Analyzer for AnyWordAnalyzer {
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        if let Some(token) = ctx.current() {
            ctx.consume(1);
            ctx.set_result(token);
        }
    }
}

/// Consumes one integer token. The result is [`Value::Int`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberAnalyzer;

impl Analyzer for NumberAnalyzer {
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        match ctx.current().map(str::parse::<i64>) {
            Some(Ok(number)) => {
                ctx.set_result(Value::Int(number));
                ctx.consume(1);
            }
            _ => ctx.fail(),
        }
    }
}

/// Catch-all: matches every non-empty prefix of the remaining input.
///
/// The result is the matched tokens as a [`Value::List`] of text.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextAnalyzer;

impl Analyzer for TextAnalyzer {
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        while ctx.has_any() {
            ctx.consume(1);
            let text: Vec<Value> = ctx.consumed().iter().map(|t| Value::from(t.as_str())).collect();
            ctx.set_result(Value::List(text.into()));
            ctx.interrupt();
        }
    }

    fn optimization_strategy(&self) -> OptimizationStrategy {
        OptimizationStrategy::ShortestFirst
    }
}
