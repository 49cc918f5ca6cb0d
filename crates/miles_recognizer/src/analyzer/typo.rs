//! Typo-tolerant word comparison.
//!
//! Two words of equal length are compared position by position. Runs of
//! mismatched characters must be short permutations of each other (a
//! transposition like `januray` for `january`); the certainty is the share
//! of characters in place.

use std::collections::HashMap;

use super::{Analyzer, WordAnalyzerFactory};
use crate::context::MatchContext;

const MIN_LENGTH: usize = 3;
const MAX_SWAP: usize = 3;

/// Compares `target` with `actual`, returning a certainty in `0..=100`.
///
/// Equal words score 100. Words of different length, or shorter than three
/// characters, score 0. So does any mismatched run longer than three
/// characters or whose letters differ.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compare_words(target: &str, actual: &str) -> f64 {
    if target == actual {
        return 100.0;
    }
    let target: Vec<char> = target.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    if target.len() != actual.len() || target.len() < MIN_LENGTH {
        return 0.0;
    }

    let mut correct = 0usize;
    let mut run: (Vec<char>, Vec<char>) = (Vec::new(), Vec::new());
    for (&t, &a) in target.iter().zip(&actual) {
        if t == a {
            if !is_swap(&run.0, &run.1) {
                return 0.0;
            }
            run.0.clear();
            run.1.clear();
            correct += 1;
        } else {
            run.0.push(t);
            run.1.push(a);
        }
    }
    if !is_swap(&run.0, &run.1) {
        return 0.0;
    }

    100.0 * correct as f64 / target.len() as f64
}

fn is_swap(left: &[char], right: &[char]) -> bool {
    if left.len() > MAX_SWAP {
        return false;
    }
    let mut counts: HashMap<char, i32> = HashMap::new();
    for c in left {
        *counts.entry(*c).or_default() += 1;
    }
    for c in right {
        *counts.entry(*c).or_default() -= 1;
    }
    counts.values().all(|n| *n == 0)
}

/// Returns the candidate closest to `word` and its certainty, or `None` if
/// nothing scores above zero. Ties keep the earlier candidate.
#[must_use]
pub fn best_match<'a, I>(word: &str, candidates: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let certainty = compare_words(word, candidate);
        if certainty > best.map_or(0.0, |(_, c)| c) {
            best = Some((candidate, certainty));
        }
    }
    best
}

/// Matches one token against a word, tolerating transpositions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypoWordAnalyzer {
    word: String,
}

impl TypoWordAnalyzer {
    /// Creates an analyzer for `word`.
    #[must_use]
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into().to_lowercase(),
        }
    }
}

impl Analyzer for TypoWordAnalyzer {
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        let Some(token) = ctx.current() else {
            ctx.fail();
            return;
        };
        let certainty = compare_words(&self.word, &token.to_lowercase());
        if certainty > 0.0 {
            ctx.consume_with_certainty(1, certainty);
            ctx.set_result(token);
        } else {
            ctx.fail();
        }
    }
}

/// Builds [`TypoWordAnalyzer`]s for word nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypoWordFactory;

impl WordAnalyzerFactory for TypoWordFactory {
    fn build(&self, word: &str) -> Box<dyn Analyzer> {
        Box::new(TypoWordAnalyzer::new(word))
    }
}
