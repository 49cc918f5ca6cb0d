//! Placeholder and word analyzers.
//!
//! An [`Analyzer`] decides how many tokens a word or placeholder node
//! consumes and with what certainty. Word nodes get their analyzer from the
//! namespace's [`WordAnalyzerFactory`]; placeholder nodes use the analyzer
//! bound under the placeholder's name.

mod builtin;
mod typo;

use std::cmp::Reverse;
use std::fmt;

use miles_foundation::Result;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::context::{Candidate, MatchContext};

pub use builtin::{AnyWordAnalyzer, NumberAnalyzer, TextAnalyzer, WordAnalyzer};
pub use typo::{TypoWordAnalyzer, TypoWordFactory, best_match, compare_words};

/// Order in which the candidates of one invocation are explored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OptimizationStrategy {
    /// Emission order.
    #[default]
    None,
    /// Fewest consumed tokens first.
    ShortestFirst,
    /// Most consumed tokens first.
    LongestFirst,
    /// Seeded shuffle.
    Randomize,
}

impl OptimizationStrategy {
    /// Reorders `candidates` in place. Sorting is stable.
    pub fn apply(self, candidates: &mut [Candidate], seed: u64) {
        match self {
            Self::None => {}
            Self::ShortestFirst => candidates.sort_by_key(Candidate::len),
            Self::LongestFirst => candidates.sort_by_key(|c| Reverse(c.len())),
            Self::Randomize => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                candidates.shuffle(&mut rng);
            }
        }
    }
}

/// Matches a word or placeholder against the input.
pub trait Analyzer: Send + Sync {
    /// Inspects the input and emits candidates through `ctx`.
    fn invoke(&self, ctx: &mut MatchContext<'_>);

    /// Exploration order for this analyzer's candidates.
    fn optimization_strategy(&self) -> OptimizationStrategy {
        OptimizationStrategy::None
    }
}

/// Runs `analyzer` and collects its candidates.
///
/// Analyzers only run when at least one token remains.
///
/// # Errors
/// Returns the error the analyzer recorded with [`MatchContext::fail_with`].
pub fn analyze(analyzer: &dyn Analyzer, mut ctx: MatchContext<'_>) -> Result<Vec<Candidate>> {
    if ctx.is_empty() {
        return Ok(Vec::new());
    }
    analyzer.invoke(&mut ctx);
    ctx.finish()
}

/// Builds the analyzer used for literal word nodes.
pub trait WordAnalyzerFactory: Send + Sync {
    /// Returns an analyzer for `word` (uppercase, as written in the grammar).
    fn build(&self, word: &str) -> Box<dyn Analyzer>;
}

/// Exact, case-insensitive word comparison.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactWordFactory;

impl WordAnalyzerFactory for ExactWordFactory {
    fn build(&self, word: &str) -> Box<dyn Analyzer> {
        Box::new(WordAnalyzer::new(word))
    }
}

/// Adapts a closure into an [`Analyzer`].
pub struct FnAnalyzer<F> {
    f: F,
    strategy: OptimizationStrategy,
}

impl<F> FnAnalyzer<F>
where
    F: Fn(&mut MatchContext<'_>) + Send + Sync,
{
    /// Wraps `f`.
    #[must_use]
    pub fn new(f: F) -> Self {
        Self {
            f,
            strategy: OptimizationStrategy::None,
        }
    }

    /// Sets the optimization strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: OptimizationStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl<F> Analyzer for FnAnalyzer<F>
where
    F: Fn(&mut MatchContext<'_>) + Send + Sync,
{
    fn invoke(&self, ctx: &mut MatchContext<'_>) {
        (self.f)(ctx);
    }

    fn optimization_strategy(&self) -> OptimizationStrategy {
        self.strategy
    }
}

impl<F> fmt::Debug for FnAnalyzer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAnalyzer")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
