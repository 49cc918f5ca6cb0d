//! Recognizer configuration.

/// Tuning knobs shared by every recognition in a namespace.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognizerConfig {
    /// Candidates with a certainty at or below this value are failures.
    pub certainty_threshold: f64,
    /// Certainty of an exact match.
    pub max_certainty: f64,
    /// Seed for [`OptimizationStrategy::Randomize`](crate::OptimizationStrategy::Randomize).
    pub random_seed: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            certainty_threshold: 1e-8,
            max_certainty: 100.0,
            random_seed: 0,
        }
    }
}

impl RecognizerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure threshold.
    #[must_use]
    pub fn with_certainty_threshold(mut self, threshold: f64) -> Self {
        self.certainty_threshold = threshold;
        self
    }

    /// Sets the certainty of an exact match.
    #[must_use]
    pub fn with_max_certainty(mut self, max: f64) -> Self {
        self.max_certainty = max;
        self
    }

    /// Sets the shuffle seed.
    #[must_use]
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Returns true if `certainty` counts as a match.
    #[must_use]
    pub fn is_viable(&self, certainty: f64) -> bool {
        certainty > self.certainty_threshold
    }

    /// Combines an accumulated certainty with one step's certainty.
    #[must_use]
    pub fn combine(&self, accumulated: f64, step: f64) -> f64 {
        accumulated * step / self.max_certainty
    }
}
