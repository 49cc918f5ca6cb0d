//! Resolving ambiguity between same-priority candidates.
//!
//! When several connections of equal effective priority all match, their
//! candidates are gathered into a [`CertaintyDecision`], grouped by the
//! connection they came from. The namespace's [`CertaintyEffect`] then
//! decides which candidates survive and in what order they are explored.

const EPSILON: f64 = 1e-8;

/// One candidate continuation.
#[derive(Clone, Debug, PartialEq)]
pub struct CertaintyItem {
    /// Index of the candidate within the decision.
    pub identity: usize,
    /// Index of the connection that produced it.
    pub origin: usize,
    /// Accumulated certainty.
    pub certainty: f64,
}

impl CertaintyItem {
    /// Creates an item.
    #[must_use]
    pub const fn new(identity: usize, origin: usize, certainty: f64) -> Self {
        Self {
            identity,
            origin,
            certainty,
        }
    }
}

/// Candidates grouped by originating connection, in priority order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CertaintyDecision {
    groups: Vec<Vec<CertaintyItem>>,
}

impl CertaintyDecision {
    /// Creates an empty decision.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the candidates of one connection.
    pub fn add(&mut self, items: Vec<CertaintyItem>) {
        self.groups.push(items);
    }

    /// The groups in insertion order.
    #[must_use]
    pub fn groups(&self) -> &[Vec<CertaintyItem>] {
        &self.groups
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no groups were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All items, group by group.
    #[must_use]
    pub fn plain(&self) -> Vec<CertaintyItem> {
        self.groups.iter().flatten().cloned().collect()
    }

    /// The highest certainty of any item.
    #[must_use]
    pub fn max_certainty(&self) -> Option<f64> {
        self.groups
            .iter()
            .flatten()
            .map(|item| item.certainty)
            .reduce(f64::max)
    }

    /// Items whose certainty equals `certainty`.
    #[must_use]
    pub fn with_certainty(&self, certainty: f64) -> Vec<CertaintyItem> {
        self.groups
            .iter()
            .flatten()
            .filter(|item| (item.certainty - certainty).abs() < EPSILON)
            .cloned()
            .collect()
    }
}

/// Chooses and orders the candidates of a decision.
pub trait CertaintyEffect: Send + Sync {
    /// Returns the surviving items in exploration order.
    fn apply(&self, decision: &CertaintyDecision) -> Vec<CertaintyItem>;
}

/// Keeps every candidate, most certain first. Ties keep their order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortByCertainty;

impl CertaintyEffect for SortByCertainty {
    fn apply(&self, decision: &CertaintyDecision) -> Vec<CertaintyItem> {
        let mut items = decision.plain();
        items.sort_by(|a, b| b.certainty.total_cmp(&a.certainty));
        items
    }
}

/// Keeps only the most certain candidates.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnlyMostCertain;

impl CertaintyEffect for OnlyMostCertain {
    fn apply(&self, decision: &CertaintyDecision) -> Vec<CertaintyItem> {
        decision
            .max_certainty()
            .map(|max| decision.with_certainty(max))
            .unwrap_or_default()
    }
}

/// Keeps the most certain candidate of each group.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnePerGroup;

impl CertaintyEffect for OnePerGroup {
    fn apply(&self, decision: &CertaintyDecision) -> Vec<CertaintyItem> {
        decision
            .groups()
            .iter()
            .filter_map(|group| {
                group.iter().fold(None, |best: Option<&CertaintyItem>, item| match best {
                    Some(b) if b.certainty >= item.certainty => Some(b),
                    _ => Some(item),
                })
            })
            .cloned()
            .collect()
    }
}
