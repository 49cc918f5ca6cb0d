//! Folding node priorities into connection priorities.

use tracing::debug;

use crate::normalized::{NormalizedConnection, NormalizedMatcher};

use super::manager::PriorityManager;

/// How a composite connection's priority is derived from its nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PriorityStrategy {
    /// The first node's priority.
    First,
    /// The largest node priority.
    FindMax,
    /// Every connection gets the namespace default.
    #[default]
    AllDefault,
}

impl PriorityStrategy {
    /// Folds node priorities, using `default` for empty input and for
    /// [`PriorityStrategy::AllDefault`].
    #[must_use]
    pub fn fold(self, priorities: impl IntoIterator<Item = i32>, default: i32) -> i32 {
        match self {
            Self::First => priorities.into_iter().next().unwrap_or(default),
            Self::FindMax => priorities.into_iter().max().unwrap_or(default),
            Self::AllDefault => default,
        }
    }
}

/// Stamps static priorities onto a normalized matcher.
pub struct PriorityAssigner;

impl PriorityAssigner {
    /// Computes every connection's static priority and refreshes each
    /// state's static ordering.
    pub fn assign(matcher: &mut NormalizedMatcher, manager: &PriorityManager) {
        for state in matcher.states_mut() {
            for connection in &mut state.connections {
                connection.priority = Self::connection_priority(connection, manager);
            }
            state.refresh_order();
        }
        debug!(
            strategy = ?manager.strategy(),
            connections = matcher.connection_count(),
            "assigned static priorities"
        );
    }

    /// Static priority of one connection under `manager`.
    #[must_use]
    pub fn connection_priority(connection: &NormalizedConnection, manager: &PriorityManager) -> i32 {
        let nodes = connection
            .nodes
            .iter()
            .map(|n| manager.node_priority(n.kind(), &n.argument(), n.name.as_deref()));
        manager.strategy().fold(nodes, manager.default_priority())
    }
}
