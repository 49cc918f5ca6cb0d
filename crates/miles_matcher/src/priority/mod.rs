//! Static and dynamic connection priorities.
//!
//! Static priorities are fixed when a namespace is built: a
//! [`PriorityManager`] knows the priority of each single node and a
//! [`PriorityStrategy`] folds those into one priority per normalized
//! connection. Dynamic rules run during recognition and may override the
//! static priority based on the input at hand.

mod dynamic;
mod manager;
mod strategy;

pub use dynamic::{
    DynamicContext, DynamicPriorityRule, DynamicRuleSet, KeywordListRule, WordLengthRule,
};
pub use manager::{PriorityManager, StaticRule};
pub use strategy::{PriorityAssigner, PriorityStrategy};
