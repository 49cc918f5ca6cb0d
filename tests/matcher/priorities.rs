//! Priority tests.
//!
//! Tests for static priority folding and dynamic rule evaluation.

use std::sync::Arc;

use miles_foundation::Flags;
use miles_grammar::parse_grammar;
use miles_matcher::{
    ConnectionLabel, DynamicContext, DynamicPriorityRule, DynamicRuleSet, KeywordListRule,
    MatcherCompiler, NormalizedMatcher, NormalizedNode, PriorityManager, PriorityStrategy,
    StaticRule, WordLengthRule,
};

fn matcher_with(syntax: &str, priorities: &PriorityManager) -> NormalizedMatcher {
    let tree = parse_grammar(syntax).unwrap();
    let graph = MatcherCompiler::command_graph([("c", &tree)], priorities).unwrap();
    MatcherCompiler::finish(&graph, priorities)
}

fn initial_priorities(matcher: &NormalizedMatcher) -> Vec<i32> {
    matcher
        .state(matcher.initial())
        .connections
        .iter()
        .map(|c| c.priority)
        .collect()
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

// =============================================================================
// Static Priorities
// =============================================================================

fn shape_manager(strategy: PriorityStrategy) -> PriorityManager {
    let mut manager = PriorityManager::new()
        .with_strategy(strategy)
        .with_default_priority(3);
    manager.apply(StaticRule::GeneralAutomatic(1));
    manager.apply(StaticRule::GeneralMatching(20));
    manager
}

#[test]
fn first_strategy_uses_the_leading_node() {
    let matcher = matcher_with("{ color } shape", &shape_manager(PriorityStrategy::First));
    assert_eq!(initial_priorities(&matcher), vec![1, 1]);
}

#[test]
fn find_max_strategy_uses_the_largest_node() {
    let matcher = matcher_with("{ color } shape", &shape_manager(PriorityStrategy::FindMax));
    assert_eq!(initial_priorities(&matcher), vec![20, 20]);
}

#[test]
fn all_default_strategy_ignores_rules() {
    let matcher = matcher_with("{ color } shape", &shape_manager(PriorityStrategy::AllDefault));
    assert_eq!(initial_priorities(&matcher), vec![3, 3]);
}

#[test]
fn static_order_puts_higher_priorities_first() {
    let mut manager = shape_manager(PriorityStrategy::FindMax);
    manager.apply(StaticRule::SpecificMatching("color".into(), 30));
    let matcher = matcher_with("{ color } shape", &manager);
    let initial = matcher.state(matcher.initial());

    let terminals: Vec<String> = initial
        .static_order()
        .iter()
        .map(|&i| initial.connections[i].terminal().unwrap().to_string())
        .collect();
    assert_eq!(terminals, vec!["<color>", "<shape>"]);
}

#[test]
fn named_rule_wins_over_a_smaller_specific_rule() {
    let mut manager = PriorityManager::new().with_strategy(PriorityStrategy::First);
    manager.apply(StaticRule::SpecificMatching("place".into(), 4));
    manager.apply(StaticRule::Named("target".into(), 9));
    let matcher = matcher_with("target=place", &manager);
    assert_eq!(initial_priorities(&matcher), vec![9]);
}

#[test]
fn later_rules_replace_earlier_ones() {
    let mut manager = PriorityManager::new().with_strategy(PriorityStrategy::First);
    manager.apply(StaticRule::SpecificWord("go".into(), 4));
    manager.apply(StaticRule::SpecificWord("GO".into(), 8));
    let matcher = matcher_with("GO", &manager);
    assert_eq!(initial_priorities(&matcher), vec![8]);
}

// =============================================================================
// Dynamic Rules
// =============================================================================

struct Always(i32, i32);

impl DynamicPriorityRule for Always {
    fn is_applicable(&self, _ctx: &DynamicContext<'_>) -> bool {
        true
    }

    fn priority(&self, _ctx: &DynamicContext<'_>) -> i32 {
        self.0
    }

    fn order(&self) -> i32 {
        self.1
    }
}

#[test]
fn static_priority_stands_without_applicable_rules() {
    let input = tokens("go north");
    let node = NormalizedNode::new(ConnectionLabel::Matching("direction".into()), None);
    let flags = Flags::new();
    let ctx = DynamicContext::new(&input, 1, &node, 12, &flags);

    let mut rules = DynamicRuleSet::new();
    assert_eq!(rules.evaluate(&ctx), 12);
    rules.add(Arc::new(WordLengthRule::default()));
    assert_eq!(rules.evaluate(&ctx), 12);
}

#[test]
fn lower_order_rules_are_consulted_first() {
    let input = tokens("go north");
    let node = NormalizedNode::new(ConnectionLabel::Word("NORTH".into()), None);
    let flags = Flags::new();
    let ctx = DynamicContext::new(&input, 1, &node, 0, &flags);

    let mut rules = DynamicRuleSet::new();
    rules.add(Arc::new(WordLengthRule::default()));
    assert_eq!(rules.evaluate(&ctx), 50);
    rules.add(Arc::new(Always(99, -1)));
    assert_eq!(rules.evaluate(&ctx), 99);
    rules.add(Arc::new(Always(7, -1)));
    assert_eq!(rules.evaluate(&ctx), 99);
    assert_eq!(rules.len(), 3);
}

#[test]
fn word_length_rule_penalizes_length_difference() {
    let input = tokens("go nrth");
    let node = NormalizedNode::new(ConnectionLabel::Word("NORTH".into()), None);
    let flags = Flags::new();
    let ctx = DynamicContext::new(&input, 1, &node, 0, &flags);
    assert_eq!(WordLengthRule::new(10).priority(&ctx), 9);

    let ended = DynamicContext::new(&input, 2, &node, 0, &flags);
    assert!(!WordLengthRule::new(10).is_applicable(&ended));
}

#[test]
fn keyword_rule_only_fires_on_keywords() {
    let input = tokens("move to March then Smarch");
    let node = NormalizedNode::new(ConnectionLabel::Matching("month".into()), None);
    let flags = Flags::new();
    let rule = KeywordListRule::new("month", ["january", "march"], 40);

    let keyword = DynamicContext::new(&input, 2, &node, 5, &flags);
    assert!(rule.is_applicable(&keyword));
    assert_eq!(rule.priority(&keyword), 40);

    let other = DynamicContext::new(&input, 4, &node, 5, &flags);
    assert_eq!(rule.priority(&other), 5);

    let word = NormalizedNode::new(ConnectionLabel::Word("MARCH".into()), None);
    let not_a_placeholder = DynamicContext::new(&input, 2, &word, 5, &flags);
    assert!(!rule.is_applicable(&not_a_placeholder));
}
