//! The token-driven search over a normalized matcher.
//!
//! The frontier is a deque of [`Pointer`]s. Each round pops the front
//! pointer; if it accepts, the search records it, otherwise its
//! continuations are pushed back onto the front in exploration order, so
//! the newest branch is always explored next.
//!
//! Continuations are ordered as follows:
//!
//! 1. Connections are ranked by effective priority, highest first. With
//!    dynamic rules, the rule result for the connection's last node replaces
//!    the static priority. Ties keep insertion order.
//! 2. Within one priority, every matching connection contributes its
//!    candidates to a [`CertaintyDecision`] and the namespace's
//!    [`CertaintyEffect`](crate::CertaintyEffect) picks and orders them.
//! 3. Within one analyzer invocation, candidates follow the analyzer's
//!    [`OptimizationStrategy`](crate::OptimizationStrategy).
//!
//! A `(state, position)` cache drops pointers equivalent to one seen
//! before. Exhaustive enumeration disables the cache and only prunes
//! branches that revisit a state without consuming input.

use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use miles_foundation::{Error, ErrorKind, Flags, RecognitionTarget, Result};
use miles_matcher::{
    ConnectionLabel, DynamicContext, NormalizedConnection, NormalizedMatcher, NormalizedNode,
    NormalizedState,
};
use tracing::{debug, trace};

use crate::analyzer::{Analyzer, analyze};
use crate::certainty::{CertaintyDecision, CertaintyItem};
use crate::context::{Guards, MatchContext};
use crate::env::Environment;
use crate::pointer::{Pointer, Step};

/// What counts as acceptance and when the search stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Final state with all input consumed; first one wins.
    Complete,
    /// Final state; first one wins.
    Namespace,
    /// Final state; collect all.
    Prefix,
    /// Final state with all input consumed; collect all, no cache.
    Exhaustive,
}

impl Mode {
    const fn needs_all_input(self) -> bool {
        matches!(self, Self::Complete | Self::Exhaustive)
    }

    const fn stops_at_first(self) -> bool {
        matches!(self, Self::Complete | Self::Namespace)
    }
}

/// Result of one search.
struct Outcome<'m> {
    accepted: Vec<Pointer<'m>>,
    furthest: usize,
}

/// A partially threaded connection.
#[derive(Clone)]
struct Branch<'m> {
    position: usize,
    certainty: f64,
    steps: Vec<Step<'m>>,
    flags: Flags,
}

/// Searches one normalized matcher under one namespace environment.
#[derive(Clone, Copy, Debug)]
pub struct Recognizer<'m> {
    matcher: &'m NormalizedMatcher,
    env: &'m Environment,
}

impl<'m> Recognizer<'m> {
    /// Creates a recognizer.
    #[must_use]
    pub fn new(matcher: &'m NormalizedMatcher, env: &'m Environment) -> Self {
        Self { matcher, env }
    }

    /// Recognizes a command covering all of `tokens[start..]`.
    ///
    /// # Errors
    /// Returns a recognizer error citing the furthest position any branch
    /// reached, or "unexpected end of input" if that is the end. Returns
    /// [`ErrorKind::UnknownMatching`] if the search reaches a placeholder
    /// with no analyzer.
    pub fn recognize(&self, tokens: &[String], start: usize, flags: &Flags) -> Result<Pointer<'m>> {
        self.first(tokens, start, flags, Mode::Complete, RecognitionTarget::Command)
    }

    /// Recognizes which namespace prefix `tokens` start with. Tokens after
    /// the prefix are ignored.
    ///
    /// # Errors
    /// Returns a recognizer error if no prefix matches.
    pub fn recognize_namespace(&self, tokens: &[String], flags: &Flags) -> Result<Pointer<'m>> {
        self.first(tokens, 0, flags, Mode::Namespace, RecognitionTarget::Namespace)
    }

    /// Returns every pointer that accepts a prefix of `tokens[start..]`, in
    /// search order.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownMatching`] if the search reaches a
    /// placeholder with no analyzer, or an analyzer's own error.
    pub fn recognize_prefix(
        &self,
        tokens: &[String],
        start: usize,
        flags: &Flags,
        guards: Guards,
    ) -> Result<Vec<Pointer<'m>>> {
        let initial = self.initial(start, flags, guards);
        Ok(self.search(tokens, initial, Mode::Prefix)?.accepted)
    }

    /// Returns every accepting path over all of `tokens[start..]`.
    ///
    /// Equivalent pointers are not merged, so the result grows with the
    /// number of distinct paths. A catch-all placeholder in a list matching
    /// `n` tokens yields `2^n` paths.
    ///
    /// # Errors
    /// Same as [`Recognizer::recognize_prefix`].
    pub fn enumerate(&self, tokens: &[String], start: usize, flags: &Flags) -> Result<Vec<Pointer<'m>>> {
        let initial = self.initial(start, flags, Guards::new());
        Ok(self.search(tokens, initial, Mode::Exhaustive)?.accepted)
    }

    fn initial(&self, start: usize, flags: &Flags, guards: Guards) -> Pointer<'m> {
        Pointer::initial(
            self.matcher.initial(),
            start,
            self.env.config().max_certainty,
            flags.clone(),
            guards,
        )
    }

    fn first(
        &self,
        tokens: &[String],
        start: usize,
        flags: &Flags,
        mode: Mode,
        target: RecognitionTarget,
    ) -> Result<Pointer<'m>> {
        let initial = self.initial(start, flags, Guards::new());
        let outcome = self.search(tokens, initial, mode)?;
        match outcome.accepted.into_iter().next() {
            Some(pointer) => {
                debug!(
                    %target,
                    recognized = pointer.recognized().unwrap_or_default(),
                    certainty = pointer.certainty(),
                    "recognized"
                );
                Ok(pointer)
            }
            None => {
                debug!(%target, furthest = outcome.furthest, tokens = tokens.len(), "recognition failed");
                Err(match tokens.get(outcome.furthest) {
                    Some(token) => Error::unrecognized(target, outcome.furthest + 1, token.as_str()),
                    None => Error::unexpected_end(target),
                })
            }
        }
    }

    fn search(&self, tokens: &[String], initial: Pointer<'m>, mode: Mode) -> Result<Outcome<'m>> {
        let cached = mode != Mode::Exhaustive;
        let mut seen = HashSet::from([(initial.state(), initial.position())]);
        let mut furthest = initial.position();
        let mut frontier = VecDeque::from([initial]);
        let mut accepted = Vec::new();

        while let Some(pointer) = frontier.pop_front() {
            furthest = furthest.max(pointer.position());
            if self.accepts(&pointer, tokens.len(), mode) {
                accepted.push(pointer);
                if mode.stops_at_first() {
                    break;
                }
                continue;
            }

            let children = self.expand(&pointer, tokens)?;
            trace!(
                state = %pointer.state(),
                position = pointer.position(),
                certainty = pointer.certainty(),
                children = children.len(),
                "expanded pointer"
            );
            let fresh: Vec<Pointer<'m>> = children
                .into_iter()
                .filter(|child| {
                    if cached {
                        seen.insert((child.state(), child.position()))
                    } else {
                        child.position() > pointer.position() || !pointer.is_idle_at(child.state())
                    }
                })
                .collect();
            for child in fresh.into_iter().rev() {
                frontier.push_front(child);
            }
        }

        Ok(Outcome { accepted, furthest })
    }

    fn accepts(&self, pointer: &Pointer<'m>, len: usize, mode: Mode) -> bool {
        self.matcher.state(pointer.state()).is_final
            && (!mode.needs_all_input() || pointer.position() >= len)
    }

    /// All continuations of `pointer`, in exploration order.
    fn expand(&self, pointer: &Pointer<'m>, tokens: &[String]) -> Result<Vec<Pointer<'m>>> {
        let state = self.matcher.state(pointer.state());
        let ranked = self.rank(state, pointer, tokens);
        let mut children = Vec::new();

        for group in ranked.chunk_by(|a, b| a.0 == b.0) {
            let mut decision = CertaintyDecision::new();
            let mut candidates: Vec<Option<Pointer<'m>>> = Vec::new();
            for &(_, index) in group {
                let items = self
                    .follow(pointer, &state.connections[index], tokens)?
                    .into_iter()
                    .map(|child| {
                        let item = CertaintyItem::new(candidates.len(), index, child.certainty());
                        candidates.push(Some(child));
                        item
                    })
                    .collect();
                decision.add(items);
            }
            for item in self.env.certainty_effect().apply(&decision) {
                if let Some(child) = candidates.get_mut(item.identity).and_then(Option::take) {
                    children.push(child);
                }
            }
        }
        Ok(children)
    }

    /// Connection indices with their effective priorities, best first.
    fn rank(&self, state: &NormalizedState, pointer: &Pointer<'m>, tokens: &[String]) -> Vec<(i32, usize)> {
        let rules = self.env.dynamic_rules();
        let mut ranked: Vec<(i32, usize)> = state
            .static_order()
            .iter()
            .map(|&index| {
                let connection = &state.connections[index];
                let priority = match connection.terminal() {
                    Some(node) if !rules.is_empty() => {
                        let ctx = DynamicContext::new(
                            tokens,
                            pointer.position(),
                            node,
                            connection.priority,
                            pointer.flags(),
                        );
                        rules.evaluate(&ctx)
                    }
                    _ => connection.priority,
                };
                (priority, index)
            })
            .collect();
        ranked.sort_by_key(|&(priority, index)| (Reverse(priority), index));
        ranked
    }

    /// Threads `pointer` through every node of `connection`.
    fn follow(
        &self,
        pointer: &Pointer<'m>,
        connection: &'m NormalizedConnection,
        tokens: &[String],
    ) -> Result<Vec<Pointer<'m>>> {
        let config = self.env.config();
        let mut branches = vec![Branch {
            position: pointer.position(),
            certainty: config.max_certainty,
            steps: Vec::with_capacity(connection.nodes.len()),
            flags: pointer.flags().clone(),
        }];

        for node in &connection.nodes {
            let mut next = Vec::new();
            for mut branch in branches {
                match &node.label {
                    ConnectionLabel::Automatic(_) => {
                        branch.steps.push(Step::automatic(node, branch.position));
                        next.push(branch);
                    }
                    ConnectionLabel::Word(word) => {
                        let analyzer = self.env.word_analyzer(word);
                        self.run(analyzer.as_ref(), node, &branch, pointer, tokens, &mut next)?;
                    }
                    ConnectionLabel::Matching(name) => {
                        let analyzer = self
                            .env
                            .matching(name)
                            .ok_or_else(|| Error::new(ErrorKind::UnknownMatching(name.clone())))?;
                        self.run(analyzer.as_ref(), node, &branch, pointer, tokens, &mut next)?;
                    }
                }
            }
            branches = next;
            if branches.is_empty() {
                break;
            }
        }

        Ok(branches
            .into_iter()
            .filter_map(|branch| {
                let certainty = config.combine(pointer.certainty(), branch.certainty);
                config.is_viable(certainty).then(|| {
                    pointer.advance(
                        connection.destination,
                        branch.position,
                        certainty,
                        branch.steps,
                        branch.flags,
                    )
                })
            })
            .collect())
    }

    /// Invokes one analyzer and extends `branch` with each viable candidate.
    fn run(
        &self,
        analyzer: &dyn Analyzer,
        node: &'m NormalizedNode,
        branch: &Branch<'m>,
        pointer: &Pointer<'m>,
        tokens: &[String],
        out: &mut Vec<Branch<'m>>,
    ) -> Result<()> {
        let config = self.env.config();
        let ctx = MatchContext::new(tokens, branch.position, self.env)
            .with_flags(branch.flags.clone())
            .with_guards(pointer.guards().clone());
        let mut candidates = analyze(analyzer, ctx)?;
        let seed = config.random_seed ^ branch.position as u64;
        analyzer.optimization_strategy().apply(&mut candidates, seed);

        for candidate in candidates {
            if !config.is_viable(candidate.certainty) {
                continue;
            }
            let mut extended = branch.clone();
            extended.steps.push(Step {
                node,
                start: candidate.start,
                end: candidate.end,
                values: candidate.values,
                result: candidate.result,
            });
            extended.position = candidate.end;
            extended.certainty = extended.certainty.min(candidate.certainty);
            extended.flags = candidate.flags;
            out.push(extended);
        }
        Ok(())
    }
}
