//! The view of the input handed to placeholder analyzers.
//!
//! An analyzer moves a cursor over the remaining tokens and emits
//! [`Candidate`]s: each candidate is one way the placeholder could end,
//! with the tokens it consumed, a certainty and an optional result value.
//!
//! ```text
//! consume / ignore     move the cursor
//! interrupt            emit the cursor as a candidate, keep going
//! variant(n, c)        emit cursor + n as a candidate, don't move
//! fail                 drop everything
//! ```
//!
//! When the analyzer returns, the cursor itself is emitted as a final
//! candidate unless the analyzer failed or never consumed anything. An
//! analyzer that fails with an error aborts the whole search.

use miles_foundation::{Error, Flags, Result, Value};
use tracing::warn;

use crate::env::Environment;
use crate::extended::ExtendedGrammar;
use crate::structure::CommandStructure;

/// Extended grammars currently being recognized, with the position each
/// was entered at.
pub type Guards = im::Vector<(String, usize)>;

/// One way a placeholder could end.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Position the placeholder started at.
    pub start: usize,
    /// Position after the placeholder.
    pub end: usize,
    /// Tokens recorded as the placeholder's text.
    pub values: Vec<String>,
    /// Certainty in `0..=100`.
    pub certainty: f64,
    /// Value set by the analyzer.
    pub result: Option<Value>,
    /// Flags as the analyzer left them.
    pub flags: Flags,
}

impl Candidate {
    /// Number of tokens the placeholder spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the placeholder spans no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Cursor and output buffer for one analyzer invocation.
pub struct MatchContext<'r> {
    tokens: &'r [String],
    env: &'r Environment,
    start: usize,
    position: usize,
    consumed: Vec<String>,
    certainty: f64,
    result: Option<Value>,
    flags: Flags,
    guards: Guards,
    failed: bool,
    error: Option<Error>,
    candidates: Vec<Candidate>,
}

impl<'r> MatchContext<'r> {
    /// Creates a context positioned at `position`.
    #[must_use]
    pub fn new(tokens: &'r [String], position: usize, env: &'r Environment) -> Self {
        let position = position.min(tokens.len());
        Self {
            tokens,
            env,
            start: position,
            position,
            consumed: Vec::new(),
            certainty: 0.0,
            result: None,
            flags: Flags::new(),
            guards: Guards::new(),
            failed: false,
            error: None,
            candidates: Vec::new(),
        }
    }

    /// Replaces the flag bag.
    #[must_use]
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) fn with_guards(mut self, guards: Guards) -> Self {
        self.guards = guards;
        self
    }

    // ===== Input =====

    /// The token under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&'r str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    /// Up to `n` tokens starting at the cursor.
    #[must_use]
    pub fn lookahead(&self, n: usize) -> &'r [String] {
        let end = (self.position + n).min(self.tokens.len());
        &self.tokens[self.position..end]
    }

    /// Number of tokens after the cursor, inclusive.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    /// Returns true if any token remains.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Returns true if no token remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_any()
    }

    /// The whole token stream.
    #[must_use]
    pub fn tokens(&self) -> &'r [String] {
        self.tokens
    }

    /// Cursor position within [`MatchContext::tokens`].
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position the placeholder started at.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Tokens consumed so far.
    #[must_use]
    pub fn consumed(&self) -> &[String] {
        &self.consumed
    }

    // ===== Cursor =====

    /// Consumes `n` tokens with full certainty.
    pub fn consume(&mut self, n: usize) {
        let max = self.env.config().max_certainty;
        self.consume_with_certainty(n, max);
    }

    /// Consumes `n` tokens, recording `certainty` for the match.
    pub fn consume_with_certainty(&mut self, n: usize, certainty: f64) {
        if self.failed {
            return;
        }
        let end = (self.position + n).min(self.tokens.len());
        self.consumed
            .extend(self.tokens[self.position..end].iter().cloned());
        self.position = end;
        self.certainty = certainty;
    }

    /// Skips `n` tokens without recording them as the placeholder's text.
    pub fn ignore(&mut self, n: usize) {
        if self.failed {
            return;
        }
        self.position = (self.position + n).min(self.tokens.len());
        self.certainty = self.env.config().max_certainty;
    }

    /// Emits the cursor as a candidate and keeps going.
    pub fn interrupt(&mut self) {
        if self.failed {
            return;
        }
        let candidate = self.snapshot(self.position, self.consumed.clone(), self.certainty);
        self.candidates.push(candidate);
    }

    /// Emits a candidate `n` tokens past the cursor without moving it.
    pub fn variant(&mut self, n: usize, certainty: f64) {
        if self.failed {
            return;
        }
        let end = (self.position + n).min(self.tokens.len());
        let mut values = self.consumed.clone();
        values.extend(self.tokens[self.position..end].iter().cloned());
        let candidate = self.snapshot(end, values, certainty);
        self.candidates.push(candidate);
    }

    /// Rejects the input. Candidates already emitted are discarded.
    pub fn fail(&mut self) {
        self.failed = true;
    }

    /// Rejects the input and hands `error` to whoever runs the analyzer.
    /// Only the first error is kept.
    pub fn fail_with(&mut self, error: Error) {
        self.failed = true;
        self.error.get_or_insert(error);
    }

    /// Returns true once [`MatchContext::fail`] or
    /// [`MatchContext::fail_with`] has been called.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    // ===== Results =====

    /// Sets the value attached to candidates emitted from now on.
    pub fn set_result(&mut self, value: impl Into<Value>) {
        self.result = Some(value.into());
    }

    /// The current result value.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// The caller's flag bag.
    #[must_use]
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Mutable access to this branch's copy of the flag bag.
    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    /// Recognizes `grammar` at the cursor with this namespace's analyzers,
    /// returning every structure that matches a prefix of the remaining
    /// input, in search order.
    ///
    /// Entering the same grammar again at the same position yields nothing.
    ///
    /// # Errors
    /// Returns an error if `grammar` does not compile against this
    /// namespace or its search reaches a placeholder with no analyzer.
    pub fn extended(&self, grammar: &ExtendedGrammar) -> Result<Vec<CommandStructure>> {
        let key = (grammar.title().to_string(), self.position);
        if self.guards.contains(&key) {
            warn!(
                grammar = grammar.title(),
                position = self.position,
                "extended grammar re-entered at the same position"
            );
            return Ok(Vec::new());
        }
        let mut guards = self.guards.clone();
        guards.push_back(key);
        grammar.recognize(self.env, self.tokens, self.position, &self.flags, guards)
    }

    /// The namespace environment the search runs in.
    #[must_use]
    pub fn environment(&self) -> &'r Environment {
        self.env
    }

    // ===== Output =====

    fn snapshot(&self, end: usize, values: Vec<String>, certainty: f64) -> Candidate {
        Candidate {
            start: self.start,
            end,
            values,
            certainty,
            result: self.result.clone(),
            flags: self.flags.clone(),
        }
    }

    /// Ends the invocation and returns the emitted candidates, including
    /// the implicit final one.
    ///
    /// # Errors
    /// Returns the error recorded by [`MatchContext::fail_with`].
    pub fn finish(mut self) -> Result<Vec<Candidate>> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if self.failed {
            return Ok(Vec::new());
        }
        if self.certainty > 0.0 {
            let consumed = std::mem::take(&mut self.consumed);
            let last = self.snapshot(self.position, consumed, self.certainty);
            self.candidates.push(last);
        }
        Ok(self.candidates)
    }
}
