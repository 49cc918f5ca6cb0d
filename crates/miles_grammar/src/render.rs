//! Renderings of grammar trees.
//!
//! - [`Display`](std::fmt::Display) produces the debug form, e.g.
//!   `(ROOT:(SEQUENCE:(WORD:HELLO)))`
//! - [`CommandComponent::to_grammar_text`] produces grammar text that parses
//!   back to the same tree
//! - [`CommandComponent::canonical_sentence`] produces one input sentence the
//!   grammar accepts

use std::fmt;

use crate::ast::CommandComponent;

impl fmt::Display for CommandComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(text) => write!(f, "(WORD:{text})"),
            Self::Matching(name) => write!(f, "(MATCHING:{name})"),
            Self::Named(name, inner) => write!(f, "({name}={inner})"),
            Self::Sequence(children) | Self::Choice(children) => {
                write!(f, "({}:", self.kind_name())?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Self::Optional(inner) | Self::List(inner) | Self::Root(inner) => {
                write!(f, "({}:{inner})", self.kind_name())
            }
        }
    }
}

impl CommandComponent {
    /// Renders this tree back to grammar syntax.
    #[must_use]
    pub fn to_grammar_text(&self) -> String {
        match self {
            Self::Word(text) => text.clone(),
            Self::Matching(name) => name.clone(),
            Self::Named(name, inner) => format!("{name}={}", inner.to_grammar_text()),
            Self::Sequence(children) => children
                .iter()
                .map(Self::to_grammar_text)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Optional(inner) => format!("{{{}}}", inner.to_grammar_text()),
            Self::List(inner) => format!("[{}]", inner.to_grammar_text()),
            Self::Choice(options) => format!(
                "({})",
                options
                    .iter()
                    .map(Self::to_grammar_text)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Root(inner) => inner.to_grammar_text(),
        }
    }

    /// Returns the simplest sentence this grammar accepts, as lowercase tokens.
    ///
    /// Optionals are skipped, lists are taken once and choices take their
    /// first option. Returns `None` if the sentence would need a placeholder.
    #[must_use]
    pub fn canonical_sentence(&self) -> Option<Vec<String>> {
        let mut tokens = Vec::new();
        self.collect_sentence(&mut tokens).then_some(tokens)
    }

    fn collect_sentence(&self, tokens: &mut Vec<String>) -> bool {
        match self {
            Self::Word(text) => {
                tokens.push(text.to_lowercase());
                true
            }
            Self::Matching(_) => false,
            Self::Optional(_) => true,
            Self::Named(_, inner) | Self::List(inner) | Self::Root(inner) => {
                inner.collect_sentence(tokens)
            }
            Self::Sequence(children) => children.iter().all(|c| c.collect_sentence(tokens)),
            Self::Choice(options) => options.first().is_some_and(|o| o.collect_sentence(tokens)),
        }
    }
}
