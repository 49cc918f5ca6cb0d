//! Parser for the grammar syntax.
//!
//! ```text
//! root     := sequence EOF
//! sequence := expr+
//! expr     := WORD
//!           | MATCHING
//!           | MATCHING '=' expr
//!           | '(' sequence (',' sequence)* ')'
//!           | '[' sequence ']'
//!           | '{' sequence '}'
//! ```

use miles_foundation::{Error, Result};

use crate::ast::CommandComponent;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for grammar text.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source text (for error fragments).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
        }
    }

    /// Parses the whole source into a [`CommandComponent::Root`].
    ///
    /// # Errors
    /// Returns a grammar syntax error citing the offending substring.
    pub fn parse(&mut self) -> Result<CommandComponent> {
        if self.current.kind == TokenKind::Eof {
            return Err(self.error("empty grammar"));
        }
        let sequence = self.parse_sequence()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.error(&format!("unexpected {}", self.current.kind.name())));
        }
        Ok(CommandComponent::Root(Box::new(sequence)))
    }

    /// Parses one or more expressions up to a closing delimiter, comma, or end.
    fn parse_sequence(&mut self) -> Result<CommandComponent> {
        let mut children = Vec::new();
        while !self.current.ends_sequence() {
            children.push(self.parse_expr()?);
        }
        if children.is_empty() {
            return Err(self.error(&format!(
                "expected a word, placeholder or group, found {}",
                self.current.kind.name()
            )));
        }
        Ok(CommandComponent::Sequence(children))
    }

    fn parse_expr(&mut self) -> Result<CommandComponent> {
        match &self.current.kind {
            TokenKind::Word(text) => {
                let text = text.clone();
                self.advance();
                Ok(CommandComponent::Word(text))
            }
            TokenKind::Matching(name) => {
                let name = name.clone();
                let span = self.current.span;
                self.advance();
                if self.current.kind == TokenKind::Equals {
                    self.advance();
                    if self.current.ends_sequence() || self.current.kind == TokenKind::Equals {
                        return Err(self.error_at(
                            span.to(self.current.span),
                            &format!("capture {name} has nothing to capture"),
                        ));
                    }
                    let inner = self.parse_expr()?;
                    Ok(CommandComponent::Named(name, Box::new(inner)))
                } else {
                    Ok(CommandComponent::Matching(name))
                }
            }
            TokenKind::LParen => self.parse_choice(),
            TokenKind::LBracket => {
                let inner = self.parse_group(&TokenKind::LBracket, &TokenKind::RBracket)?;
                Ok(CommandComponent::List(Box::new(inner)))
            }
            TokenKind::LBrace => {
                let inner = self.parse_group(&TokenKind::LBrace, &TokenKind::RBrace)?;
                Ok(CommandComponent::Optional(Box::new(inner)))
            }
            TokenKind::Error(msg) => Err(self.error(&msg.clone())),
            other => Err(self.error(&format!("unexpected {}", other.name()))),
        }
    }

    /// Parses `open sequence close`.
    fn parse_group(&mut self, open: &TokenKind, close: &TokenKind) -> Result<CommandComponent> {
        let start = self.current.span;
        self.expect(open)?;
        let inner = self.parse_sequence()?;
        self.expect_closing(close, start)?;
        Ok(inner)
    }

    /// Parses `( sequence (, sequence)* )`.
    fn parse_choice(&mut self) -> Result<CommandComponent> {
        let start = self.current.span;
        self.expect(&TokenKind::LParen)?;
        let mut options = vec![self.parse_sequence()?];
        while self.current.kind == TokenKind::Comma {
            self.advance();
            options.push(self.parse_sequence()?);
        }
        self.expect_closing(&TokenKind::RParen, start)?;
        Ok(CommandComponent::Choice(options))
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        if &self.current.kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.current.kind.name()
            )))
        }
    }

    /// Like [`Self::expect`], but an unclosed group cites the group itself.
    fn expect_closing(&mut self, expected: &TokenKind, opened: Span) -> Result<()> {
        if self.current.kind == TokenKind::Eof {
            return Err(self.error_at(
                opened.to(self.current.span),
                &format!("unclosed group, expected {}", expected.name()),
            ));
        }
        self.expect(expected)
    }

    /// Creates a syntax error at the current token.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a syntax error citing the text under `span`.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::grammar_syntax(message, span.text(self.source), span.start)
    }
}

/// Parses grammar text into a [`CommandComponent::Root`].
///
/// # Errors
/// Returns a grammar syntax error if the text is malformed.
pub fn parse_grammar(source: &str) -> Result<CommandComponent> {
    Parser::new(source).parse()
}
