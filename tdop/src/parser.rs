//! The Pratt expression loop.
//!
//! A [`Parser`] drives one parse of one input string against a compiled
//! [`Grammar`]. It owns only its cursor, a single token of lookahead, and
//! statistics; the grammar is borrowed read-only, so any number of parsers
//! may run against the same grammar concurrently.
//!
//! # Algorithm
//!
//! [`Parser::expression`] consumes a token and invokes its nud to obtain a
//! left operand. Then, while the binding power of the lookahead token is
//! strictly greater than `min_bp`, it consumes that token and invokes its
//! led with the current left operand. The end-of-input token has binding
//! power `0`, which stops every level of recursion.
//!
//! Behaviors registered on the grammar receive `&mut Parser` and call back
//! into [`expression`](Parser::expression), [`take`](Parser::take) and
//! [`take_expected`](Parser::take_expected) to consume their operands.

use crate::error::{ErrorKind, ParseError};
use crate::grammar::Grammar;
use crate::recognizer::Recognizer;
use crate::span::Span;
use crate::symbol::{SymbolId, Token};
use smartstring::alias::String;

/// Counters collected during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Tokens consumed, including the end-of-input token when taken.
    pub tokens: usize,
    /// Null denotations invoked.
    pub nuds: usize,
    /// Left denotations invoked.
    pub leds: usize,
    /// Deepest nesting of [`Parser::expression`] calls.
    pub depth: usize,
}

/// State of one parse.
pub struct Parser<'a, V> {
    grammar: &'a Grammar<V>,
    recognizer: &'a Recognizer,
    input: &'a str,
    position: usize,
    lookahead: Option<Token<'a>>,
    last: Option<Span>,
    depth: usize,
    stats: ParserStats,
}

impl<'a, V> Parser<'a, V> {
    pub(crate) fn new(grammar: &'a Grammar<V>, recognizer: &'a Recognizer, input: &'a str) -> Self {
        Self {
            grammar,
            recognizer,
            input,
            position: 0,
            lookahead: None,
            last: None,
            depth: 0,
            stats: ParserStats::default(),
        }
    }

    /// The grammar driving this parse.
    pub fn grammar(&self) -> &'a Grammar<V> {
        self.grammar
    }

    /// The complete input text.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset just past the last recognized token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Counters collected so far.
    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    fn recognize(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.position;
        match self.recognizer.recognize(self.input, start) {
            Ok(Some((symbol, span))) => {
                self.position = span.end;
                Ok(Token {
                    symbol,
                    text: &self.input[span.range()],
                    span,
                    consumed: span.end - start,
                })
            }
            Ok(None) => {
                self.position = self.input.len();
                Ok(Token {
                    symbol: SymbolId::END,
                    text: "",
                    span: Span::at(self.input.len()),
                    consumed: self.input.len() - start,
                })
            }
            Err(span) => Err(self.error_at(ErrorKind::UnrecognizedInput, "unrecognized input", span)),
        }
    }

    /// Returns the lookahead token without consuming it.
    pub fn peek(&mut self) -> Result<Token<'a>, ParseError> {
        match self.lookahead {
            Some(token) => Ok(token),
            None => {
                let token = self.recognize()?;
                self.lookahead = Some(token);
                Ok(token)
            }
        }
    }

    /// Consumes the lookahead token.
    ///
    /// At the end of input this keeps returning the end-of-input token.
    pub fn take(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.peek()?;
        self.lookahead = None;
        self.last = Some(token.span);
        self.stats.tokens += 1;
        Ok(token)
    }

    /// Consumes the lookahead token, requiring its symbol id to be `expected`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnexpectedEnd`] if the input is exhausted, or
    /// [`ErrorKind::Expected`] attributed to the lookahead token if it is a
    /// different symbol.
    pub fn take_expected(&mut self, expected: &str) -> Result<Token<'a>, ParseError> {
        let token = self.peek()?;
        if token.is_end() {
            return Err(self.error_at(
                ErrorKind::UnexpectedEnd,
                format!("unexpected end of input, expecting {}", expected),
                token.span,
            ));
        }
        if self.grammar.get(token.symbol).id() != expected {
            return Err(self.error_at(
                ErrorKind::Expected,
                format!("unexpected token, expecting {}", expected),
                token.span,
            ));
        }
        self.take()
    }

    /// Parses an expression whose operators all bind tighter than `min_bp`.
    ///
    /// # Errors
    ///
    /// Besides the errors of the behaviors it invokes,
    /// [`ErrorKind::TooDeep`] attributed to the first token past the
    /// grammar's [`max_depth`](Grammar::max_depth).
    pub fn expression(&mut self, min_bp: u32) -> Result<V, ParseError> {
        self.depth += 1;
        self.stats.depth = self.stats.depth.max(self.depth);
        if self.depth > self.grammar.max_depth() {
            let token = self.peek()?;
            return Err(self.error_at(
                ErrorKind::TooDeep,
                "expression nested too deeply",
                token.span,
            ));
        }

        let token = self.take()?;
        let left = self.nud(token)?;
        let value = self.continue_expression(left, min_bp)?;

        self.depth -= 1;
        Ok(value)
    }

    /// Continues an expression whose first operand `left` was already
    /// parsed, applying leds while the lookahead binds tighter than `min_bp`.
    pub fn continue_expression(&mut self, left: V, min_bp: u32) -> Result<V, ParseError> {
        let mut left = left;
        loop {
            let next = self.peek()?;
            if min_bp >= self.grammar.get(next.symbol).bp() {
                break;
            }
            let token = self.take()?;
            left = self.led(token, left)?;
        }
        Ok(left)
    }

    fn nud(&mut self, token: Token<'a>) -> Result<V, ParseError> {
        let grammar = self.grammar;
        let symbol = grammar.get(token.symbol);
        log::trace!("Nud {:?} {:?}", symbol.id(), token.text);
        self.stats.nuds += 1;
        match &symbol.nud {
            Some(nud) => nud(self, token),
            None if token.is_end() => Err(self.error_at(
                ErrorKind::UnexpectedEnd,
                "unexpected end of input",
                token.span,
            )),
            None => Err(self.error_at(ErrorKind::SyntaxError, "syntax error", token.span)),
        }
    }

    fn led(&mut self, token: Token<'a>, left: V) -> Result<V, ParseError> {
        let grammar = self.grammar;
        let symbol = grammar.get(token.symbol);
        log::trace!("Led {:?} {:?}", symbol.id(), token.text);
        self.stats.leds += 1;
        match &symbol.led {
            Some(led) => led(self, token, left),
            None => Err(self.error_at(ErrorKind::UnexpectedToken, "unexpected token", token.span)),
        }
    }

    /// Parses a complete input: one expression followed by end of input.
    pub(crate) fn parse(&mut self) -> Result<V, ParseError> {
        let value = self.expression(0)?;
        let next = self.peek()?;
        if !next.is_end() {
            return Err(self.error_at(ErrorKind::UnexpectedToken, "unexpected token", next.span));
        }
        Ok(value)
    }

    /// Builds an error attributed to the most recently consumed token, or
    /// to the rest of the input if nothing was consumed yet.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        let span = self
            .last
            .unwrap_or_else(|| Span::new(self.position, self.input.len()));
        self.error_at(kind, message, span)
    }

    /// Builds an error attributed to `span`.
    pub fn error_at(&self, kind: ErrorKind, message: impl Into<String>, span: Span) -> ParseError {
        ParseError::new(kind, message, self.input, span)
    }
}
