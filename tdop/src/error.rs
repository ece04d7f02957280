//! Error types for grammar configuration and parsing.
//!
//! Two error surfaces exist:
//!
//! - [`GrammarError`] is raised while a [`Grammar`](crate::Grammar) is being
//!   configured or compiled: malformed patterns, conflicting registrations,
//!   reserved or empty ids.
//! - [`ParseError`] is raised by a single parse. It is flattened into a
//!   kind, a message, the full input text, and the byte [`Span`] that caused
//!   it, so the caller can point at the offending fragment.
//!
//! # Examples
//!
//! ```rust
//! # use tdop::{ErrorKind, ParseError, span};
//! let err = ParseError::new(ErrorKind::UnexpectedToken, "unexpected token", "2 + )", span!(4, 5));
//! assert_eq!(err.fragment(), ")");
//! assert!(err.to_string().contains("unexpected token"));
//! assert_eq!(err.report(), "1:5: unexpected token\n2 + )\n    ^");
//! ```

use crate::span::{Position, Span};
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// Classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Non-whitespace input matched no registered pattern.
    UnrecognizedInput,
    /// Input ended where a continuation was required.
    UnexpectedEnd,
    /// A token with no prefix behavior started an expression.
    SyntaxError,
    /// A token with no infix/postfix behavior followed an operand, or input
    /// remained after a complete expression.
    UnexpectedToken,
    /// A required token was missing; another one was found instead.
    Expected,
    /// A literal's conversion function rejected the matched text.
    Literal,
    /// An arithmetic operation rejected its operands.
    Arithmetic,
    /// The grammar could not be compiled.
    Grammar,
    /// Expressions were nested deeper than the grammar allows.
    TooDeep,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::UnrecognizedInput => "unrecognized input",
            ErrorKind::UnexpectedEnd => "unexpected end",
            ErrorKind::SyntaxError => "syntax error",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::Expected => "expected token",
            ErrorKind::Literal => "literal",
            ErrorKind::Arithmetic => "arithmetic",
            ErrorKind::Grammar => "grammar",
            ErrorKind::TooDeep => "too deep",
        })
    }
}

/// A parse failure, attributed to a span of the input.
///
/// Every parse error aborts the parse: there is no recovery and no partial
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {}", .span.display())]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// The complete input of the failed parse.
    pub input: std::string::String,
    /// Offending byte range of `input`.
    pub span: Span,
}

impl ParseError {
    /// Creates a new `ParseError`.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        input: impl Into<std::string::String>,
        span: Span,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            input: input.into(),
            span,
        }
    }

    /// Wraps any displayable error, keeping its message.
    pub fn from_err<E>(kind: ErrorKind, err: E, input: &str, span: Span) -> Self
    where
        E: fmt::Display,
    {
        Self::new(kind, err.to_string().as_str(), input, span)
    }

    /// The offending substring, `input[start..end]`.
    ///
    /// Returns an empty string if the span does not fall on character
    /// boundaries of the input.
    pub fn fragment(&self) -> &str {
        self.input.get(self.span.range()).unwrap_or("")
    }

    /// Line/column where the offending fragment starts.
    pub fn start(&self) -> Position {
        Position::locate(&self.input, self.span.start)
    }

    /// Line/column where the offending fragment ends.
    pub fn end(&self) -> Position {
        Position::locate(&self.input, self.span.end)
    }

    /// Renders the message, the offending input line and a caret underline.
    ///
    /// Line and column in the header are 1-based.
    pub fn report(&self) -> std::string::String {
        let start = self.start();
        let line = self.input.lines().nth(start.line).unwrap_or("");
        let width = self
            .fragment()
            .split('\n')
            .next()
            .map_or(0, |s| s.chars().count())
            .max(1);
        format!(
            "{}:{}: {}\n{}\n{}{}",
            start.line + 1,
            start.column + 1,
            self.message,
            line,
            " ".repeat(start.column),
            "^".repeat(width)
        )
    }
}

/// Errors raised while configuring or compiling a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Symbol ids must be non-empty.
    #[error("symbol id must not be empty")]
    EmptyId,

    /// The id is reserved by the grammar itself (the end-of-input symbol).
    #[error("symbol id {0:?} is reserved")]
    Reserved(String),

    /// A token pattern is not a valid regular expression.
    #[error("invalid pattern for {id:?}: {message}")]
    InvalidPattern {
        /// Token id.
        id: String,
        /// Regex syntax error.
        message: String,
    },

    /// A token pattern can match the empty string, which would never advance.
    #[error("pattern for {id:?} matches the empty string")]
    EmptyMatch {
        /// Token id.
        id: String,
    },

    /// A token id was registered again with a different pattern.
    #[error("token {id:?} is already registered with pattern {existing:?}")]
    PatternConflict {
        /// Token id.
        id: String,
        /// The pattern already on record.
        existing: String,
    },

    /// The combined recognizer could not be built.
    #[error("can't build recognizer: {0}")]
    Build(String),
}
