//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! A table-driven operator precedence (Pratt / TDOP) expression parser that
//! evaluates as it parses.
//!
//! ## Overview
//!
//! Grammar rules produce domain values directly: a literal's conversion
//! function, or an operator's nud/led behavior, returns the value of type
//! `V` that the rule denotes. There is no separate syntax tree and no
//! evaluation pass, unless `V` itself is a tree (see [`Expression`]).
//!
//! - [`Grammar`]: the mutable symbol table and builder API (`symbol`,
//!   `token`, `literal`, `prefix`, `postfix`, `infixl`, `infixr`,
//!   `operator`).
//! - [`Recognizer`]: the compiled multi-pattern tokenizer.
//! - [`Parser`]: one parse: lookahead, error attribution, and the Pratt
//!   loop [`Parser::expression`].
//! - [`Expression`] / [`Term`]: n-ary operator nodes with associative
//!   flattening, rendering and tagged serialization.
//! - [`ParseError`] / [`GrammarError`]: parse and configuration failures.
//!
//! ## Example
//!
//! ```rust
//! use tdop::{ErrorKind, Grammar};
//!
//! let mut g: Grammar<i64> = Grammar::new();
//! g.literal("int", r"\d+", |s| s.parse::<i64>()).unwrap();
//! g.led("+", 50, |p, _, left| Ok(left + p.expression(50)?)).unwrap();
//! g.led("*", 60, |p, _, left| Ok(left * p.expression(60)?)).unwrap();
//! g.nud("-", |p, _| Ok(-p.expression(70)?)).unwrap();
//!
//! assert_eq!(g.parse("2 + 3 * 4").unwrap(), 14);
//! assert_eq!(g.parse("-2 * 3").unwrap(), -6);
//!
//! let err = g.parse("2 + * 4").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::SyntaxError);
//! assert_eq!(err.fragment(), "*");
//! ```

pub mod error;
pub mod expression;
pub mod grammar;
pub mod oper;
pub mod parser;
pub mod recognizer;
pub mod span;
pub mod symbol;

pub use error::{ErrorKind, GrammarError, ParseError};
pub use expression::{Expression, Term};
pub use grammar::{DEFAULT_MAX_DEPTH, END, Grammar};
pub use oper::{Assoc, Fixity, Operator, ParseAssocError, ParseFixityError};
pub use parser::{Parser, ParserStats};
pub use recognizer::Recognizer;
pub use span::{Position, Span};
pub use symbol::{Led, Nud, Pattern, Symbol, SymbolId, Token};
