//! Symbol table entries and tokens.
//!
//! A [`Symbol`] is one row of a grammar's symbol table: its id, binding
//! power, the pattern that recognizes it, and the behaviors invoked when it
//! starts an expression (nud) or continues one (led). A [`Token`] is a
//! plain record of one recognition; its behaviors are reached through its
//! [`SymbolId`] in the owning grammar.

use crate::error::ParseError;
use crate::oper::Operator;
use crate::parser::Parser;
use crate::span::Span;
use smartstring::alias::String;
use std::fmt;
use std::sync::Arc;

/// Index of a symbol in its grammar's symbol table.
///
/// Ids are stable for the lifetime of the grammar: symbols are never
/// removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    /// The end-of-input symbol, registered first in every grammar.
    pub const END: SymbolId = SymbolId(0);

    /// Position in the symbol table.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Null denotation: invoked when a token starts an expression.
pub type Nud<V> =
    Box<dyn for<'a> Fn(&mut Parser<'a, V>, Token<'a>) -> Result<V, ParseError> + Send + Sync>;

/// Left denotation: invoked when a token follows an already-parsed left operand.
pub type Led<V> =
    Box<dyn for<'a> Fn(&mut Parser<'a, V>, Token<'a>, V) -> Result<V, ParseError> + Send + Sync>;

/// How a symbol is recognized in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Exact text, e.g. an operator or a bracket.
    Literal(String),
    /// A regular expression describing a token class, e.g. numbers.
    Regex(String),
}

impl Pattern {
    /// Regular expression source matching this pattern.
    pub fn regex_source(&self) -> std::string::String {
        match self {
            Pattern::Literal(text) => regex::escape(text),
            Pattern::Regex(source) => source.to_string(),
        }
    }
}

/// One grammar symbol.
pub struct Symbol<V> {
    pub(crate) id: String,
    pub(crate) bp: u32,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) nud: Option<Nud<V>>,
    pub(crate) led: Option<Led<V>>,
    pub(crate) operator: Option<Arc<Operator>>,
}

impl<V> Symbol<V> {
    pub(crate) fn new(id: &str, pattern: Option<Pattern>) -> Self {
        Self {
            id: String::from(id),
            bp: 0,
            pattern,
            nud: None,
            led: None,
            operator: None,
        }
    }

    /// The symbol id: operator text, or a bracketed token class name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Binding power.
    pub fn bp(&self) -> u32 {
        self.bp
    }

    /// Recognition pattern; `None` for the end-of-input symbol.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Whether the symbol can start an expression.
    pub fn has_nud(&self) -> bool {
        self.nud.is_some()
    }

    /// Whether the symbol can continue an expression.
    pub fn has_led(&self) -> bool {
        self.led.is_some()
    }

    /// Operator metadata, for symbols registered as operators.
    pub fn operator(&self) -> Option<&Arc<Operator>> {
        self.operator.as_ref()
    }
}

impl<V> fmt::Debug for Symbol<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("id", &self.id)
            .field("bp", &self.bp)
            .field("pattern", &self.pattern)
            .field("nud", &self.nud.is_some())
            .field("led", &self.led.is_some())
            .field("operator", &self.operator)
            .finish()
    }
}

/// One recognized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Owning symbol.
    pub symbol: SymbolId,
    /// Matched text, without leading whitespace.
    pub text: &'a str,
    /// Bytes occupied by `text`.
    pub span: Span,
    /// Bytes consumed, including skipped leading whitespace.
    pub consumed: usize,
}

impl Token<'_> {
    /// Whether this is the end-of-input token.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.symbol == SymbolId::END
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_patterns_are_escaped() {
        assert_eq!(Pattern::Literal("**".into()).regex_source(), r"\*\*");
        assert_eq!(Pattern::Regex(r"\d+".into()).regex_source(), r"\d+");
    }

    #[test]
    fn debug_hides_behaviors() {
        let sym: Symbol<i64> = Symbol::new("+", Some(Pattern::Literal("+".into())));
        let dbg = format!("{:?}", sym);
        assert!(dbg.contains("nud: false"));
        assert!(dbg.contains("id: \"+\""));
    }
}
