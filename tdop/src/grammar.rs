//! Grammar symbol table and builder API.
//!
//! A [`Grammar`] owns an ordered table of [`Symbol`]s keyed by id and a
//! lazily compiled [`Recognizer`]. It has two phases:
//!
//! 1. **Building** (`&mut self`): [`symbol`](Grammar::symbol),
//!    [`token`](Grammar::token), [`literal`](Grammar::literal),
//!    [`prefix`](Grammar::prefix), [`postfix`](Grammar::postfix),
//!    [`infixl`](Grammar::infixl), [`infixr`](Grammar::infixr),
//!    [`operator`](Grammar::operator), and the raw [`nud`](Grammar::nud) /
//!    [`led`](Grammar::led) installers. Adding a symbol or raising a binding
//!    power drops the compiled recognizer.
//! 2. **Parsing** (`&self`): [`parse`](Grammar::parse) compiles the
//!    recognizer on first use and then only reads the grammar, so a finished
//!    grammar can be shared between threads (e.g. in a `static`).
//!
//! # Registration policy
//!
//! Re-registering an id merges into the existing symbol: the binding power
//! is raised if the new one is higher and never lowered, and behaviors are
//! replaced only by calls that install one. Registering a token id again
//! with a different pattern is a [`GrammarError::PatternConflict`].
//!
//! Ids of the form `(name)` denote token classes; they are never recognized
//! as literal text. `(end)` is the end-of-input symbol.
//!
//! # Examples
//!
//! ```rust
//! use tdop::Grammar;
//!
//! let mut g: Grammar<f64> = Grammar::new();
//! g.literal("number", r"\d+(\.\d+)?", |s| s.parse::<f64>()).unwrap();
//! g.led("+", 10, |p, _, left| Ok(left + p.expression(10)?)).unwrap();
//! g.led("*", 20, |p, _, left| Ok(left * p.expression(20)?)).unwrap();
//! assert_eq!(g.parse("1.5 + 2 * 3").unwrap(), 7.5);
//! ```

use crate::error::{ErrorKind, GrammarError, ParseError};
use crate::expression::{Expression, Term};
use crate::oper::{Assoc, Operator};
use crate::parser::{Parser, ParserStats};
use crate::recognizer::{self, Recognizer};
use crate::span::Span;
use crate::symbol::{Pattern, Symbol, SymbolId, Token};
use indexmap::IndexMap;
use indexmap::map::Entry;
use once_cell::sync::OnceCell;
use smartstring::alias::String;
use std::fmt;
use std::sync::Arc;

/// Id of the end-of-input symbol.
pub const END: &str = "(end)";

/// Default limit on expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

fn is_class_name(id: &str) -> bool {
    id.len() > 2 && id.starts_with('(') && id.ends_with(')')
}

fn class_id(name: &str) -> String {
    let mut id = String::from("(");
    id.push_str(name);
    id.push(')');
    id
}

/// A table-driven operator precedence grammar producing values of type `V`.
pub struct Grammar<V> {
    symbols: IndexMap<String, Symbol<V>>,
    recognizer: OnceCell<Recognizer>,
    max_depth: usize,
}

impl<V> Default for Grammar<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("symbols", &self.symbols.values().collect::<Vec<_>>())
            .field("compiled", &self.is_compiled())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<V> Grammar<V> {
    /// Creates a grammar containing only the end-of-input symbol.
    pub fn new() -> Self {
        let mut symbols = IndexMap::new();
        symbols.insert(String::from(END), Symbol::new(END, None));
        Self {
            symbols,
            recognizer: OnceCell::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Deepest nesting of [`Parser::expression`] calls a parse may reach.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Limits how deeply expressions may nest. Deeper input fails with
    /// [`ErrorKind::TooDeep`] instead of exhausting the stack.
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    fn invalidate(&mut self) {
        if self.recognizer.take().is_some() {
            log::debug!("Recognizer invalidated");
        }
    }

    fn raise(&mut self, id: SymbolId, bp: u32) {
        let symbol = &mut self.symbols[id.0];
        if bp > symbol.bp {
            log::trace!("Symbol {:?} bp {} -> {}", symbol.id, symbol.bp, bp);
            symbol.bp = bp;
            self.invalidate();
        }
    }

    fn get_mut(&mut self, id: SymbolId) -> &mut Symbol<V> {
        &mut self.symbols[id.0]
    }

    /// Registers a symbol, or raises the binding power of an existing one.
    ///
    /// A new symbol is recognized by its literal id text, unless the id is a
    /// `(name)` token class, which gets its pattern from [`token`](Self::token).
    ///
    /// # Errors
    ///
    /// [`GrammarError::EmptyId`] for an empty id.
    pub fn symbol(&mut self, id: &str, bp: u32) -> Result<SymbolId, GrammarError> {
        if id.is_empty() {
            return Err(GrammarError::EmptyId);
        }
        let sid = match self.symbols.get_index_of(id) {
            Some(index) => SymbolId(index),
            None => {
                let pattern = (!is_class_name(id)).then(|| Pattern::Literal(String::from(id)));
                let index = self.symbols.len();
                self.symbols.insert(String::from(id), Symbol::new(id, pattern));
                log::trace!("Symbol {:?} added", id);
                self.invalidate();
                SymbolId(index)
            }
        };
        self.raise(sid, bp);
        Ok(sid)
    }

    /// Registers the token class `(name)` recognized by the regular
    /// expression `pattern`, with binding power 0 and no behaviors.
    ///
    /// # Errors
    ///
    /// Invalid or empty-matching patterns, a different pattern already
    /// registered for the same name, or the reserved name `end`.
    pub fn token(&mut self, name: &str, pattern: &str) -> Result<SymbolId, GrammarError> {
        if name.is_empty() {
            return Err(GrammarError::EmptyId);
        }
        let id = class_id(name);
        if id == END {
            return Err(GrammarError::Reserved(id));
        }
        let pattern = Pattern::Regex(String::from(pattern));
        recognizer::validate(&id, &pattern)?;
        match self.symbols.entry(id.clone()) {
            Entry::Occupied(mut o) => {
                let index = o.index();
                match &o.get().pattern {
                    Some(existing) if *existing == pattern => {}
                    Some(existing) => {
                        return Err(GrammarError::PatternConflict {
                            id,
                            existing: String::from(existing.regex_source().as_str()),
                        });
                    }
                    None => {
                        o.get_mut().pattern = Some(pattern);
                        self.invalidate();
                    }
                }
                Ok(SymbolId(index))
            }
            Entry::Vacant(v) => {
                let index = v.index();
                v.insert(Symbol::new(&id, Some(pattern)));
                log::trace!("Token {:?} added", id);
                self.invalidate();
                Ok(SymbolId(index))
            }
        }
    }

    /// Installs the null denotation of `id`, registering it if needed.
    pub fn nud<F>(&mut self, id: &str, nud: F) -> Result<SymbolId, GrammarError>
    where
        F: for<'a> Fn(&mut Parser<'a, V>, Token<'a>) -> Result<V, ParseError> + Send + Sync + 'static,
    {
        let sid = self.symbol(id, 0)?;
        self.get_mut(sid).nud = Some(Box::new(nud));
        Ok(sid)
    }

    /// Installs the left denotation of `id`, registering it if needed and
    /// raising its binding power to `bp`.
    pub fn led<F>(&mut self, id: &str, bp: u32, led: F) -> Result<SymbolId, GrammarError>
    where
        F: for<'a> Fn(&mut Parser<'a, V>, Token<'a>, V) -> Result<V, ParseError>
            + Send
            + Sync
            + 'static,
    {
        let sid = self.symbol(id, bp)?;
        self.get_mut(sid).led = Some(Box::new(led));
        Ok(sid)
    }

    /// Registers the token class `(name)` whose matched text is turned into a
    /// value by `convert`.
    ///
    /// A conversion failure becomes an [`ErrorKind::Literal`] parse error
    /// carrying the converter's message, attributed to the token.
    pub fn literal<F, E>(&mut self, name: &str, pattern: &str, convert: F) -> Result<SymbolId, GrammarError>
    where
        F: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        E: fmt::Display,
        V: 'static,
    {
        self.token(name, pattern)?;
        self.nud(&class_id(name), move |parser, token| {
            convert(token.text)
                .map_err(|e| ParseError::from_err(ErrorKind::Literal, e, parser.input(), token.span))
        })
    }

    /// Looks up a symbol id.
    pub fn lookup(&self, id: &str) -> Option<SymbolId> {
        self.symbols.get_index_of(id).map(SymbolId)
    }

    /// The symbol with index `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this grammar.
    pub fn get(&self, id: SymbolId) -> &Symbol<V> {
        &self.symbols[id.0]
    }

    /// Binding power of `id`, if registered.
    pub fn binding_power(&self, id: &str) -> Option<u32> {
        self.symbols.get(id).map(Symbol::bp)
    }

    /// All symbols, in registration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol<V>> {
        self.symbols.values()
    }

    /// Number of symbols, including the end-of-input symbol.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`: the end-of-input symbol is always present.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether a recognizer for the current table is compiled.
    pub fn is_compiled(&self) -> bool {
        self.recognizer.get().is_some()
    }

    /// Compiles the recognizer now rather than on the first parse.
    pub fn compile(&self) -> Result<&Recognizer, GrammarError> {
        self.recognizer
            .get_or_try_init(|| Recognizer::compile(&self.symbols))
    }

    /// Parses `input` into a value.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`]; the whole input must form one expression.
    pub fn parse(&self, input: &str) -> Result<V, ParseError> {
        self.parse_with_stats(input).map(|(value, _)| value)
    }

    /// Parses `input`, also returning the parser's counters.
    pub fn parse_with_stats(&self, input: &str) -> Result<(V, ParserStats), ParseError> {
        let recognizer = self.compile().map_err(|e| {
            ParseError::from_err(ErrorKind::Grammar, e, input, Span::new(0, input.len()))
        })?;
        let mut parser = Parser::new(self, recognizer, input);
        let value = parser.parse()?;
        Ok((value, parser.stats().clone()))
    }
}

impl<V: Term + 'static> Grammar<V> {
    fn attach(&mut self, operator: Operator, bp: u32) -> Result<Arc<Operator>, GrammarError> {
        let sid = self.symbol(&operator.symbol, bp)?;
        let operator = Arc::new(operator);
        self.get_mut(sid).operator = Some(Arc::clone(&operator));
        Ok(operator)
    }

    /// Registers a prefix operator: its nud parses an operand at `bp` and
    /// wraps it in a prefix [`Expression`].
    ///
    /// The symbol's own (infix) binding power is not changed.
    pub fn prefix(&mut self, id: &str, bp: u32) -> Result<SymbolId, GrammarError> {
        let operator = self.attach(Operator::prefix(id, bp), 0)?;
        self.nud(id, move |parser, _| {
            let operand = parser.expression(operator.bp)?;
            Ok(Expression::unary(&operator, operand))
        })
    }

    /// Registers a postfix operator: its led wraps the left operand in a
    /// postfix [`Expression`] without consuming a right operand.
    pub fn postfix(&mut self, id: &str, bp: u32) -> Result<SymbolId, GrammarError> {
        let operator = self.attach(Operator::postfix(id, bp), bp)?;
        self.led(id, bp, move |_, _, left| Ok(Expression::unary(&operator, left)))
    }

    /// Registers a left-associative binary operator.
    pub fn infixl(&mut self, id: &str, bp: u32) -> Result<SymbolId, GrammarError> {
        self.binary(Operator::infix(id, bp, Assoc::Left))
    }

    /// Registers a right-associative binary operator; its right operand is
    /// parsed at `bp - 1`.
    pub fn infixr(&mut self, id: &str, bp: u32) -> Result<SymbolId, GrammarError> {
        self.binary(Operator::infix(id, bp, Assoc::Right))
    }

    /// Registers a left-associative binary operator whose expressions
    /// flatten when `associative` is set. `commutative` is recorded on the
    /// produced nodes only.
    pub fn operator(
        &mut self,
        id: &str,
        bp: u32,
        associative: bool,
        commutative: bool,
    ) -> Result<SymbolId, GrammarError> {
        self.binary(Operator::infix(id, bp, Assoc::Left).with_flags(associative, commutative))
    }

    fn binary(&mut self, operator: Operator) -> Result<SymbolId, GrammarError> {
        let bp = operator.bp;
        let id = operator.symbol.clone();
        let operator = self.attach(operator, bp)?;
        self.led(&id, bp, move |parser, _, left| {
            let right = parser.expression(operator.rbp())?;
            Ok(Expression::combine(&operator, left, right))
        })
    }
}
