//! Compiled token recognizer.
//!
//! All literal symbols and token classes of a grammar are compiled into one
//! multi-pattern [`meta::Regex`]. Recognition skips leading whitespace and
//! then performs a single anchored search at the current offset; the id of
//! the matching pattern identifies the symbol. Characters that no pattern
//! accepts are an error, never skipped.
//!
//! # Tie-break
//!
//! Patterns are searched with leftmost-first semantics, so when several
//! could match at the same offset the earliest pattern in the compiled
//! order wins. The order is:
//!
//! 1. literal symbols, longest text first (so `**` is tried before `*`),
//!    equal lengths in registration order;
//! 2. token classes, in registration order (first registered wins).
//!
//! A literal therefore shadows a token class that could match the same
//! text: with a `max` symbol registered, the input `maxima` is recognized
//! as `max` followed by `ima`.

use crate::error::GrammarError;
use crate::symbol::{Pattern, Symbol, SymbolId};
use crate::span::Span;
use indexmap::IndexMap;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input, meta};
use regex_syntax::hir::Hir;
use smartstring::alias::String;

/// Parses and checks one pattern.
///
/// Rejects invalid syntax and patterns that can match the empty string.
pub(crate) fn validate(id: &str, pattern: &Pattern) -> Result<Hir, GrammarError> {
    let hir = syntax::parse(&pattern.regex_source()).map_err(|e| GrammarError::InvalidPattern {
        id: String::from(id),
        message: String::from(e.to_string().as_str()),
    })?;
    if hir.properties().minimum_len() == Some(0) {
        return Err(GrammarError::EmptyMatch { id: String::from(id) });
    }
    Ok(hir)
}

/// Immutable matcher compiled from a symbol table.
#[derive(Debug)]
pub struct Recognizer {
    regex: meta::Regex,
    symbols: Vec<SymbolId>,
}

impl Recognizer {
    /// Compiles the recognizer for `table`.
    ///
    /// The result depends only on the patterns in `table` and their order,
    /// so compiling an unchanged table again yields an equivalent matcher.
    pub(crate) fn compile<V>(table: &IndexMap<String, Symbol<V>>) -> Result<Self, GrammarError> {
        let mut literals = Vec::new();
        let mut classes = Vec::new();
        for (index, symbol) in table.values().enumerate() {
            match &symbol.pattern {
                Some(Pattern::Literal(text)) => literals.push((SymbolId(index), text.len(), symbol)),
                Some(Pattern::Regex(_)) => classes.push((SymbolId(index), 0, symbol)),
                None => {}
            }
        }
        literals.sort_by(|a, b| b.1.cmp(&a.1));

        let mut symbols = Vec::with_capacity(literals.len() + classes.len());
        let mut hirs = Vec::with_capacity(symbols.capacity());
        for (id, _, symbol) in literals.into_iter().chain(classes) {
            if let Some(pattern) = &symbol.pattern {
                hirs.push(validate(&symbol.id, pattern)?);
                symbols.push(id);
            }
        }

        let regex = meta::Regex::builder()
            .build_many_from_hir(&hirs)
            .map_err(|e| GrammarError::Build(String::from(e.to_string().as_str())))?;

        log::debug!(
            "Recognizer compiled: {} patterns from {} symbols",
            symbols.len(),
            table.len()
        );
        Ok(Self { regex, symbols })
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no pattern was compiled.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Recognizes the next token of `input` starting at byte `offset`.
    ///
    /// Returns `Ok(None)` when only whitespace remains. On failure the error
    /// span runs from the first non-whitespace byte to the end of input.
    pub(crate) fn recognize(
        &self,
        input: &str,
        offset: usize,
    ) -> Result<Option<(SymbolId, Span)>, Span> {
        let rest = &input[offset..];
        let start = offset + (rest.len() - rest.trim_start().len());
        if start == input.len() {
            return Ok(None);
        }
        let search = Input::new(input).range(start..).anchored(Anchored::Yes);
        match self.regex.search(&search) {
            Some(m) => {
                let symbol = self.symbols[m.pattern().as_usize()];
                log::trace!(
                    "Recognized {:?} as {:?} at {}..{}",
                    &input[m.range()],
                    symbol,
                    m.start(),
                    m.end()
                );
                Ok(Some((symbol, Span::new(m.start(), m.end()))))
            }
            None => Err(Span::new(start, input.len())),
        }
    }
}
