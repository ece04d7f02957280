//! Operator metadata.
//!
//! Every [`Expression`](crate::Expression) node is tagged with the
//! [`Operator`] that built it. The metadata records where the operator sits
//! relative to its operands ([`Fixity`]), how same-precedence chains group
//! ([`Assoc`]), and the algebraic flags declared at registration time.
//!
//! # Overview
//! - [`Fixity`]: operator position (`Prefix`, `Infix`, `Postfix`).
//! - [`Assoc`]: parse-time grouping (`None`, `Left`, `Right`).
//! - [`Operator`]: symbol text, binding power, fixity, grouping, and the
//!   `associative` / `commutative` flags. Only `associative` affects parsing
//!   (it enables flattening); `commutative` is carried for consumers of the
//!   resulting expression trees.

use smartstring::alias::String;
use std::fmt;
use std::str::FromStr;

/// Defines the syntactic position (fixity) of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Fixity {
    /// Prefix operator, appearing before its operand, e.g. `-x`.
    Prefix = 0,

    /// Infix operator, appearing between operands, e.g. `x + y`.
    Infix = 1,

    /// Postfix operator, appearing after its operand, e.g., `x!`.
    Postfix = 2,
}

impl Fixity {
    /// The total number of fixity variants.
    pub const COUNT: usize = 3;

    /// String representations of each fixity variant, in declaration order.
    pub const STRS: &[&str] = &["prefix", "infix", "postfix"];
}

impl From<Fixity> for usize {
    fn from(f: Fixity) -> Self {
        f as usize
    }
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Fixity::STRS[usize::from(*self)])
    }
}

/// Error type returned when parsing a [`Fixity`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFixityError(String);

impl fmt::Display for ParseFixityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fixity: {}", self.0)
    }
}
impl std::error::Error for ParseFixityError {}

impl FromStr for Fixity {
    type Err = ParseFixityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(Fixity::Prefix),
            "infix" => Ok(Fixity::Infix),
            "postfix" => Ok(Fixity::Postfix),
            other => Err(ParseFixityError(String::from(other))),
        }
    }
}

/// Operator associativity classification.
///
/// | Variant | Description |
/// |----------|--------------|
/// | [`Assoc::None`]  | Non-associative: prefix and postfix operators. |
/// | [`Assoc::Left`]  | Left-associative: groups from left to right. |
/// | [`Assoc::Right`] | Right-associative: groups from right to left. |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Assoc {
    /// Non-associative operator.
    None = 0,
    /// Left-associative operator.
    Left = 1,
    /// Right-associative operator.
    Right = 2,
}

impl Assoc {
    /// Total number of associativity variants.
    pub const COUNT: usize = 3;

    /// Canonical string representations for each variant.
    pub const STRS: &[&str] = &["none", "left", "right"];
}

impl From<Assoc> for usize {
    fn from(a: Assoc) -> Self {
        a as usize
    }
}

impl fmt::Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Assoc::STRS[usize::from(*self)])
    }
}

/// Error type returned when parsing an [`Assoc`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAssocError(String);

impl fmt::Display for ParseAssocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid associativity: {}", self.0)
    }
}
impl std::error::Error for ParseAssocError {}

impl FromStr for Assoc {
    type Err = ParseAssocError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Assoc::None),
            "left" => Ok(Assoc::Left),
            "right" => Ok(Assoc::Right),
            other => Err(ParseAssocError(String::from(other))),
        }
    }
}

/// Metadata describing an operator and the expression nodes it produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operator {
    /// Literal operator text, which is also its symbol id.
    pub symbol: String,
    /// Binding power.
    pub bp: u32,
    /// Position relative to the operands.
    pub fixity: Fixity,
    /// Grouping of same-precedence chains.
    pub assoc: Assoc,
    /// Repeated applications flatten into a single n-ary node.
    pub associative: bool,
    /// Operands may be reordered. Not used by the parser.
    pub commutative: bool,
}

impl Operator {
    /// A prefix operator.
    pub fn prefix(symbol: &str, bp: u32) -> Self {
        Self::new(symbol, bp, Fixity::Prefix, Assoc::None)
    }

    /// A postfix operator.
    pub fn postfix(symbol: &str, bp: u32) -> Self {
        Self::new(symbol, bp, Fixity::Postfix, Assoc::None)
    }

    /// A binary operator grouping as `assoc`.
    pub fn infix(symbol: &str, bp: u32, assoc: Assoc) -> Self {
        Self::new(symbol, bp, Fixity::Infix, assoc)
    }

    fn new(symbol: &str, bp: u32, fixity: Fixity, assoc: Assoc) -> Self {
        Self {
            symbol: String::from(symbol),
            bp,
            fixity,
            assoc,
            associative: false,
            commutative: false,
        }
    }

    /// Sets the algebraic flags.
    pub fn with_flags(mut self, associative: bool, commutative: bool) -> Self {
        self.associative = associative;
        self.commutative = commutative;
        self
    }

    /// Binding power used when parsing the right operand.
    ///
    /// Right-associative operators continue one level lower so that an equal
    /// operator to the right binds into the operand.
    pub fn rbp(&self) -> u32 {
        match self.assoc {
            Assoc::Right => self.bp.saturating_sub(1),
            Assoc::None | Assoc::Left => self.bp,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.fixity, self.assoc, self.symbol)?;
        write!(f, " ({})", self.bp)
    }
}
