//! Operator expression nodes.
//!
//! An [`Expression`] is an operator applied to a non-empty, ordered list of
//! operands. It is generic over the value type `V` that a grammar produces;
//! the value type embeds expressions by implementing [`Term`], which is
//! what lets the grammar's default `prefix`, `postfix`, `infixl`, `infixr`
//! and `operator` behaviors build trees for any value model.
//!
//! # Flattening
//!
//! [`Expression::combine`] implements associative flattening: when the
//! operator is associative, an operand that is already an expression of the
//! same operator contributes its operands instead of being nested. Both
//! `1 + 2 + 3` and `1 + (2 + 3)` therefore become `[+ 1 2 3]`.
//!
//! # Rendering
//!
//! `Display` writes infix operands joined by the operator, and prefix and
//! postfix operators next to their operand. A nested expression is wrapped
//! in parentheses when its binding power is lower than the enclosing one,
//! or equal to it unless both are the same associative operator. A leading
//! operand whose text starts with a prefix operator (see
//! [`Term::prefix_bp`]) is wrapped when the enclosing operator binds tighter
//! than that prefix, so `(-x) ^ 2` does not render as `-x ^ 2`.

use crate::oper::{Fixity, Operator};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::sync::Arc;

/// A value type that can hold [`Expression`] nodes.
pub trait Term: Sized {
    /// Wraps an expression node as a value.
    fn from_expression(expr: Expression<Self>) -> Self;

    /// The expression node inside this value, if it is one.
    fn as_expression(&self) -> Option<&Expression<Self>>;

    /// Mutable access to the expression node inside this value, if it is one.
    fn as_expression_mut(&mut self) -> Option<&mut Expression<Self>>;

    /// Binding power of the prefix operator this value renders with, for
    /// values that are not expression nodes but print like one, e.g. `-3`.
    fn prefix_bp(&self) -> Option<u32> {
        None
    }
}

/// An operator applied to its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression<V> {
    operator: Arc<Operator>,
    operands: Vec<V>,
}

impl<V> Expression<V> {
    /// Creates a node.
    ///
    /// Nodes built by the parser always have at least one operand;
    /// consumers of hand-built nodes should not index blindly.
    pub fn new(operator: Arc<Operator>, operands: Vec<V>) -> Self {
        Self { operator, operands }
    }

    /// Operator metadata.
    pub fn operator(&self) -> &Arc<Operator> {
        &self.operator
    }

    /// Operator text.
    pub fn symbol(&self) -> &str {
        &self.operator.symbol
    }

    /// Operands, in source order.
    pub fn operands(&self) -> &[V] {
        &self.operands
    }

    /// Consumes the node, returning its operands.
    pub fn into_operands(self) -> Vec<V> {
        self.operands
    }

    /// Number of operands.
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    /// Whether the node has no operands. Never true for parsed nodes.
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    fn is_same(&self, operator: &Operator) -> bool {
        self.operator.symbol == operator.symbol && self.operator.fixity == operator.fixity
    }

    /// Whether `inner`, as an operand of this node, must be parenthesized.
    pub fn needs_parens<W>(&self, inner: &Expression<W>) -> bool {
        let (outer, inner) = (&*self.operator, &*inner.operator);
        inner.bp < outer.bp
            || (inner.bp == outer.bp && !(inner.associative && inner.symbol == outer.symbol))
    }
}

impl<V: Term> Expression<V> {
    /// Applies a prefix or postfix `operator` to `operand`.
    pub fn unary(operator: &Arc<Operator>, operand: V) -> V {
        V::from_expression(Expression::new(Arc::clone(operator), vec![operand]))
    }

    /// Combines two operands with a binary `operator`. When `operator` is
    /// associative, an operand that is a node of the same operator is
    /// spliced into the result rather than nested.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use tdop::{Assoc, Expression, Operator, Term};
    /// # #[derive(Debug)]
    /// # enum V { N(i64), E(Expression<V>) }
    /// # impl Term for V {
    /// #     fn from_expression(e: Expression<V>) -> V { V::E(e) }
    /// #     fn as_expression(&self) -> Option<&Expression<V>> { if let V::E(e) = self { Some(e) } else { None } }
    /// #     fn as_expression_mut(&mut self) -> Option<&mut Expression<V>> { if let V::E(e) = self { Some(e) } else { None } }
    /// # }
    /// let plus = Arc::new(Operator::infix("+", 50, Assoc::Left).with_flags(true, true));
    /// let sum = Expression::combine(&plus, V::N(1), V::N(2));
    /// let sum = Expression::combine(&plus, sum, V::N(3));
    /// assert_eq!(sum.as_expression().unwrap().len(), 3);
    /// ```
    pub fn combine(operator: &Arc<Operator>, left: V, right: V) -> V {
        let mut left = left;
        let mut right = right;
        if !operator.associative {
            return V::from_expression(Expression::new(Arc::clone(operator), vec![left, right]));
        }
        let tail = right
            .as_expression_mut()
            .filter(|e| e.is_same(operator))
            .map(|e| std::mem::take(&mut e.operands))
            .unwrap_or_else(|| vec![right]);
        if let Some(expr) = left.as_expression_mut().filter(|e| e.is_same(operator)) {
            expr.operands.extend(tail);
            return left;
        }
        let mut operands = Vec::with_capacity(tail.len() + 1);
        operands.push(left);
        operands.extend(tail);
        V::from_expression(Expression::new(Arc::clone(operator), operands))
    }
}

impl<V: Term + fmt::Display> Expression<V> {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, operand: &V, leading: bool) -> fmt::Result {
        let wrap = match operand.as_expression() {
            Some(inner) => self.needs_parens(inner),
            None => leading && operand.prefix_bp().is_some_and(|bp| bp < self.operator.bp),
        };
        if wrap {
            write!(f, "({})", operand)
        } else {
            write!(f, "{}", operand)
        }
    }
}

impl<V: Term + fmt::Display> fmt::Display for Expression<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.symbol();
        let wordy = symbol.chars().any(char::is_alphanumeric);
        match self.operator.fixity {
            Fixity::Prefix => {
                for operand in &self.operands {
                    f.write_str(symbol)?;
                    if wordy {
                        f.write_str(" ")?;
                    }
                    self.fmt_operand(f, operand, false)?;
                }
            }
            Fixity::Postfix => {
                for operand in &self.operands {
                    self.fmt_operand(f, operand, true)?;
                    if wordy {
                        f.write_str(" ")?;
                    }
                    f.write_str(symbol)?;
                }
            }
            Fixity::Infix => {
                for (i, operand) in self.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", symbol)?;
                    }
                    self.fmt_operand(f, operand, i == 0)?;
                }
            }
        }
        Ok(())
    }
}

/// Serializes as `[symbol, operand, ...]`.
impl<V: Serialize> Serialize for Expression<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.operands.len() + 1))?;
        seq.serialize_element(self.symbol())?;
        for operand in &self.operands {
            seq.serialize_element(operand)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oper::Assoc;

    #[derive(Debug, Clone, PartialEq)]
    enum T {
        Atom(&'static str),
        Expr(Expression<T>),
    }

    impl Term for T {
        fn from_expression(expr: Expression<T>) -> T {
            T::Expr(expr)
        }
        fn as_expression(&self) -> Option<&Expression<T>> {
            match self {
                T::Expr(e) => Some(e),
                T::Atom(_) => None,
            }
        }
        fn as_expression_mut(&mut self) -> Option<&mut Expression<T>> {
            match self {
                T::Expr(e) => Some(e),
                T::Atom(_) => None,
            }
        }
        fn prefix_bp(&self) -> Option<u32> {
            match self {
                T::Atom(s) if s.starts_with('-') => Some(70),
                _ => None,
            }
        }
    }

    impl fmt::Display for T {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                T::Atom(s) => f.write_str(s),
                T::Expr(e) => write!(f, "{}", e),
            }
        }
    }

    impl Serialize for T {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                T::Atom(s) => serializer.serialize_str(s),
                T::Expr(e) => e.serialize(serializer),
            }
        }
    }

    fn op(symbol: &str, bp: u32, associative: bool) -> Arc<Operator> {
        Arc::new(Operator::infix(symbol, bp, Assoc::Left).with_flags(associative, associative))
    }

    #[test]
    fn associative_operator_flattens() {
        let plus = op("+", 50, true);
        let e = Expression::combine(&plus, T::Atom("a"), T::Atom("b"));
        let e = Expression::combine(&plus, e, T::Atom("c"));
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"["+","a","b","c"]"#);
        assert_eq!(e.to_string(), "a + b + c");
    }

    #[test]
    fn non_associative_operator_nests() {
        let minus = op("-", 50, false);
        let e = Expression::combine(&minus, T::Atom("a"), T::Atom("b"));
        let e = Expression::combine(&minus, e, T::Atom("c"));
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"["-",["-","a","b"],"c"]"#);
        assert_eq!(e.to_string(), "(a - b) - c");
    }

    #[test]
    fn different_operators_never_flatten() {
        let plus = op("+", 50, true);
        let times = op("*", 60, true);
        let e = Expression::combine(&times, T::Atom("a"), T::Atom("b"));
        let e = Expression::combine(&plus, e, T::Atom("c"));
        let e = Expression::combine(&times, e, T::Atom("d"));
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"["*",["+",["*","a","b"],"c"],"d"]"#
        );
        assert_eq!(e.to_string(), "(a * b + c) * d");
    }

    #[test]
    fn equal_precedence_of_different_operators_is_parenthesized() {
        let plus = op("+", 50, true);
        let minus = op("-", 50, false);
        let sum = Expression::combine(&plus, T::Atom("b"), T::Atom("c"));
        let e = Expression::combine(&minus, T::Atom("a"), sum);
        assert_eq!(e.to_string(), "a - (b + c)");
        let diff = Expression::combine(&minus, T::Atom("b"), T::Atom("c"));
        let e = Expression::combine(&plus, T::Atom("a"), diff);
        assert_eq!(e.to_string(), "a + (b - c)");
    }

    #[test]
    fn same_associative_operator_on_the_right_is_spliced() {
        let plus = op("+", 50, true);
        let inner = Expression::combine(&plus, T::Atom("b"), T::Atom("c"));
        let e = Expression::combine(&plus, T::Atom("a"), inner);
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"["+","a","b","c"]"#);
        assert_eq!(e.to_string(), "a + b + c");

        let left = Expression::combine(&plus, T::Atom("a"), T::Atom("b"));
        let right = Expression::combine(&plus, T::Atom("c"), T::Atom("d"));
        let e = Expression::combine(&plus, left, right);
        assert_eq!(e.as_expression().map(Expression::len), Some(4));
    }

    #[test]
    fn non_associative_operator_keeps_right_nesting() {
        let minus = op("-", 50, false);
        let inner = Expression::combine(&minus, T::Atom("b"), T::Atom("c"));
        let e = Expression::combine(&minus, T::Atom("a"), inner);
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"["-","a",["-","b","c"]]"#);
        assert_eq!(e.to_string(), "a - (b - c)");
    }

    #[test]
    fn prefixed_leading_operand_is_wrapped_under_tighter_operators() {
        let pow = Arc::new(Operator::infix("^", 80, Assoc::Right));
        let times = op("*", 60, true);
        let fact = Arc::new(Operator::postfix("!", 90));
        let e = Expression::combine(&pow, T::Atom("-x"), T::Atom("2"));
        assert_eq!(e.to_string(), "(-x) ^ 2");
        let e = Expression::combine(&pow, T::Atom("2"), T::Atom("-x"));
        assert_eq!(e.to_string(), "2 ^ -x");
        let e = Expression::combine(&times, T::Atom("-x"), T::Atom("y"));
        assert_eq!(e.to_string(), "-x * y");
        assert_eq!(Expression::unary(&fact, T::Atom("-3")).to_string(), "(-3)!");
    }

    #[test]
    fn unary_rendering() {
        let neg = Arc::new(Operator::prefix("-", 70));
        let not = Arc::new(Operator::prefix("not", 40));
        let fact = Arc::new(Operator::postfix("!", 90));
        let plus = op("+", 50, true);
        let sum = Expression::combine(&plus, T::Atom("a"), T::Atom("b"));
        assert_eq!(Expression::unary(&neg, sum.clone()).to_string(), "-(a + b)");
        assert_eq!(Expression::unary(&fact, sum).to_string(), "(a + b)!");
        assert_eq!(Expression::unary(&not, T::Atom("p")).to_string(), "not p");
        let e = Expression::unary(&neg, T::Atom("x"));
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"["-","x"]"#);
    }
}
