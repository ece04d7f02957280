//! The calculator value model.
//!
//! A [`Value`] is what the calculator grammars produce: a plain number
//! (exact integer or real), an exact [`Rational`], a [`Negation`] of a
//! symbolic value, a [`Variable`], or an operator [`Expression`].
//!
//! Canonical forms are maintained by smart constructors:
//!
//! - rationals with denominator 1 are stored as integers
//!   ([`Value::from`] of a [`Rational`]);
//! - [`Negation::make`] folds negated numbers and rationals into plain
//!   values and collapses double negation, so a `Negation` only ever wraps
//!   a variable or an expression;
//! - expressions of associative operators are flattened by the grammar
//!   (see [`tdop::Expression::combine`]).
//!
//! Values render with `Display` and serialize into the tagged array form:
//! numbers as themselves, variables as their name, negations as
//! `["-", x]`, rationals as `["/", n, d]` and expressions as
//! `[op, operands...]`.

use crate::error::ArithmeticError;
use crate::grammars::UNARY;
use crate::rational::{Exact, Rational};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use smartstring::alias::String;
use std::fmt;
use tdop::{Expression, Term};

/// An opaque named placeholder. Equality is by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(String);

impl Variable {
    /// Creates a variable.
    pub fn new(name: &str) -> Self {
        Self(String::from(name))
    }

    /// The variable name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The negative of a symbolic value.
///
/// Only [`Negation::make`] creates negations; the wrapped value is never a
/// number, a rational or another negation.
#[derive(Debug, Clone, PartialEq)]
pub struct Negation(Box<Value>);

impl Negation {
    /// Negates `value`, folding numbers and collapsing double negation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tdop_calc::{Negation, Value, Variable};
    /// assert_eq!(Negation::make(Value::Integer(3)).unwrap(), Value::Integer(-3));
    /// let x = Value::Variable(Variable::new("x"));
    /// let neg = Negation::make(x.clone()).unwrap();
    /// assert!(matches!(neg, Value::Negation(_)));
    /// assert_eq!(Negation::make(neg).unwrap(), x);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::Overflow`] when negating `i64::MIN`.
    pub fn make(value: Value) -> Result<Value, ArithmeticError> {
        match value {
            Value::Integer(n) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or(ArithmeticError::Overflow),
            Value::Real(x) => Ok(Value::Real(-x)),
            Value::Rational(r) => r.neg().map(Value::Rational),
            Value::Negation(inner) => Ok(*inner.0),
            other @ (Value::Variable(_) | Value::Expression(_)) => {
                Ok(Value::Negation(Negation(Box::new(other))))
            }
        }
    }

    /// The negated value.
    pub fn inner(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for Negation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Value::Expression(_) => write!(f, "-({})", self.0),
            inner => write!(f, "-{}", inner),
        }
    }
}

/// Serializes as `["-", inner]`.
impl Serialize for Negation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element("-")?;
        seq.serialize_element(&*self.0)?;
        seq.end()
    }
}

/// A calculator value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Exact integer.
    Integer(i64),
    /// Floating point number.
    Real(f64),
    /// Exact fraction; its denominator is greater than 1.
    Rational(Rational),
    /// Negated symbolic value.
    Negation(Negation),
    /// Named placeholder.
    Variable(Variable),
    /// Operator applied to operands.
    Expression(Expression<Value>),
}

/// Arithmetic operations on values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "exponentiate",
        }
    }

    /// Exact result, or `None` when the operation leaves the exact domain.
    fn exact(self, a: Exact, b: Exact) -> Option<Result<Exact, ArithmeticError>> {
        match (self, b) {
            (Operation::Add, _) => Some(a.add(b)),
            (Operation::Subtract, _) => Some(a.subtract(b)),
            (Operation::Multiply, _) => Some(a.multiply(b)),
            (Operation::Divide, _) => Some(a.divide(b)),
            (Operation::Power, Exact::Integer(e)) => Some(a.pow(e)),
            (Operation::Power, Exact::Rational(_)) => None,
        }
    }

    fn real(self, a: f64, b: f64) -> f64 {
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => a / b,
            Operation::Power => a.powf(b),
        }
    }
}

/// Numeric operand of an arithmetic operation.
#[derive(Debug, Clone, Copy)]
enum Number {
    Exact(Exact),
    Real(f64),
}

impl Number {
    fn to_f64(self) -> f64 {
        match self {
            Number::Exact(e) => e.to_f64(),
            Number::Real(x) => x,
        }
    }
}

impl Value {
    /// Kind name used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Rational(_) => "rational",
            Value::Negation(_) => "negation",
            Value::Variable(_) => "variable",
            Value::Expression(_) => "expression",
        }
    }

    /// The exact number this value holds, if any.
    pub fn as_exact(&self) -> Option<Exact> {
        match self {
            Value::Integer(n) => Some(Exact::Integer(*n)),
            Value::Rational(r) => Some(Exact::Rational(*r)),
            _ => None,
        }
    }

    fn number(&self, operation: Operation) -> Result<Number, ArithmeticError> {
        match self {
            Value::Integer(n) => Ok(Number::Exact(Exact::Integer(*n))),
            Value::Rational(r) => Ok(Number::Exact(Exact::Rational(*r))),
            Value::Real(x) => Ok(Number::Real(*x)),
            other => Err(ArithmeticError::Unsupported {
                operation: operation.name(),
                operand: other.kind(),
            }),
        }
    }

    fn apply(&self, operation: Operation, other: &Value) -> Result<Value, ArithmeticError> {
        let (a, b) = (self.number(operation)?, other.number(operation)?);
        if let (Number::Exact(x), Number::Exact(y)) = (a, b) {
            if let Some(result) = operation.exact(x, y) {
                return result.map(Value::from);
            }
        }
        Ok(Value::Real(operation.real(a.to_f64(), b.to_f64())))
    }

    /// `self + other`, exact when both are exact.
    pub fn add(&self, other: &Value) -> Result<Value, ArithmeticError> {
        self.apply(Operation::Add, other)
    }

    /// `self - other`, exact when both are exact.
    pub fn subtract(&self, other: &Value) -> Result<Value, ArithmeticError> {
        self.apply(Operation::Subtract, other)
    }

    /// `self * other`, exact when both are exact.
    pub fn multiply(&self, other: &Value) -> Result<Value, ArithmeticError> {
        self.apply(Operation::Multiply, other)
    }

    /// `self / other`; dividing exact numbers gives an exact quotient.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::DivisionByZero`] for an exact zero divisor. Real
    /// division follows floating point rules.
    pub fn divide(&self, other: &Value) -> Result<Value, ArithmeticError> {
        self.apply(Operation::Divide, other)
    }

    /// `self ^ other`; exact for exact bases and integer exponents.
    pub fn pow(&self, other: &Value) -> Result<Value, ArithmeticError> {
        self.apply(Operation::Power, other)
    }

    /// `-self`, see [`Negation::make`].
    pub fn negate(self) -> Result<Value, ArithmeticError> {
        Negation::make(self)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<Exact> for Value {
    fn from(e: Exact) -> Self {
        match e {
            Exact::Integer(n) => Value::Integer(n),
            Exact::Rational(r) => Value::Rational(r),
        }
    }
}

/// Collapses a rational with denominator 1 to an integer.
impl From<Rational> for Value {
    fn from(r: Rational) -> Self {
        Value::from(Exact::from(r))
    }
}

impl From<Variable> for Value {
    fn from(v: Variable) -> Self {
        Value::Variable(v)
    }
}

impl Term for Value {
    fn from_expression(expr: Expression<Value>) -> Self {
        Value::Expression(expr)
    }

    fn as_expression(&self) -> Option<&Expression<Value>> {
        match self {
            Value::Expression(e) => Some(e),
            _ => None,
        }
    }

    fn as_expression_mut(&mut self) -> Option<&mut Expression<Value>> {
        match self {
            Value::Expression(e) => Some(e),
            _ => None,
        }
    }

    /// Negations and negative numbers render with a leading unary minus.
    fn prefix_bp(&self) -> Option<u32> {
        let negative = match self {
            Value::Negation(_) => true,
            Value::Integer(n) => *n < 0,
            Value::Real(x) => x.is_sign_negative(),
            Value::Rational(r) => r.numer() < 0,
            Value::Variable(_) | Value::Expression(_) => false,
        };
        negative.then_some(UNARY)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(x) => write!(f, "{}", x),
            Value::Rational(r) => write!(f, "{}", r),
            Value::Negation(n) => write!(f, "{}", n),
            Value::Variable(v) => write!(f, "{}", v),
            Value::Expression(e) => write!(f, "{}", e),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Real(x) => serializer.serialize_f64(*x),
            Value::Rational(r) => r.serialize(serializer),
            Value::Negation(n) => n.serialize(serializer),
            Value::Variable(v) => v.serialize(serializer),
            Value::Expression(e) => e.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> Value {
        Value::from(Rational::new(n, d).unwrap())
    }

    fn var(name: &str) -> Value {
        Value::Variable(Variable::new(name))
    }

    #[test]
    fn rationals_collapse_into_integers() {
        assert_eq!(rat(4, 2), Value::Integer(2));
        assert_eq!(rat(-2, -4), Value::Rational(Rational::new(1, 2).unwrap()));
    }

    #[test]
    fn negation_folds_numbers() {
        assert_eq!(Negation::make(Value::Integer(5)), Ok(Value::Integer(-5)));
        assert_eq!(Negation::make(Value::Real(1.5)), Ok(Value::Real(-1.5)));
        assert_eq!(Negation::make(rat(1, 2)), Ok(rat(-1, 2)));
        assert_eq!(Negation::make(Value::Integer(i64::MIN)), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn negation_wraps_only_symbolic_values() {
        let neg = Negation::make(var("x")).unwrap();
        let Value::Negation(n) = &neg else {
            panic!("expected negation")
        };
        assert_eq!(n.inner(), &var("x"));
        assert_eq!(neg.to_string(), "-x");
        assert_eq!(serde_json::to_string(&neg).unwrap(), r#"["-","x"]"#);
        assert_eq!(Negation::make(neg).unwrap(), var("x"));
    }

    #[test]
    fn exact_arithmetic() {
        let two = Value::Integer(2);
        let three = Value::Integer(3);
        assert_eq!(two.add(&three), Ok(Value::Integer(5)));
        assert_eq!(two.subtract(&three), Ok(Value::Integer(-1)));
        assert_eq!(two.divide(&three), Ok(rat(2, 3)));
        assert_eq!(rat(2, 3).multiply(&three), Ok(Value::Integer(2)));
        assert_eq!(rat(1, 2).add(&rat(1, 3)), Ok(rat(5, 6)));
        assert_eq!(two.pow(&Value::Integer(-2)), Ok(rat(1, 4)));
        assert_eq!(rat(2, 3).pow(&three), Ok(rat(8, 27)));
        assert_eq!(two.divide(&Value::Integer(0)), Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn reals_are_contagious() {
        let half = Value::Real(0.5);
        assert_eq!(half.add(&Value::Integer(1)), Ok(Value::Real(1.5)));
        assert_eq!(rat(1, 4).add(&half), Ok(Value::Real(0.75)));
        assert_eq!(Value::Integer(1).pow(&rat(1, 2)), Ok(Value::Real(1.0)));
        assert_eq!(Value::Integer(2).pow(&Value::Real(2.0)), Ok(Value::Real(4.0)));
        assert_eq!(Value::Integer(1).divide(&Value::Real(0.0)), Ok(Value::Real(f64::INFINITY)));
    }

    #[test]
    fn symbolic_operands_are_rejected() {
        let err = Value::Integer(1).add(&var("x")).unwrap_err();
        assert_eq!(
            err,
            ArithmeticError::Unsupported {
                operation: "add",
                operand: "variable"
            }
        );
        let neg = Negation::make(var("y")).unwrap();
        assert!(matches!(
            neg.multiply(&Value::Integer(2)),
            Err(ArithmeticError::Unsupported { operand: "negation", .. })
        ));
    }

    #[test]
    fn display_and_serialize() {
        assert_eq!(rat(-3, 4).to_string(), "-3/4");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(serde_json::to_string(&rat(-3, 4)).unwrap(), r#"["/",-3,4]"#);
        assert_eq!(serde_json::to_string(&Value::Integer(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&var("t")).unwrap(), r#""t""#);
    }
}
