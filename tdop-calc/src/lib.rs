//! # tdop-calc
//!
//! An exact calculator and a small symbolic expression language built on
//! [`tdop`].
//!
//! The crate provides:
//!
//! - [`rational`]: exact fractions ([`Rational`]) and the closed operand type
//!   [`Exact`] used by all exact arithmetic.
//! - [`value`]: the [`Value`] model (integers, reals, rationals, negations,
//!   variables and operator expressions) with canonicalizing constructors
//!   such as [`Negation::make`].
//! - [`grammars`]: the evaluating [`arithmetic`] grammar and the symbolic
//!   [`algebra`] grammar, plus shared instances [`ARITHMETIC`] and
//!   [`ALGEBRA`].
//! - [`eval`]: numeric evaluation with variable [`Bindings`], and
//!   [`Function`] for evaluating and sampling an expression of `x`.
//! - [`error`]: [`ArithmeticError`], [`EvalError`] and the aggregate
//!   [`CalcError`].
//!
//! ## Example
//!
//! ```rust
//! use tdop_calc::{evaluate, parse_symbolic, Function, Value};
//!
//! assert_eq!(evaluate("(2 + 3) * 4").unwrap(), Value::Integer(20));
//! assert_eq!(evaluate("1/2 + 1/3").unwrap().to_string(), "5/6");
//!
//! let sum = parse_symbolic("1 + 2 + 3").unwrap();
//! assert_eq!(serde_json::to_string(&sum).unwrap(), r#"["+",1,2,3]"#);
//!
//! let f = Function::parse("x ^ 2 - 1").unwrap();
//! assert_eq!(f.call(3.0).unwrap(), 8.0);
//! ```

pub mod error;
pub mod eval;
pub mod grammars;
pub mod rational;
pub mod value;

mod proptests;

pub use error::{ArithmeticError, CalcError, EvalError};
pub use eval::{Bindings, Function, MAX_SAMPLES};
pub use grammars::{
    ALGEBRA, ARITHMETIC, algebra, arithmetic, evaluate, evaluate_with_stats, parse_symbolic,
};
pub use rational::{Exact, Rational};
pub use value::{Negation, Value, Variable};
