//! # Calculator Error Types
//!
//! - [`ArithmeticError`]: exact arithmetic rejected its operands.
//! - [`EvalError`]: numeric evaluation of a value failed.
//! - [`CalcError`]: a unified surface over the whole pipeline (literal
//!   conversion, grammar setup, parsing, evaluation). Conversions from the
//!   underlying errors are derived with `#[from]`, so `?` works at call
//!   sites returning `Result<T, CalcError>`.

use smartstring::alias::String;
use tdop::{GrammarError, ParseError};
use thiserror::Error;

/// Failures of exact arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// Zero denominator, zero divisor, or reciprocal of zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The exact result does not fit in a 64-bit integer.
    #[error("integer overflow")]
    Overflow,

    /// The operation is not defined for this kind of operand.
    #[error("unimplemented operation: can't {operation} {operand}")]
    Unsupported {
        /// Operation name, e.g. `"add"`.
        operation: &'static str,
        /// Operand kind, e.g. `"variable"`.
        operand: &'static str,
    },
}

/// Failures of numeric evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable has no value in the bindings.
    #[error("unbound variable {0}")]
    Unbound(String),

    /// The operator has no numeric meaning.
    #[error("can't evaluate {fixity} operator {symbol}")]
    Operator {
        /// Operator text.
        symbol: String,
        /// Operator position.
        fixity: tdop::Fixity,
    },

    /// Sampling step must be positive and finite.
    #[error("invalid sampling step {0}")]
    Step(f64),

    /// Sampling bounds must be finite.
    #[error("invalid sampling range {from} to {to}")]
    Range {
        /// First x.
        from: f64,
        /// Last x.
        to: f64,
    },

    /// The sampling range holds more points than allowed.
    #[error("sampling would produce more than {0} points")]
    TooManySamples(usize),
}

/// Represents all possible errors that can occur within the calculator.
#[derive(Debug, Error)]
pub enum CalcError {
    /// An integer literal could not be parsed.
    #[error("invalid number: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// A decimal literal could not be parsed.
    #[error("invalid number: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// A grammar could not be built.
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// Input could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// A value could not be evaluated numerically.
    #[error("{0}")]
    Eval(#[from] EvalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_maps_to_calc_error() {
        let err = "99999999999999999999".parse::<i64>().map_err(CalcError::from).unwrap_err();
        assert!(matches!(err, CalcError::ParseInt(_)));
        assert_eq!(err.to_string(), "invalid number: number too large to fit in target type");
    }

    #[test]
    fn arithmetic_messages() {
        let err = ArithmeticError::Unsupported {
            operation: "add",
            operand: "variable",
        };
        assert_eq!(err.to_string(), "unimplemented operation: can't add variable");
        assert_eq!(ArithmeticError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn eval_messages() {
        let err = EvalError::Operator {
            symbol: "!".into(),
            fixity: tdop::Fixity::Postfix,
        };
        assert_eq!(err.to_string(), "can't evaluate postfix operator !");
        assert_eq!(EvalError::Unbound("y".into()).to_string(), "unbound variable y");
        let range = EvalError::Range { from: f64::NAN, to: 1.0 };
        assert_eq!(range.to_string(), "invalid sampling range NaN to 1");
        assert_eq!(
            EvalError::TooManySamples(10).to_string(),
            "sampling would produce more than 10 points"
        );
    }

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}
    #[test]
    fn calc_error_is_send_sync_static() {
        _assert_send_sync_static::<CalcError>();
    }
}
