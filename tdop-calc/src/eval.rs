//! Numeric evaluation of calculator values.
//!
//! This is the narrow interface a plotting front end needs: turn a parsed
//! [`Value`] into a number given values for its variables, or treat it as a
//! [`Function`] of `x` (and optionally a time parameter `t`) and sample it
//! over a range.

use crate::error::{CalcError, EvalError};
use crate::grammars::ALGEBRA;
use crate::value::Value;
use indexmap::IndexMap;
use smartstring::alias::String;
use tdop::Fixity;

/// Variable values used by [`Value::evaluate`].
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: IndexMap<String, f64>,
}

impl Bindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(String::from(name), value);
    }

    /// Builder form of [`Bindings::set`].
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// The value bound to `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Value {
    /// Reduces the value to a number.
    ///
    /// Rationals evaluate to their nearest `f64`; `^` folds from the right
    /// like it parses.
    ///
    /// ```rust
    /// # use tdop_calc::{parse_symbolic, Bindings};
    /// let value = parse_symbolic("2 * x ^ 2 - 1").unwrap();
    /// let y = value.evaluate(&Bindings::new().with("x", 3.0)).unwrap();
    /// assert_eq!(y, 17.0);
    /// ```
    ///
    /// # Errors
    ///
    /// [`EvalError::Unbound`] for a variable missing from `bindings`, and
    /// [`EvalError::Operator`] for an operator with no numeric meaning.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Real(x) => Ok(*x),
            Value::Rational(r) => Ok(r.to_f64()),
            Value::Negation(n) => Ok(-n.inner().evaluate(bindings)?),
            Value::Variable(v) => bindings
                .get(v.name())
                .ok_or_else(|| EvalError::Unbound(String::from(v.name()))),
            Value::Expression(expr) => {
                let operator = expr.operator();
                let unsupported = || EvalError::Operator {
                    symbol: operator.symbol.clone(),
                    fixity: operator.fixity,
                };
                let operands = expr
                    .operands()
                    .iter()
                    .map(|v| v.evaluate(bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                match (operator.fixity, operator.symbol.as_str()) {
                    (Fixity::Prefix, "-") => {
                        operands.first().map(|x| -x).ok_or_else(unsupported)
                    }
                    (Fixity::Prefix, "+") => operands.first().copied().ok_or_else(unsupported),
                    (Fixity::Infix, "^") => operands
                        .into_iter()
                        .rev()
                        .reduce(|exp, base| base.powf(exp))
                        .ok_or_else(unsupported),
                    (Fixity::Infix, symbol) => {
                        let fold: fn(f64, f64) -> f64 = match symbol {
                            "+" => |a, b| a + b,
                            "-" => |a, b| a - b,
                            "*" => |a, b| a * b,
                            "/" => |a, b| a / b,
                            _ => return Err(unsupported()),
                        };
                        operands.into_iter().reduce(fold).ok_or_else(unsupported)
                    }
                    _ => Err(unsupported()),
                }
            }
        }
    }
}

/// Most points [`Function::sample_at`] produces.
pub const MAX_SAMPLES: usize = 1_000_000;

/// A parsed expression used as a function of one variable, with an
/// optional time parameter.
#[derive(Debug, Clone)]
pub struct Function {
    body: Value,
    parameter: String,
    time: String,
}

impl Function {
    /// Wraps `body` as a function of `x` with time parameter `t`.
    pub fn new(body: Value) -> Self {
        Self::with_parameters(body, "x", "t")
    }

    /// Wraps `body` with explicit parameter names.
    pub fn with_parameters(body: Value, parameter: &str, time: &str) -> Self {
        Self {
            body,
            parameter: String::from(parameter),
            time: String::from(time),
        }
    }

    /// Parses `input` with the symbolic grammar as a function of `x`.
    ///
    /// ```rust
    /// # use tdop_calc::Function;
    /// let f = Function::parse("x ^ 2 + t").unwrap();
    /// assert_eq!(f.call_at(3.0, 1.0).unwrap(), 10.0);
    /// ```
    pub fn parse(input: &str) -> Result<Self, CalcError> {
        Ok(Self::new(ALGEBRA.parse(input)?))
    }

    /// The function body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Evaluates the function at `x`, with time `0`.
    pub fn call(&self, x: f64) -> Result<f64, EvalError> {
        self.call_at(x, 0.0)
    }

    /// Evaluates the function at `x` and time `t`.
    pub fn call_at(&self, x: f64, t: f64) -> Result<f64, EvalError> {
        let bindings = Bindings::new()
            .with(&self.parameter, x)
            .with(&self.time, t);
        self.body.evaluate(&bindings)
    }

    /// Samples the function over `[from, to]` at time `0`.
    pub fn sample(&self, from: f64, to: f64, step: f64) -> Result<Vec<(f64, f64)>, EvalError> {
        self.sample_at(from, to, step, 0.0)
    }

    /// Samples the function over `[from, to]` in increments of `step`, at
    /// time `t`. Points where the result is not finite are left out; an
    /// empty range (`to < from`) yields no points.
    ///
    /// # Errors
    ///
    /// - [`EvalError::Step`] unless `step` is positive and finite.
    /// - [`EvalError::Range`] unless both bounds are finite.
    /// - [`EvalError::TooManySamples`] when the range holds more than
    ///   [`MAX_SAMPLES`] points.
    /// - Any evaluation error of the body.
    pub fn sample_at(
        &self,
        from: f64,
        to: f64,
        step: f64,
        t: f64,
    ) -> Result<Vec<(f64, f64)>, EvalError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(EvalError::Step(step));
        }
        if !(from.is_finite() && to.is_finite()) {
            return Err(EvalError::Range { from, to });
        }
        if to < from {
            return Ok(Vec::new());
        }
        let count = ((to - from) / step).floor() + 1.0;
        if count > MAX_SAMPLES as f64 {
            return Err(EvalError::TooManySamples(MAX_SAMPLES));
        }
        let mut points = Vec::with_capacity(count as usize);
        for i in 0..count as u64 {
            let x = from + step * i as f64;
            if x > to {
                break;
            }
            let y = self.call_at(x, t)?;
            if y.is_finite() {
                points.push((x, y));
            }
        }
        log::debug!("Sampled {} points over [{}, {}]", points.len(), from, to);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammars::parse_symbolic;
    use crate::value::Variable;

    #[test]
    fn bindings() {
        let mut b = Bindings::new().with("x", 1.0);
        assert_eq!(b.get("x"), Some(1.0));
        b.set("x", 2.0);
        b.set("y", 3.0);
        assert_eq!(b.get("x"), Some(2.0));
        assert_eq!(b.len(), 2);
        assert_eq!(b.get("z"), None);
        assert!(Bindings::new().is_empty());
    }

    #[test]
    fn evaluates_symbolic_values() {
        let b = Bindings::new().with("x", 2.0).with("y", 8.0);
        let eval = |s: &str| parse_symbolic(s).unwrap().evaluate(&b).unwrap();
        assert_eq!(eval("1 + 2 + x"), 5.0);
        assert_eq!(eval("y - x - 1"), 5.0);
        assert_eq!(eval("y / x / 2"), 2.0);
        assert_eq!(eval("x ^ 3 ^ 2"), 512.0);
        assert_eq!(eval("-(x * y)"), -16.0);
        assert_eq!(eval("-x"), -2.0);
        assert_eq!(eval("1 / 4"), 0.25);
    }

    #[test]
    fn unbound_variable() {
        let err = Value::Variable(Variable::new("z")).evaluate(&Bindings::new()).unwrap_err();
        assert_eq!(err, EvalError::Unbound("z".into()));
    }

    #[test]
    fn unknown_operator() {
        let mut g = tdop::Grammar::<Value>::new();
        g.literal("number", r"\d+", |s| s.parse::<i64>().map(Value::Integer)).unwrap();
        g.postfix("!", 90).unwrap();
        let value = g.parse("3!").unwrap();
        assert_eq!(
            value.evaluate(&Bindings::new()),
            Err(EvalError::Operator {
                symbol: "!".into(),
                fixity: Fixity::Postfix
            })
        );
    }

    #[test]
    fn function_call_and_time() {
        let f = Function::parse("2 * x + t").unwrap();
        assert_eq!(f.call(1.5).unwrap(), 3.0);
        assert_eq!(f.call_at(1.5, 1.0).unwrap(), 4.0);

        let g = Function::with_parameters(parse_symbolic("u * u").unwrap(), "u", "s");
        assert_eq!(g.call(3.0).unwrap(), 9.0);
    }

    #[test]
    fn sampling_skips_gaps() {
        let f = Function::parse("1 / x").unwrap();
        let points = f.sample(-1.0, 1.0, 0.5).unwrap();
        let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
        assert_eq!(xs, vec![-1.0, -0.5, 0.5, 1.0]);
        assert_eq!(points[1], (-0.5, -2.0));
    }

    #[test]
    fn sampling_rejects_bad_steps() {
        let f = Function::parse("x").unwrap();
        assert_eq!(f.sample(0.0, 1.0, 0.0), Err(EvalError::Step(0.0)));
        assert!(matches!(f.sample(0.0, 1.0, f64::NAN), Err(EvalError::Step(_))));
        assert_eq!(f.sample(1.0, 0.0, 0.1).unwrap(), vec![]);
    }

    #[test]
    fn sampling_rejects_unbounded_ranges() {
        let f = Function::parse("x").unwrap();
        assert!(matches!(f.sample(f64::NAN, 1.0, 1.0), Err(EvalError::Range { .. })));
        assert!(matches!(f.sample(f64::NEG_INFINITY, 1.0, 1.0), Err(EvalError::Range { .. })));
        assert!(matches!(f.sample(0.0, f64::INFINITY, 1.0), Err(EvalError::Range { .. })));
        assert_eq!(
            f.sample(-f64::MAX, f64::MAX, 1.0),
            Err(EvalError::TooManySamples(MAX_SAMPLES))
        );
        assert_eq!(f.sample(0.0, 1e7, 1.0), Err(EvalError::TooManySamples(MAX_SAMPLES)));
        assert_eq!(f.sample(0.0, 9.0, 1.0).unwrap().len(), 10);
    }

    #[test]
    fn prefix_node_without_operands_is_unsupported() {
        let minus = std::sync::Arc::new(tdop::Operator::prefix("-", 70));
        let value = Value::Expression(tdop::Expression::new(minus, Vec::new()));
        assert!(matches!(
            value.evaluate(&Bindings::new()),
            Err(EvalError::Operator { fixity: Fixity::Prefix, .. })
        ));
    }

    #[test]
    fn sampling_reports_unbound_variables() {
        let f = Function::parse("x + y").unwrap();
        assert_eq!(f.sample(0.0, 1.0, 1.0), Err(EvalError::Unbound("y".into())));
    }
}
