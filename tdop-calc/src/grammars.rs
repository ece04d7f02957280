//! Ready-made calculator grammars.
//!
//! - [`arithmetic`] evaluates while it parses: every operator's led
//!   computes its result immediately with exact integer/rational arithmetic,
//!   falling back to reals when a decimal is involved.
//! - [`algebra`] keeps the structure: binary operators build flattened
//!   [`Expression`](tdop::Expression) nodes, and only negation is
//!   simplified (through [`Negation::make`]).
//!
//! Both share the same lexical vocabulary: unsigned numbers, identifiers
//! (parsed as [`Variable`]s) and parentheses. A minus sign directly applied
//! to a number reads as a negative literal.

use crate::error::{ArithmeticError, CalcError};
use crate::value::{Negation, Value, Variable};
use once_cell::sync::Lazy;
use tdop::{ErrorKind, Grammar, GrammarError, ParseError, Parser, ParserStats, Span, Token};

/// Unsigned decimal number with optional fraction and exponent.
pub const NUMBER: &str = r"\d+(?:\.\d+)?(?:[eE]-?\d+)?";

/// Id of the number token class.
const NUMBER_CLASS: &str = "(number)";

/// Identifier.
pub const NAME: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// Binding power of `+` and `-`.
pub const ADDITIVE: u32 = 50;
/// Binding power of `*` and `/`.
pub const MULTIPLICATIVE: u32 = 60;
/// Binding power of the operand of unary `-`.
pub const UNARY: u32 = 70;
/// Binding power of `^`.
pub const POWER: u32 = 80;

/// The evaluating grammar, built once.
pub static ARITHMETIC: Lazy<Grammar<Value>> =
    Lazy::new(|| arithmetic().expect("arithmetic grammar is well formed"));

/// The symbolic grammar, built once.
pub static ALGEBRA: Lazy<Grammar<Value>> =
    Lazy::new(|| algebra().expect("algebra grammar is well formed"));

/// Converts a number literal: integers stay exact, anything with a
/// fraction or an exponent becomes a real.
///
/// # Examples
///
/// ```rust
/// # use tdop_calc::{grammars::parse_number, Value};
/// assert_eq!(parse_number("42").unwrap(), Value::Integer(42));
/// assert_eq!(parse_number("2.5e-1").unwrap(), Value::Real(0.25));
/// assert!(parse_number("99999999999999999999").is_err());
/// ```
pub fn parse_number(text: &str) -> Result<Value, CalcError> {
    if text.contains(['.', 'e', 'E']) {
        Ok(Value::Real(text.parse::<f64>()?))
    } else {
        Ok(Value::Integer(text.parse::<i64>()?))
    }
}

fn arithmetic_error(input: &str, span: Span, err: ArithmeticError) -> ParseError {
    ParseError::from_err(ErrorKind::Arithmetic, err, input, span)
}

/// Numbers, names, parentheses and unary minus.
fn common(g: &mut Grammar<Value>) -> Result<(), GrammarError> {
    g.literal("number", NUMBER, parse_number)?;
    g.literal("name", NAME, |s| Ok::<_, CalcError>(Value::Variable(Variable::new(s))))?;
    g.symbol(")", 0)?;
    g.nud("(", |p, _| {
        let value = p.expression(0)?;
        p.take_expected(")")?;
        Ok(value)
    })?;
    g.nud("-", negate)?;
    Ok(())
}

/// Unary minus.
///
/// A number that no tighter operator claims is read together with the sign
/// as one negative literal, so `-9223372036854775808` is `i64::MIN` rather
/// than an overflowing magnitude. Otherwise the operand is parsed at
/// [`UNARY`] and negated with [`Negation::make`].
fn negate<'a>(p: &mut Parser<'a, Value>, token: Token<'a>) -> Result<Value, ParseError> {
    let next = p.peek()?;
    let operand = if p.grammar().lookup(NUMBER_CLASS) == Some(next.symbol) {
        let number = p.take()?;
        let following = p.peek()?;
        if p.grammar().get(following.symbol).bp() <= UNARY {
            let span = token.span.merge(&number.span);
            let text = format!("-{}", number.text);
            return parse_number(&text)
                .map_err(|e| ParseError::from_err(ErrorKind::Literal, e, p.input(), span));
        }
        let magnitude = parse_number(number.text)
            .map_err(|e| ParseError::from_err(ErrorKind::Literal, e, p.input(), number.span))?;
        p.continue_expression(magnitude, UNARY)?
    } else {
        p.expression(UNARY)?
    };
    Negation::make(operand).map_err(|e| arithmetic_error(p.input(), token.span, e))
}

type BinaryFn = fn(&Value, &Value) -> Result<Value, ArithmeticError>;

/// Installs an evaluating binary operator. The right operand is parsed at
/// `rbp`; an arithmetic failure is attributed to the operator token.
fn evaluating(
    g: &mut Grammar<Value>,
    id: &str,
    bp: u32,
    rbp: u32,
    apply: BinaryFn,
) -> Result<(), GrammarError> {
    g.led(id, bp, move |p, token, left| {
        let right = p.expression(rbp)?;
        apply(&left, &right).map_err(|e| arithmetic_error(p.input(), token.span, e))
    })?;
    Ok(())
}

/// Builds the evaluating calculator grammar.
///
/// # Examples
///
/// ```rust
/// # use tdop_calc::{grammars::arithmetic, Value};
/// let g = arithmetic().unwrap();
/// assert_eq!(g.parse("(2 + 3) * 4").unwrap(), Value::Integer(20));
/// assert_eq!(g.parse("1 / 2 + 1 / 3").unwrap().to_string(), "5/6");
/// ```
pub fn arithmetic() -> Result<Grammar<Value>, GrammarError> {
    let mut g = Grammar::new();
    common(&mut g)?;
    evaluating(&mut g, "+", ADDITIVE, ADDITIVE, Value::add)?;
    evaluating(&mut g, "-", ADDITIVE, ADDITIVE, Value::subtract)?;
    evaluating(&mut g, "*", MULTIPLICATIVE, MULTIPLICATIVE, Value::multiply)?;
    evaluating(&mut g, "/", MULTIPLICATIVE, MULTIPLICATIVE, Value::divide)?;
    evaluating(&mut g, "^", POWER, POWER - 1, Value::pow)?;
    g.compile()?;
    Ok(g)
}

/// Builds the symbolic calculator grammar.
///
/// `+` and `*` are associative and commutative and flatten; `-` and `/`
/// nest to the left; `^` nests to the right.
///
/// # Examples
///
/// ```rust
/// # use tdop_calc::grammars::algebra;
/// let g = algebra().unwrap();
/// let value = g.parse("1 + 2 + x * y * 3").unwrap();
/// assert_eq!(value.to_string(), "1 + 2 + x * y * 3");
/// assert_eq!(
///     serde_json::to_string(&value).unwrap(),
///     r#"["+",1,2,["*","x","y",3]]"#
/// );
/// ```
pub fn algebra() -> Result<Grammar<Value>, GrammarError> {
    let mut g = Grammar::new();
    common(&mut g)?;
    g.operator("+", ADDITIVE, true, true)?;
    g.operator("-", ADDITIVE, false, false)?;
    g.operator("*", MULTIPLICATIVE, true, true)?;
    g.operator("/", MULTIPLICATIVE, false, false)?;
    g.infixr("^", POWER)?;
    g.compile()?;
    Ok(g)
}

/// Evaluates `input` with the [`ARITHMETIC`] grammar.
///
/// ```rust
/// # use tdop_calc::{evaluate, Value};
/// assert_eq!(evaluate("2 + 3 * 4").unwrap(), Value::Integer(14));
/// ```
pub fn evaluate(input: &str) -> Result<Value, ParseError> {
    ARITHMETIC.parse(input)
}

/// Like [`evaluate`], also returning the parser's counters.
pub fn evaluate_with_stats(input: &str) -> Result<(Value, ParserStats), ParseError> {
    ARITHMETIC.parse_with_stats(input)
}

/// Parses `input` with the [`ALGEBRA`] grammar.
pub fn parse_symbolic(input: &str) -> Result<Value, ParseError> {
    ALGEBRA.parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::Rational;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn eval(input: &str) -> Value {
        evaluate(input).unwrap()
    }

    fn json(input: &str) -> String {
        serde_json::to_string(&parse_symbolic(input).unwrap()).unwrap()
    }

    #[test]
    fn precedence_and_grouping() {
        init();
        assert_eq!(eval("2 + 3"), Value::Integer(5));
        assert_eq!(eval("2 + 3 * 4"), Value::Integer(14));
        assert_eq!(eval("(2 + 3) * 4"), Value::Integer(20));
        assert_eq!(eval("((7))"), Value::Integer(7));
    }

    #[test]
    fn left_and_right_associativity() {
        assert_eq!(eval("2 - 3 - 1"), Value::Integer(-2));
        assert_eq!(eval("12 / 2 / 3"), Value::Integer(2));
        assert_eq!(eval("2 ^ 3 ^ 2"), Value::Integer(512));
        assert_eq!(eval("-2 ^ 2"), Value::Integer(-4));
    }

    #[test]
    fn double_negation_collapses() {
        assert_eq!(eval("--3"), Value::Integer(3));
        assert_eq!(eval("-(-3)"), Value::Integer(3));
        assert_eq!(eval("- - - 3"), Value::Integer(-3));
        assert_eq!(parse_symbolic("--x").unwrap(), Value::Variable(Variable::new("x")));
        assert_eq!(json("-(-(x + 1))"), r#"["+","x",1]"#);
    }

    #[test]
    fn exact_division() {
        assert_eq!(eval("1 / 2"), Value::Rational(Rational::new(1, 2).unwrap()));
        assert_eq!(eval("1/2 + 1/3").to_string(), "5/6");
        assert_eq!(eval("4 / 2"), Value::Integer(2));
        assert_eq!(eval("-6 / -4").to_string(), "3/2");
        assert_eq!(eval("(1/2) ^ -2"), Value::Integer(4));
    }

    #[test]
    fn decimals_are_real() {
        assert_eq!(eval("1.5 * 2"), Value::Real(3.0));
        assert_eq!(eval("1/4 + 0.25"), Value::Real(0.5));
        assert_eq!(eval("1e3"), Value::Real(1000.0));
    }

    #[test]
    fn error_locality() {
        let err = evaluate("2 + )").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!(err.fragment(), ")");
        assert_eq!((err.span.start, err.span.end), (4, 5));
    }

    #[test]
    fn missing_close_paren() {
        let err = evaluate("(1 + 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
        assert_eq!(err.message.as_str(), "unexpected end of input, expecting )");

        let err = evaluate("(1 + 2 3").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expected);
        assert_eq!(err.fragment(), "3");
    }

    #[test]
    fn division_by_zero_points_at_operator() {
        let err = evaluate("1 + 2 / (3 - 3)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Arithmetic);
        assert_eq!(err.message.as_str(), "division by zero");
        assert_eq!(err.fragment(), "/");
    }

    #[test]
    fn variables_do_not_evaluate() {
        let err = evaluate("x + 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Arithmetic);
        assert_eq!(err.message.as_str(), "unimplemented operation: can't add variable");
        assert_eq!(eval("x"), Value::Variable(Variable::new("x")));
    }

    #[test]
    fn literal_overflow_is_reported() {
        let err = evaluate("1 + 99999999999999999999").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Literal);
        assert_eq!(err.fragment(), "99999999999999999999");
        assert_eq!(
            err.message.as_str(),
            "invalid number: number too large to fit in target type"
        );
    }

    #[test]
    fn signed_literals_cover_the_integer_range() {
        assert_eq!(eval(&i64::MIN.to_string()), Value::Integer(i64::MIN));
        assert_eq!(eval("-9223372036854775808 + 1"), Value::Integer(i64::MIN + 1));
        assert_eq!(eval("- 2.5"), Value::Real(-2.5));
        assert_eq!(eval("3 * -2"), Value::Integer(-6));
        let err = evaluate("-9223372036854775809").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Literal);
        assert_eq!(err.fragment(), "-9223372036854775809");
    }

    #[test]
    fn tighter_operators_bind_before_the_sign() {
        assert_eq!(eval("-2 ^ 2"), Value::Integer(-4));
        assert_eq!(eval("-2 ^ 2 * 3"), Value::Integer(-12));
        assert_eq!(json("-x ^ 2"), r#"["-",["^","x",2]]"#);
        assert_eq!(json("-2 ^ x"), r#"["-",["^",2,"x"]]"#);
        assert_eq!(json("-2 * x"), r#"["*",-2,"x"]"#);
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let err = evaluate(&format!("{}1", "-".repeat(20_000))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooDeep);
        assert_eq!(eval(&format!("{}1", "- ".repeat(100))), Value::Integer(1));
    }

    #[test]
    fn rendering_parses_back_to_the_same_value() {
        for input in [
            "(-x) ^ 2",
            "(-1) ^ 2",
            "-x ^ 2",
            "-(x + 1) * y",
            "a - (b - c)",
            "1 + (2 + 3) * -x",
            "2 ^ -x ^ y",
            "-1 / 2",
        ] {
            let value = parse_symbolic(input).unwrap();
            let rendered = value.to_string();
            assert_eq!(parse_symbolic(&rendered).unwrap(), value, "{} -> {}", input, rendered);
        }
        assert_eq!(parse_symbolic("(-x) ^ 2").unwrap().to_string(), "(-x) ^ 2");
        assert_eq!(parse_symbolic("(-1) ^ 2").unwrap().to_string(), "(-1) ^ 2");
    }

    #[test]
    fn unrecognized_input() {
        let err = evaluate("2 # 3").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnrecognizedInput);
        assert_eq!(err.span.start, 2);
    }

    #[test]
    fn associative_operators_flatten() {
        assert_eq!(json("1 + 2 + 3"), r#"["+",1,2,3]"#);
        assert_eq!(json("a * b * c + d"), r#"["+",["*","a","b","c"],"d"]"#);
        assert_eq!(json("1 - 2 - 3"), r#"["-",["-",1,2],3]"#);
        assert_eq!(json("2 ^ 3 ^ x"), r#"["^",2,["^",3,"x"]]"#);
    }

    #[test]
    fn symbolic_rendering() {
        let render = |s: &str| parse_symbolic(s).unwrap().to_string();
        assert_eq!(render("(a + b) * c"), "(a + b) * c");
        assert_eq!(render("a - (b - c)"), "a - (b - c)");
        assert_eq!(render("a + (b + c)"), "a + b + c");
        assert_eq!(render("-(a + b)"), "-(a + b)");
        assert_eq!(render("-1/2"), "-1 / 2");
    }

    #[test]
    fn operator_metadata() {
        let Value::Expression(e) = parse_symbolic("x * y").unwrap() else {
            panic!("expected expression")
        };
        assert!(e.operator().associative);
        assert!(e.operator().commutative);
        let Value::Expression(e) = parse_symbolic("x / y").unwrap() else {
            panic!("expected expression")
        };
        assert!(!e.operator().associative);
    }

    #[test]
    fn stats_count_tokens() {
        let (value, stats) = evaluate_with_stats("1 + 2").unwrap();
        assert_eq!(value, Value::Integer(3));
        assert_eq!(stats.tokens, 3);
        assert_eq!(stats.leds, 1);
    }
}
