//! Exact rational numbers.
//!
//! A [`Rational`] is always in lowest terms with a positive denominator.
//! Arithmetic is exact: intermediate products are computed in 128 bits and
//! results that do not fit back into 64 bits are an
//! [`ArithmeticError::Overflow`], never a silently wrapped value.
//!
//! Operations return [`Exact`], the closed sum of the two exact number
//! kinds, because a result whose denominator reduces to 1 collapses to an
//! integer.
//!
//! # Examples
//!
//! ```rust
//! # use tdop_calc::{Exact, Rational};
//! let half = Rational::new(1, 2).unwrap();
//! let third = Rational::new(1, 3).unwrap();
//! assert_eq!(half.add(third).unwrap(), Exact::Rational(Rational::new(5, 6).unwrap()));
//! assert_eq!(Rational::make(4, 2).unwrap(), Exact::Integer(2));
//! assert_eq!(Rational::new(-2, -4).unwrap().to_string(), "1/2");
//! ```

use crate::error::ArithmeticError;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn narrow(n: i128) -> Result<i64, ArithmeticError> {
    i64::try_from(n).map_err(|_| ArithmeticError::Overflow)
}

/// An exact number: an integer or a non-integral rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exact {
    /// Whole number.
    Integer(i64),
    /// Fraction whose reduced denominator is greater than 1.
    Rational(Rational),
}

impl From<i64> for Exact {
    fn from(n: i64) -> Self {
        Exact::Integer(n)
    }
}

/// Collapses a rational with denominator 1 to an integer.
impl From<Rational> for Exact {
    fn from(r: Rational) -> Self {
        if r.denom == 1 {
            Exact::Integer(r.numer)
        } else {
            Exact::Rational(r)
        }
    }
}

impl Exact {
    fn ratio(self) -> (i128, i128) {
        match self {
            Exact::Integer(n) => (n as i128, 1),
            Exact::Rational(r) => (r.numer as i128, r.denom as i128),
        }
    }

    /// Sum.
    pub fn add(self, other: Exact) -> Result<Exact, ArithmeticError> {
        match (self, other) {
            (Exact::Integer(a), Exact::Integer(b)) => {
                a.checked_add(b).map(Exact::Integer).ok_or(ArithmeticError::Overflow)
            }
            (Exact::Rational(r), other) => r.add(other),
            (Exact::Integer(_), Exact::Rational(r)) => r.add(self),
        }
    }

    /// Difference.
    pub fn subtract(self, other: Exact) -> Result<Exact, ArithmeticError> {
        match (self, other) {
            (Exact::Integer(a), Exact::Integer(b)) => {
                a.checked_sub(b).map(Exact::Integer).ok_or(ArithmeticError::Overflow)
            }
            (Exact::Rational(r), other) => r.subtract(other),
            (Exact::Integer(a), Exact::Rational(_)) => Rational::whole(a).subtract(other),
        }
    }

    /// Product.
    pub fn multiply(self, other: Exact) -> Result<Exact, ArithmeticError> {
        match (self, other) {
            (Exact::Integer(a), Exact::Integer(b)) => {
                a.checked_mul(b).map(Exact::Integer).ok_or(ArithmeticError::Overflow)
            }
            (Exact::Rational(r), other) => r.multiply(other),
            (Exact::Integer(_), Exact::Rational(r)) => r.multiply(self),
        }
    }

    /// Exact quotient; integer division yields a rational when inexact.
    pub fn divide(self, other: Exact) -> Result<Exact, ArithmeticError> {
        match self {
            Exact::Integer(a) => Rational::whole(a).divide(other),
            Exact::Rational(r) => r.divide(other),
        }
    }

    /// Integer power; negative exponents take the reciprocal.
    pub fn pow(self, exp: i64) -> Result<Exact, ArithmeticError> {
        match self {
            Exact::Integer(a) => Rational::whole(a).pow(exp),
            Exact::Rational(r) => r.pow(exp),
        }
    }

    /// Negation.
    pub fn neg(self) -> Result<Exact, ArithmeticError> {
        match self {
            Exact::Integer(a) => a.checked_neg().map(Exact::Integer).ok_or(ArithmeticError::Overflow),
            Exact::Rational(r) => r.neg().map(Exact::Rational),
        }
    }

    /// Nearest floating point value.
    pub fn to_f64(self) -> f64 {
        match self {
            Exact::Integer(n) => n as f64,
            Exact::Rational(r) => r.to_f64(),
        }
    }
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exact::Integer(n) => write!(f, "{}", n),
            Exact::Rational(r) => write!(f, "{}", r),
        }
    }
}

/// A fraction in lowest terms with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: i64,
    denom: i64,
}

impl Rational {
    /// Creates a rational reduced to lowest terms with a positive
    /// denominator.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::DivisionByZero`] if `denom` is zero, or
    /// [`ArithmeticError::Overflow`] if normalizing the sign overflows
    /// (`i64::MIN` over `-1`).
    pub fn new(numer: i64, denom: i64) -> Result<Self, ArithmeticError> {
        Self::reduce(numer as i128, denom as i128)
    }

    /// Like [`new`](Self::new), but collapses to [`Exact::Integer`] when the
    /// reduced denominator is 1.
    pub fn make(numer: i64, denom: i64) -> Result<Exact, ArithmeticError> {
        Self::new(numer, denom).map(Exact::from)
    }

    fn reduce(numer: i128, denom: i128) -> Result<Self, ArithmeticError> {
        if denom == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        let g = gcd(numer, denom);
        let (mut numer, mut denom) = (numer / g, denom / g);
        if denom < 0 {
            numer = -numer;
            denom = -denom;
        }
        Ok(Self {
            numer: narrow(numer)?,
            denom: narrow(denom)?,
        })
    }

    fn collapse(numer: i128, denom: i128) -> Result<Exact, ArithmeticError> {
        Self::reduce(numer, denom).map(Exact::from)
    }

    fn whole(n: i64) -> Self {
        Self { numer: n, denom: 1 }
    }

    /// Numerator (carries the sign).
    pub fn numer(&self) -> i64 {
        self.numer
    }

    /// Denominator (always positive).
    pub fn denom(&self) -> i64 {
        self.denom
    }

    /// Whether the denominator is 1.
    pub fn is_integer(&self) -> bool {
        self.denom == 1
    }

    /// `self + other`.
    pub fn add(&self, other: impl Into<Exact>) -> Result<Exact, ArithmeticError> {
        let (a, b) = (self.numer as i128, self.denom as i128);
        let (c, d) = other.into().ratio();
        Self::collapse(a * d + c * b, b * d)
    }

    /// `self - other`.
    pub fn subtract(&self, other: impl Into<Exact>) -> Result<Exact, ArithmeticError> {
        let (a, b) = (self.numer as i128, self.denom as i128);
        let (c, d) = other.into().ratio();
        Self::collapse(a * d - c * b, b * d)
    }

    /// `self * other`.
    pub fn multiply(&self, other: impl Into<Exact>) -> Result<Exact, ArithmeticError> {
        let (a, b) = (self.numer as i128, self.denom as i128);
        let (c, d) = other.into().ratio();
        Self::collapse(a * c, b * d)
    }

    /// `self / other`.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::DivisionByZero`] if `other` is zero.
    pub fn divide(&self, other: impl Into<Exact>) -> Result<Exact, ArithmeticError> {
        let (a, b) = (self.numer as i128, self.denom as i128);
        let (c, d) = other.into().ratio();
        Self::collapse(a * d, b * c)
    }

    /// `1 / self`.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::DivisionByZero`] if `self` is zero.
    pub fn reciprocal(&self) -> Result<Exact, ArithmeticError> {
        Self::collapse(self.denom as i128, self.numer as i128)
    }

    /// `-self`.
    pub fn neg(&self) -> Result<Rational, ArithmeticError> {
        Self::reduce(-(self.numer as i128), self.denom as i128)
    }

    /// `self` raised to the integer power `exp`.
    pub fn pow(&self, exp: i64) -> Result<Exact, ArithmeticError> {
        let base = if exp < 0 {
            match self.reciprocal()? {
                Exact::Integer(n) => Rational::whole(n),
                Exact::Rational(r) => r,
            }
        } else {
            *self
        };
        if base.denom == 1 {
            match base.numer {
                0 | 1 if exp != 0 => return Ok(Exact::Integer(base.numer)),
                -1 => return Ok(Exact::Integer(if exp % 2 == 0 { 1 } else { -1 })),
                _ => {}
            }
        }
        let exp = u32::try_from(exp.unsigned_abs()).map_err(|_| ArithmeticError::Overflow)?;
        let numer = base.numer.checked_pow(exp).ok_or(ArithmeticError::Overflow)?;
        let denom = base.denom.checked_pow(exp).ok_or(ArithmeticError::Overflow)?;
        Self::make(numer, denom)
    }

    /// Nearest floating point value.
    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

/// Serializes as `["/", numerator, denominator]`.
impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element("/")?;
        seq.serialize_element(&self.numer)?;
        seq.serialize_element(&self.denom)?;
        seq.end()
    }
}

struct RationalVisitor;

impl<'de> Visitor<'de> for RationalVisitor {
    type Value = Rational;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"a tagged rational ["/", numerator, denominator]"#)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Rational, A::Error> {
        let tag: std::string::String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        if tag != "/" {
            return Err(de::Error::invalid_value(de::Unexpected::Str(&tag), &self));
        }
        let numer: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let denom: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(4, &self));
        }
        Rational::new(numer, denom).map_err(de::Error::custom)
    }
}

/// Deserializes from `["/", numerator, denominator]`, normalizing.
impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(RationalVisitor)
    }
}
