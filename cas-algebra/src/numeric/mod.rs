//! Numeric literals.
//!
//! A [`Number`] is either an exact value of the form `rational * sqrt(radical)` ([`Exact`]), an
//! inexact real or complex value computed with [`PRECISION`](crate::primitive::PRECISION) bits,
//! or one of the special values `NaN`, `+Infinity`, `-Infinity` and `ComplexInfinity`.
//!
//! Exact arithmetic stays exact whenever the result can be represented exactly. When it cannot
//! (adding numbers with different radicals, or a radicand too large to prove square-free), the
//! result is promoted to an inexact value instead. Inexact results whose magnitude is within
//! [`TOLERANCE`] of zero are chopped to an exact zero.

mod arith;
mod radical;

use crate::consts::TOLERANCE;
use crate::primitive::{complex, float, int};
use rug::{Complex, Float, Integer, Rational};
use std::{cmp::Ordering, fmt};

/// An exact number of the form `rational * sqrt(radical)`.
///
/// The radical is always a positive square-free integer. A radical of `1` means the number is
/// rational.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exact {
    rational: Rational,
    radical: Integer,
}

impl Exact {
    /// The rational coefficient.
    pub fn rational(&self) -> &Rational {
        &self.rational
    }

    /// The square-free radicand.
    pub fn radical(&self) -> &Integer {
        &self.radical
    }

    /// Returns true if this number has no radical part.
    pub fn is_rational(&self) -> bool {
        self.radical == 1
    }

    /// Returns true if this number is an integer.
    pub fn is_integer(&self) -> bool {
        self.is_rational() && *self.rational.denom() == 1
    }

    /// Approximates this number with a [`Float`].
    pub fn to_float(&self) -> Float {
        let root = float(&self.radical).sqrt();
        float(&self.rational) * root
    }

    /// Compares the values of two exact numbers without approximating either.
    fn cmp_value(&self, other: &Self) -> Ordering {
        if self.radical == other.radical {
            return self.rational.cmp(&other.rational);
        }

        let (lhs_sign, rhs_sign) = (self.rational.cmp0(), other.rational.cmp0());
        if lhs_sign != rhs_sign {
            return lhs_sign.cmp(&rhs_sign);
        }

        // same sign, so compare the squares
        let square = |e: &Exact| {
            Rational::from(&e.rational * &e.rational) * Rational::from(e.radical.clone())
        };
        let ord = square(self).cmp(&square(other));
        if lhs_sign == Ordering::Less {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// A numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An exact rational, possibly multiplied by the square root of a square-free integer.
    Exact(Exact),

    /// An inexact real number. Never zero, infinite or `NaN`.
    Real(Float),

    /// An inexact complex number with a non-zero imaginary part.
    Complex(Complex),

    /// Not a number, the result of indeterminate forms such as `0/0`.
    NaN,

    PositiveInfinity,

    NegativeInfinity,

    /// The infinity of the complex plane, with no particular direction, such as `1/0`.
    ComplexInfinity,
}

impl Number {
    /// Creates an exact integer.
    pub fn integer(n: impl Into<Integer>) -> Self {
        Self::from_rational(Rational::from(n.into()))
    }

    /// Creates the exact rational `numer / denom`.
    ///
    /// A zero denominator produces `NaN` for `0/0`, and `ComplexInfinity` otherwise.
    pub fn rational(numer: impl Into<Integer>, denom: impl Into<Integer>) -> Self {
        let (numer, denom) = (numer.into(), denom.into());
        if denom == 0 {
            return if numer == 0 { Self::NaN } else { Self::ComplexInfinity };
        }
        Self::from_rational(Rational::from((numer, denom)))
    }

    /// Creates an exact rational.
    pub fn from_rational(rational: Rational) -> Self {
        Self::Exact(Exact { rational, radical: int(1) })
    }

    /// Creates `rational * sqrt(radicand)`, extracting square factors out of the radicand.
    ///
    /// If the radicand is negative, or too large to be proven square-free, the result is
    /// inexact.
    pub fn radical(rational: Rational, radicand: Integer) -> Self {
        if rational == 0 || radicand == 0 {
            return Self::zero();
        }

        if radicand < 0 {
            let magnitude = float(&rational) * float(-radicand).sqrt();
            return Self::complex(complex((0, magnitude)));
        }

        match radical::split_square(&radicand) {
            Some((outside, inside)) => {
                Self::with_radical(rational * Rational::from(outside), inside)
            },
            None => Self::real(float(&rational) * float(&radicand).sqrt()),
        }
    }

    /// Creates `rational * sqrt(radical)` where the radical is already known to be square-free.
    pub(crate) fn with_radical(rational: Rational, radical: Integer) -> Self {
        if rational == 0 {
            Self::zero()
        } else {
            Self::Exact(Exact { rational, radical })
        }
    }

    /// Creates an inexact real, chopping values within [`TOLERANCE`] of zero to an exact zero.
    pub fn real(value: Float) -> Self {
        if value.is_nan() {
            Self::NaN
        } else if value.is_infinite() {
            if value.is_sign_negative() {
                Self::NegativeInfinity
            } else {
                Self::PositiveInfinity
            }
        } else if value.clone().abs() < TOLERANCE {
            Self::zero()
        } else {
            Self::Real(value)
        }
    }

    /// Creates an inexact complex number. Parts within [`TOLERANCE`] of zero are chopped, which
    /// may produce a real number instead.
    pub fn complex(value: Complex) -> Self {
        let (re, im) = value.into_real_imag();
        if re.is_nan() || im.is_nan() {
            return Self::NaN;
        }
        if re.is_infinite() || im.is_infinite() {
            return Self::ComplexInfinity;
        }
        if im.clone().abs() < TOLERANCE {
            return Self::real(re);
        }

        let re = if re.clone().abs() < TOLERANCE { float(0) } else { re };
        Self::Complex(complex((re, im)))
    }

    /// The exact zero.
    pub fn zero() -> Self {
        Self::integer(0)
    }

    /// The exact one.
    pub fn one() -> Self {
        Self::integer(1)
    }

    /// Returns true if the number is exactly zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Exact(e) if e.rational == 0)
    }

    /// Returns true if the number is exactly one.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Exact(e) if e.is_rational() && e.rational == 1)
    }

    /// Returns true if the number is exactly negative one.
    pub fn is_negative_one(&self) -> bool {
        matches!(self, Self::Exact(e) if e.is_rational() && e.rational == -1)
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    pub fn is_inexact(&self) -> bool {
        matches!(self, Self::Real(_) | Self::Complex(_))
    }

    /// Returns true if the number is an exact integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Exact(e) if e.is_integer())
    }

    /// Returns true if the number is an exact rational (including integers).
    pub fn is_rational(&self) -> bool {
        matches!(self, Self::Exact(e) if e.is_rational())
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Self::NaN)
    }

    /// Returns true for any of the three infinities.
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::PositiveInfinity | Self::NegativeInfinity | Self::ComplexInfinity)
    }

    /// Returns true if the number is finite and not `NaN`.
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Exact(_) | Self::Real(_) | Self::Complex(_))
    }

    /// Returns the sign of a real number, or [`None`] for complex numbers and `NaN`.
    pub fn signum(&self) -> Option<Ordering> {
        match self {
            Self::Exact(e) => Some(e.rational.cmp0()),
            Self::Real(f) => f.cmp0(),
            Self::PositiveInfinity => Some(Ordering::Greater),
            Self::NegativeInfinity => Some(Ordering::Less),
            Self::Complex(_) | Self::NaN | Self::ComplexInfinity => None,
        }
    }

    /// Returns true if the number is real and strictly negative.
    pub fn is_negative(&self) -> bool {
        self.signum() == Some(Ordering::Less)
    }

    /// Returns true if the number is real and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.signum() == Some(Ordering::Greater)
    }

    pub fn as_exact(&self) -> Option<&Exact> {
        match self {
            Self::Exact(e) => Some(e),
            _ => None,
        }
    }

    /// If the number is an exact integer, returns a reference to it.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Exact(e) if e.is_integer() => Some(e.rational.numer()),
            _ => None,
        }
    }

    /// If the number is an exact rational, returns a reference to it.
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Self::Exact(e) if e.is_rational() => Some(&e.rational),
            _ => None,
        }
    }

    /// Approximates a finite real number with a [`Float`].
    pub fn to_float(&self) -> Option<Float> {
        match self {
            Self::Exact(e) => Some(e.to_float()),
            Self::Real(f) => Some(f.clone()),
            _ => None,
        }
    }

    /// Approximates a finite number with a [`Complex`].
    pub fn to_complex(&self) -> Option<Complex> {
        match self {
            Self::Complex(c) => Some(c.clone()),
            _ => self.to_float().map(complex),
        }
    }

    /// Approximates a real number with an [`f64`]. Complex numbers and `ComplexInfinity` map to
    /// [`f64::NAN`].
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Exact(e) => e.to_float().to_f64(),
            Self::Real(f) => f.to_f64(),
            Self::PositiveInfinity => f64::INFINITY,
            Self::NegativeInfinity => f64::NEG_INFINITY,
            Self::Complex(_) | Self::NaN | Self::ComplexInfinity => f64::NAN,
        }
    }

    /// The absolute value of the number.
    pub fn abs(&self) -> Self {
        match self {
            Self::Exact(e) => Self::Exact(Exact {
                rational: e.rational.clone().abs(),
                radical: e.radical.clone(),
            }),
            Self::Real(f) => Self::Real(f.clone().abs()),
            Self::Complex(c) => Self::real(c.clone().abs().into_real_imag().0),
            Self::NaN => Self::NaN,
            Self::PositiveInfinity | Self::NegativeInfinity | Self::ComplexInfinity => {
                Self::PositiveInfinity
            },
        }
    }

    /// Compares the values of two real numbers. Returns [`None`] if either number is not real.
    pub fn cmp_real(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::PositiveInfinity, Self::PositiveInfinity)
                | (Self::NegativeInfinity, Self::NegativeInfinity) => Some(Ordering::Equal),
            (Self::NegativeInfinity, rhs) if rhs.signum().is_some() => Some(Ordering::Less),
            (lhs, Self::NegativeInfinity) if lhs.signum().is_some() => Some(Ordering::Greater),
            (Self::PositiveInfinity, rhs) if rhs.signum().is_some() => Some(Ordering::Greater),
            (lhs, Self::PositiveInfinity) if lhs.signum().is_some() => Some(Ordering::Less),
            (Self::Exact(lhs), Self::Exact(rhs)) => Some(lhs.cmp_value(rhs)),
            (lhs, rhs) => lhs.to_float()?.partial_cmp(&rhs.to_float()?),
        }
    }

    /// A total order over all numbers, used to sort literal operands.
    ///
    /// Real numbers come first, ordered by value, with exact numbers before inexact numbers of
    /// equal value. Complex numbers, the infinities and `NaN` follow.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        fn rank(n: &Number) -> u8 {
            match n {
                Number::Exact(_) => 0,
                Number::Real(_) => 1,
                Number::Complex(_) => 2,
                Number::NegativeInfinity => 3,
                Number::PositiveInfinity => 4,
                Number::ComplexInfinity => 5,
                Number::NaN => 6,
            }
        }

        match (self, other) {
            (Self::Exact(lhs), Self::Exact(rhs)) => lhs.cmp_value(rhs),
            (Self::Exact(_) | Self::Real(_), Self::Exact(_) | Self::Real(_)) => self
                .cmp_real(other)
                .unwrap_or(Ordering::Equal)
                .then_with(|| rank(self).cmp(&rank(other))),
            (Self::Complex(lhs), Self::Complex(rhs)) => lhs
                .real()
                .partial_cmp(rhs.real())
                .unwrap_or(Ordering::Equal)
                .then_with(|| lhs.imag().partial_cmp(rhs.imag()).unwrap_or(Ordering::Equal)),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::integer(n)
    }
}

impl From<Rational> for Number {
    fn from(r: Rational) -> Self {
        Self::from_rational(r)
    }
}

impl From<Float> for Number {
    fn from(f: Float) -> Self {
        Self::real(f)
    }
}

impl From<Complex> for Number {
    fn from(c: Complex) -> Self {
        Self::complex(c)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(e) if e.is_rational() => write!(f, "{}", e.rational),
            Self::Exact(e) => {
                let numer = e.rational.numer();
                if *numer == -1 {
                    write!(f, "-")?;
                } else if *numer != 1 {
                    write!(f, "{}", numer)?;
                }
                write!(f, "√{}", e.radical)?;
                if *e.rational.denom() != 1 {
                    write!(f, "/{}", e.rational.denom())?;
                }
                Ok(())
            },
            Self::Real(value) => write!(f, "{}", value.to_f64()),
            Self::Complex(value) => {
                let (re, im) = (value.real().to_f64(), value.imag().to_f64());
                if im < 0.0 {
                    write!(f, "({} - {}i)", re, -im)
                } else {
                    write!(f, "({} + {}i)", re, im)
                }
            },
            Self::NaN => write!(f, "NaN"),
            Self::PositiveInfinity => write!(f, "+Infinity"),
            Self::NegativeInfinity => write!(f, "-Infinity"),
            Self::ComplexInfinity => write!(f, "ComplexInfinity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::rational;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_denominator() {
        assert_eq!(Number::rational(0, 0), Number::NaN);
        assert_eq!(Number::rational(3, 0), Number::ComplexInfinity);
        assert_eq!(Number::rational(6, 4), Number::from_rational(rational(3, 2)));
    }

    #[test]
    fn radicals_are_square_free() {
        let n = Number::radical(rational(1, 1), int(12));
        let e = n.as_exact().unwrap();
        assert_eq!(*e.rational(), 2);
        assert_eq!(*e.radical(), 3);
        assert_eq!(n.to_string(), "2√3");

        assert_eq!(Number::radical(rational(1, 2), int(16)), Number::integer(2));
        assert_eq!(Number::radical(rational(-3, 4), int(2)).to_string(), "-3√2/4");
    }

    #[test]
    fn chop_to_exact_zero() {
        assert_eq!(Number::real(float(1e-12)), Number::zero());
        assert!(Number::real(float(1e-12)).is_exact());
        assert_eq!(Number::complex(complex((2.5, 1e-14))), Number::real(float(2.5)));
    }

    #[test]
    fn compare_radicals_exactly() {
        // 2√3 = √12 > √11
        let lhs = Number::radical(rational(1, 1), int(12));
        let rhs = Number::radical(rational(1, 1), int(11));
        assert_eq!(lhs.cmp_real(&rhs), Some(Ordering::Greater));
        assert_eq!((-&lhs).cmp_real(&-&rhs), Some(Ordering::Less));
    }

    #[test]
    fn total_order() {
        let mut numbers = vec![
            Number::NaN,
            Number::real(float(0.5)),
            Number::integer(3),
            Number::PositiveInfinity,
            Number::rational(1, 2),
            Number::integer(-1),
        ];
        numbers.sort_by(Number::total_cmp);
        assert_eq!(numbers, vec![
            Number::integer(-1),
            Number::rational(1, 2),
            Number::real(float(0.5)),
            Number::integer(3),
            Number::PositiveInfinity,
            Number::NaN,
        ]);
    }

    #[test]
    fn display() {
        assert_eq!(Number::rational(-3, 4).to_string(), "-3/4");
        assert_eq!(Number::radical(rational(1, 1), int(2)).to_string(), "√2");
        assert_eq!(Number::radical(rational(-1, 1), int(2)).to_string(), "-√2");
        assert_eq!(Number::real(float(2.5)).to_string(), "2.5");
        assert_eq!(Number::complex(complex((1, -2))).to_string(), "(1 - 2i)");
    }
}
