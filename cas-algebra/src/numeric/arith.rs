//! Arithmetic on [`Number`]s.
//!
//! The operator implementations never fail: indeterminate forms produce `NaN`, and exact
//! results that cannot be represented exactly are promoted to inexact values. [`Number::pow`]
//! is the exception, since most irrational powers are better left symbolic.

use super::{Exact, Number};
use crate::primitive::{complex, float, int};
use rug::{ops::Pow, Integer, Rational};
use std::{
    cmp::Ordering,
    ops::{Add, Div, Mul, Neg, Sub},
};

/// Exact powers whose result would need more bits than this are left symbolic.
const MAX_EXACT_BITS: u64 = 1 << 16;

impl Number {
    /// Adds two numbers, returning [`None`] if both are exact, non-zero, and have different
    /// radicals, in which case the sum has no single-literal exact form.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        use Number::*;

        Some(match (self, other) {
            (NaN, _) | (_, NaN) => NaN,
            (ComplexInfinity, ComplexInfinity | PositiveInfinity | NegativeInfinity)
                | (PositiveInfinity | NegativeInfinity, ComplexInfinity) => NaN,
            (ComplexInfinity, _) | (_, ComplexInfinity) => ComplexInfinity,
            (PositiveInfinity, NegativeInfinity) | (NegativeInfinity, PositiveInfinity) => NaN,
            (PositiveInfinity, _) | (_, PositiveInfinity) => PositiveInfinity,
            (NegativeInfinity, _) | (_, NegativeInfinity) => NegativeInfinity,
            (Exact(lhs), Exact(rhs)) => {
                if lhs.rational == 0 {
                    return Some(other.clone());
                }
                if rhs.rational == 0 {
                    return Some(self.clone());
                }
                if lhs.radical != rhs.radical {
                    return None;
                }
                Number::with_radical(
                    Rational::from(&lhs.rational + &rhs.rational),
                    lhs.radical.clone(),
                )
            },
            (Complex(_), _) | (_, Complex(_)) => {
                Number::complex(self.to_complex()? + other.to_complex()?)
            },
            _ => Number::real(self.to_float()? + other.to_float()?),
        })
    }

    /// Returns the reciprocal of the number, rationalizing exact denominators.
    ///
    /// `1 / (r*sqrt(k)) = sqrt(k) / (r*k)`
    pub fn inv(&self) -> Self {
        match self {
            Self::Exact(e) if e.rational == 0 => Self::ComplexInfinity,
            Self::Exact(e) => {
                let denom = e.rational.clone() * Rational::from(e.radical.clone());
                Self::with_radical(denom.recip(), e.radical.clone())
            },
            Self::Real(f) => Self::real(float(1) / f),
            Self::Complex(c) => Self::complex(c.clone().recip()),
            Self::NaN => Self::NaN,
            Self::PositiveInfinity | Self::NegativeInfinity | Self::ComplexInfinity => Self::zero(),
        }
    }

    /// Raises the number to the given power.
    ///
    /// Returns [`None`] if the result should stay symbolic: exact bases with exponents that are
    /// neither integers nor halves (`2^(1/3)`), square roots of negative or irrational exact
    /// numbers, and exact powers too large to compute.
    pub fn pow(&self, exp: &Self) -> Option<Self> {
        if self.is_nan() || exp.is_nan() {
            return Some(Self::NaN);
        }

        if exp.is_zero() {
            return Some(if self.is_zero() || self.is_infinite() {
                Self::NaN
            } else {
                Self::one()
            });
        }

        if exp.is_one() {
            return Some(self.clone());
        }

        if self.is_one() {
            return exp.is_finite().then(Self::one);
        }

        if self.is_zero() {
            return match exp.signum() {
                Some(Ordering::Greater) => Some(Self::zero()),
                Some(Ordering::Less) => Some(Self::ComplexInfinity),
                _ => None,
            };
        }

        if let Some(n) = exp.as_integer() {
            return self.pow_integer(n);
        }

        if !exp.is_finite() {
            return None;
        }

        if self.is_inexact() || exp.is_inexact() {
            return self.pow_inexact(exp);
        }

        // half-integer exponents of non-negative rationals
        let exp = exp.as_rational()?;
        if *exp.denom() == 2 && self.as_rational().is_some() && self.is_positive() {
            return self.sqrt()?.pow_integer(exp.numer());
        }

        None
    }

    /// Raises the number to an integer power.
    fn pow_integer(&self, n: &Integer) -> Option<Self> {
        let negative = *n < 0;
        let powered = match self {
            Self::Exact(e) => {
                let magnitude = n.clone().abs().to_u32()?;
                let bits = u64::from(e.rational.numer().significant_bits())
                    + u64::from(e.rational.denom().significant_bits())
                    + u64::from(e.radical.significant_bits());
                if bits * u64::from(magnitude) > MAX_EXACT_BITS {
                    return None;
                }

                // (r*sqrt(k))^n = r^n * k^(n/2), with sqrt(k) left over for odd n
                let rational = e.rational.clone().pow(magnitude)
                    * Rational::from(e.radical.clone().pow(magnitude / 2));
                let radical = if magnitude % 2 == 1 { e.radical.clone() } else { int(1) };
                Self::with_radical(rational, radical)
            },
            Self::Real(f) => return Some(Self::real(f.clone().pow(n))),
            Self::Complex(c) => return Some(Self::complex(c.clone().pow(&complex(n)))),
            Self::NaN => return Some(Self::NaN),
            Self::PositiveInfinity | Self::ComplexInfinity => self.clone(),
            Self::NegativeInfinity => {
                if n.is_odd() {
                    Self::NegativeInfinity
                } else {
                    Self::PositiveInfinity
                }
            },
        };

        if negative {
            Some(powered.inv())
        } else {
            Some(powered)
        }
    }

    /// Raises the number to a power, where at least one of them is inexact.
    fn pow_inexact(&self, exp: &Self) -> Option<Self> {
        if let (Some(base), Some(exp)) = (self.to_float(), exp.to_float()) {
            if base.cmp0() != Some(Ordering::Less) || exp.is_integer() {
                return Some(Self::real(base.pow(&exp)));
            }
        }

        Some(Self::complex(self.to_complex()?.pow(&exp.to_complex()?)))
    }

    /// Returns the principal square root of the number.
    ///
    /// Returns [`None`] for exact numbers whose square root has no exact form, namely negative
    /// exact numbers and exact numbers with a radical part.
    pub fn sqrt(&self) -> Option<Self> {
        match self {
            Self::Exact(e) if e.is_rational() && e.rational.cmp0() != Ordering::Less => {
                // sqrt(p/q) = sqrt(p*q) / q
                let (p, q) = (e.rational.numer(), e.rational.denom());
                Some(Self::radical(
                    Rational::from((int(1), q.clone())),
                    Integer::from(p * q),
                ))
            },
            Self::Exact(_) => None,
            Self::Real(f) if f.cmp0() != Some(Ordering::Less) => Some(Self::real(f.clone().sqrt())),
            Self::Real(_) | Self::Complex(_) => Some(Self::complex(self.to_complex()?.sqrt())),
            Self::NaN => Some(Self::NaN),
            Self::PositiveInfinity => Some(Self::PositiveInfinity),
            Self::NegativeInfinity | Self::ComplexInfinity => Some(Self::ComplexInfinity),
        }
    }
}

impl Add for &Number {
    type Output = Number;

    /// Adds two numbers. Exact numbers with different radicals produce an inexact sum.
    fn add(self, rhs: Self) -> Number {
        self.checked_add(rhs).unwrap_or_else(|| match (self.to_float(), rhs.to_float()) {
            (Some(lhs), Some(rhs)) => Number::real(lhs + rhs),
            _ => Number::NaN,
        })
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, rhs: Self) -> Number {
        self + &-rhs
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Exact(e) => Number::Exact(Exact {
                rational: -e.rational.clone(),
                radical: e.radical.clone(),
            }),
            Number::Real(f) => Number::Real(-f.clone()),
            Number::Complex(c) => Number::Complex(-c.clone()),
            Number::NaN => Number::NaN,
            Number::PositiveInfinity => Number::NegativeInfinity,
            Number::NegativeInfinity => Number::PositiveInfinity,
            Number::ComplexInfinity => Number::ComplexInfinity,
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        -&self
    }
}

impl Mul for &Number {
    type Output = Number;

    /// Multiplies two numbers. The radicals of exact numbers are fused:
    ///
    /// `sqrt(a) * sqrt(b) = g * sqrt((a/g) * (b/g))`, where `g = gcd(a, b)`
    fn mul(self, rhs: Self) -> Number {
        use Number::*;

        match (self, rhs) {
            (NaN, _) | (_, NaN) => NaN,
            (lhs, rhs) if lhs.is_infinite() || rhs.is_infinite() => {
                if lhs.is_zero() || rhs.is_zero() {
                    return NaN;
                }
                match (lhs.signum(), rhs.signum()) {
                    (Some(a), Some(b)) if a == b => PositiveInfinity,
                    (Some(_), Some(_)) => NegativeInfinity,
                    _ => ComplexInfinity,
                }
            },
            (Exact(lhs), Exact(rhs)) => {
                let gcd = lhs.radical.clone().gcd(&rhs.radical);
                let rational = Rational::from(&lhs.rational * &rhs.rational)
                    * Rational::from(gcd.clone());
                let radical = Integer::from(&lhs.radical / &gcd) * Integer::from(&rhs.radical / &gcd);
                Number::with_radical(rational, radical)
            },
            (Complex(_), _) | (_, Complex(_)) => match (self.to_complex(), rhs.to_complex()) {
                (Some(lhs), Some(rhs)) => Number::complex(lhs * rhs),
                _ => NaN,
            },
            _ => match (self.to_float(), rhs.to_float()) {
                (Some(lhs), Some(rhs)) => Number::real(lhs * rhs),
                _ => NaN,
            },
        }
    }
}

impl Div for &Number {
    type Output = Number;

    fn div(self, rhs: Self) -> Number {
        self * &rhs.inv()
    }
}
