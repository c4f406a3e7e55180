//! Functions to construct [`Integer`]s, [`Rational`]s, [`Float`]s, and [`Complex`] numbers from
//! various types.

use rug::{Assign, Complex, Float, Integer, Rational};

/// The number of bits of precision to use when computing inexact values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] from a numerator and a non-zero denominator.
pub fn rational(numer: impl Into<Integer>, denom: impl Into<Integer>) -> Rational {
    Rational::from((numer.into(), denom.into()))
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Parses a [`Float`] from a decimal string slice, returning [`None`] if it is malformed.
pub fn float_from_str(s: &str) -> Option<Float> {
    Float::parse(s).ok().map(|parsed| Float::with_val(PRECISION, parsed))
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(PRECISION, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;

    #[test]
    fn rational_is_reduced() {
        let r = rational(6, -8);
        assert_eq!(*r.numer(), -3);
        assert_eq!(*r.denom(), 4);
    }

    #[test]
    fn parse_float() {
        assert_float_absolute_eq!(float_from_str("3.25").unwrap().to_f64(), 3.25);
        assert_float_absolute_eq!(float_from_str("-1.5e3").unwrap().to_f64(), -1500.0);
        assert!(float_from_str("three").is_none());
    }
}
