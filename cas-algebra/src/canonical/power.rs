//! Canonical forms of quotients, powers and roots.

use super::{apply, multiply, negate::negate_canonical};
use crate::consts::{I, NAN, NEG_ONE, ONE};
use crate::expr::{Expr, ExprKind, Operator};
use crate::numeric::Number;
use rug::ops::Pow;

/// Returns the canonical form of `num / den`.
pub fn divide(num: Expr, den: Expr) -> Expr {
    apply(Operator::Divide, vec![num, den])
}

/// Returns the canonical form of `base ^ exp`.
pub fn power(base: Expr, exp: Expr) -> Expr {
    apply(Operator::Power, vec![base, exp])
}

/// Returns the canonical form of the principal square root of `x`.
pub fn sqrt(x: Expr) -> Expr {
    apply(Operator::Sqrt, vec![x])
}

/// Returns the canonical form of the `n`-th root of `x`.
pub fn root(x: Expr, n: Expr) -> Expr {
    apply(Operator::Root, vec![x, n])
}

/// Quotients are products with a reciprocal: `a / b = a * b^(-1)`.
pub(super) fn divide_canonical(num: Expr, den: Expr) -> Expr {
    if let (Some(a), Some(b)) = (num.as_number(), den.as_number()) {
        return Expr::number(a / b);
    }
    if den.is_one() {
        return num;
    }
    multiply::fold(vec![num, power_canonical(den, NEG_ONE.clone())])
}

/// Builds the canonical form of `base ^ exp`.
///
/// - numeric powers are evaluated when they have an exact or inexact value (`2^10 = 1024`,
///   `8^(1/2) = 2√2`)
/// - `x^0 = 1`, `x^1 = x`, `x^(1/2) = Sqrt(x)`
/// - `(x^a)^n = x^(a*n)` for integer `n`
/// - `Sqrt(x)^n = x^(n/2)`
/// - `(-x)^n = x^n` or `-(x^n)` for integer `n`
pub(super) fn power_canonical(base: Expr, exp: Expr) -> Expr {
    if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
        if let Some(value) = b.pow(e) {
            return Expr::number(value);
        }
    }

    if base.as_number().is_some_and(Number::is_nan) || exp.as_number().is_some_and(Number::is_nan) {
        return NAN.clone();
    }

    if let Some(e) = exp.as_number() {
        if e.is_zero() {
            return ONE.clone();
        }
        if e.is_one() {
            return base;
        }
        if *e == Number::rational(1, 2) {
            return sqrt_canonical(base);
        }
    }

    let integer_exp = exp.as_integer().is_some();
    match base.kind() {
        ExprKind::Function(Operator::Power, operands) if operands.len() == 2 => {
            let (inner, inner_exp) = (&operands[0], &operands[1]);
            let non_negative = inner.as_number().is_some_and(|n| !n.is_negative() && n.signum().is_some());
            if integer_exp || non_negative {
                let exp = multiply::fold(vec![inner_exp.clone(), exp]);
                return power_canonical(inner.clone(), exp);
            }
        },
        ExprKind::Function(Operator::Sqrt, operands) if operands.len() == 1 && integer_exp => {
            let exp = multiply::fold(vec![exp, Expr::rational(1, 2)]);
            return power_canonical(operands[0].clone(), exp);
        },
        ExprKind::Function(Operator::Negate, operands) if operands.len() == 1 => {
            if let Some(n) = exp.as_integer() {
                let powered = power_canonical(operands[0].clone(), exp.clone());
                return if n.is_even() { powered } else { negate_canonical(powered) };
            }
        },
        _ => {},
    }

    Expr::canonical_function(Operator::Power, vec![base, exp])
}

/// Builds the canonical principal square root of `x`.
///
/// Square roots of rational literals are exact literals (`Sqrt(12) = 2√3`), and square roots of
/// negative rationals are imaginary (`Sqrt(-4) = 2 * ImaginaryUnit`).
pub(super) fn sqrt_canonical(x: Expr) -> Expr {
    if let Some(n) = x.as_number() {
        if let Some(value) = n.sqrt() {
            return Expr::number(value);
        }
        if n.is_rational() && n.is_negative() {
            let magnitude = sqrt_canonical(Expr::number(-n));
            return multiply::fold(vec![magnitude, I.clone()]);
        }
    }
    Expr::canonical_function(Operator::Sqrt, vec![x])
}

/// Builds the canonical `n`-th root of `x`. Perfect integer roots are evaluated.
///
/// A root of degree zero is left unevaluated.
pub(super) fn root_canonical(x: Expr, n: Expr) -> Expr {
    if n.is_one() {
        return x;
    }

    if let Some(degree) = n.as_integer().and_then(|n| n.to_u32()).filter(|&n| n != 0) {
        if degree == 2 {
            return sqrt_canonical(x);
        }

        if let Some(radicand) = x.as_integer().filter(|x| **x >= 0) {
            let root = radicand.clone().root(degree);
            if root.clone().pow(degree) == *radicand {
                return Expr::integer(root);
            }
        }
    }

    Expr::canonical_function(Operator::Root, vec![x, n])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{int, rational};
    use pretty_assertions::assert_eq;

    fn raw(op: Operator, operands: Vec<Expr>) -> Expr {
        Expr::raw(op, operands)
    }

    #[test]
    fn quotients() {
        let x = Expr::symbol("x");
        assert_eq!(divide(Expr::integer(6), Expr::integer(4)), Expr::rational(3, 2));
        assert_eq!(divide(x.clone(), Expr::integer(1)), x);
        assert_eq!(
            divide(x.clone(), Expr::integer(2)),
            raw(Operator::Multiply, vec![Expr::rational(1, 2), x.clone()]),
        );
        assert_eq!(
            divide(Expr::integer(1), x.clone()),
            raw(Operator::Power, vec![x, Expr::integer(-1)]),
        );
        assert_eq!(divide(Expr::integer(1), Expr::integer(0)), Expr::number(Number::ComplexInfinity));
    }

    #[test]
    fn trivial_exponents() {
        let x = Expr::symbol("x");
        assert_eq!(power(x.clone(), Expr::integer(0)), ONE.clone());
        assert_eq!(power(x.clone(), Expr::integer(1)), x);
        assert_eq!(power(Expr::integer(0), Expr::integer(0)), NAN.clone());
        assert_eq!(power(Expr::integer(2), Expr::integer(10)), Expr::integer(1024));
        assert_eq!(power(x.clone(), Expr::rational(1, 2)), raw(Operator::Sqrt, vec![x]));
    }

    #[test]
    fn nested_powers() {
        let x = Expr::symbol("x");
        let square = power(x.clone(), Expr::integer(2));
        assert_eq!(
            power(square, Expr::integer(3)),
            raw(Operator::Power, vec![x.clone(), Expr::integer(6)]),
        );

        let root = sqrt(x.clone());
        assert_eq!(power(root.clone(), Expr::integer(2)), x);
        assert_eq!(
            power(root, Expr::integer(3)),
            raw(Operator::Power, vec![x, Expr::rational(3, 2)]),
        );
    }

    #[test]
    fn negated_bases() {
        let x = Expr::symbol("x");
        let neg_x = Expr::function(Operator::Negate, vec![x.clone()]);
        assert_eq!(
            power(neg_x.clone(), Expr::integer(2)),
            raw(Operator::Power, vec![x.clone(), Expr::integer(2)]),
        );
        assert_eq!(
            power(neg_x, Expr::integer(3)),
            raw(Operator::Negate, vec![raw(Operator::Power, vec![x, Expr::integer(3)])]),
        );
    }

    #[test]
    fn square_roots() {
        assert_eq!(sqrt(Expr::integer(12)), Expr::number(Number::radical(rational(2, 1), int(3))));
        assert_eq!(sqrt(Expr::integer(-4)), raw(Operator::Multiply, vec![Expr::integer(2), I.clone()]));
        assert_eq!(sqrt(Expr::integer(-1)), I.clone());
        assert_eq!(sqrt(Expr::symbol("x")), raw(Operator::Sqrt, vec![Expr::symbol("x")]));
    }

    #[test]
    fn roots() {
        let x = Expr::symbol("x");
        assert_eq!(root(Expr::integer(27), Expr::integer(3)), Expr::integer(3));
        assert_eq!(root(x.clone(), Expr::integer(2)), raw(Operator::Sqrt, vec![x.clone()]));
        assert_eq!(root(x.clone(), Expr::integer(1)), x);
        assert_eq!(
            root(Expr::integer(2), Expr::integer(3)),
            raw(Operator::Root, vec![Expr::integer(2), Expr::integer(3)]),
        );
    }

    #[test]
    fn zero_degree_root() {
        assert_eq!(
            root(Expr::integer(8), Expr::integer(0)),
            raw(Operator::Root, vec![Expr::integer(8), Expr::integer(0)]),
        );
        assert_eq!(
            root(Expr::integer(0), Expr::integer(0)),
            raw(Operator::Root, vec![Expr::integer(0), Expr::integer(0)]),
        );
    }
}
