//! Canonical form of products.

use super::{apply, flatten, negate::negate_canonical};
use crate::consts::{NAN, ONE, ZERO};
use crate::expr::{Expr, ExprKind, Operator};
use crate::numeric::Number;

/// Returns the canonical product of the given factors.
pub fn multiply(factors: Vec<Expr>) -> Expr {
    apply(Operator::Multiply, factors)
}

/// Builds the canonical product of canonical factors.
///
/// All numeric literals are folded into a single coefficient, which fuses radicals
/// (`√2 * √6 = 2√3`). Negations (`Negate` wrappers and negative literals) are collected into a
/// single sign, which is then put back onto the coefficient, or onto the whole product if there
/// is no coefficient.
///
/// - `2 * (x * 3) = 6x`
/// - `-x * -y = x*y`
/// - `-1 * x = -x`
/// - `0 * x = 0`
pub(super) fn fold(factors: Vec<Expr>) -> Expr {
    let mut negative = false;
    let mut coefficient = Number::one();
    let mut rest = Vec::new();

    let mut pending = flatten(&Operator::Multiply, factors);
    while let Some(factor) = pending.pop() {
        match factor.kind() {
            ExprKind::Number(n) => coefficient = &coefficient * n,
            ExprKind::Function(Operator::Negate, operands) if operands.len() == 1 => {
                negative = !negative;
                let inner = &operands[0];
                if inner.is_application_of(&Operator::Multiply) {
                    pending.extend(inner.operands().iter().cloned());
                } else {
                    pending.push(inner.clone());
                }
            },
            _ => rest.push(factor),
        }
    }

    if coefficient.is_nan() {
        return NAN.clone();
    }
    if coefficient.is_zero() {
        return ZERO.clone();
    }
    if coefficient.is_negative() {
        negative = !negative;
        coefficient = -coefficient;
    }

    rest.sort_by(Expr::canonical_order);

    if negative {
        if coefficient.is_one() && !rest.is_empty() {
            return negate_canonical(product_of(rest));
        }
        coefficient = -coefficient;
    }

    let mut operands = Vec::with_capacity(rest.len() + 1);
    if !coefficient.is_one() {
        operands.push(Expr::number(coefficient));
    }
    operands.extend(rest);
    product_of(operands)
}

/// Wraps sorted, canonical factors in a product, collapsing zero or one factors.
fn product_of(mut factors: Vec<Expr>) -> Expr {
    if factors.len() <= 1 {
        return factors.pop().unwrap_or_else(|| ONE.clone());
    }
    Expr::canonical_function(Operator::Multiply, factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{int, rational};
    use pretty_assertions::assert_eq;

    fn neg(expr: Expr) -> Expr {
        Expr::function(Operator::Negate, vec![expr])
    }

    #[test]
    fn fold_coefficients() {
        let x = Expr::symbol("x");
        let expr = multiply(vec![
            Expr::integer(2),
            Expr::raw(Operator::Multiply, vec![x.clone(), Expr::integer(3)]),
        ]);
        assert_eq!(expr, Expr::raw(Operator::Multiply, vec![Expr::integer(6), x]));
    }

    #[test]
    fn fuse_radicals() {
        let sqrt2 = Expr::function(Operator::Sqrt, vec![Expr::integer(2)]);
        let sqrt6 = Expr::function(Operator::Sqrt, vec![Expr::integer(6)]);
        assert_eq!(
            multiply(vec![sqrt2, sqrt6]),
            Expr::number(Number::radical(rational(2, 1), int(3))),
        );
        assert_eq!(
            multiply(vec![Expr::integer(2), Expr::function(Operator::Sqrt, vec![Expr::integer(3)])]).to_string(),
            "2√3",
        );
    }

    #[test]
    fn signs() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        assert_eq!(multiply(vec![neg(x.clone()), neg(y.clone())]), multiply(vec![x.clone(), y.clone()]));
        assert_eq!(multiply(vec![Expr::integer(-1), x.clone()]), Expr::raw(Operator::Negate, vec![x.clone()]));
        assert_eq!(
            multiply(vec![Expr::integer(-2), neg(x.clone()), y.clone()]),
            Expr::raw(Operator::Multiply, vec![Expr::integer(2), x.clone(), y.clone()]),
        );
        assert_eq!(
            multiply(vec![neg(x.clone()), y.clone()]),
            Expr::raw(Operator::Negate, vec![Expr::raw(Operator::Multiply, vec![x.clone(), y.clone()])]),
        );
        assert_eq!(multiply(vec![Expr::integer(-1), Expr::integer(-1)]), ONE.clone());
    }

    #[test]
    fn zero_and_one() {
        let x = Expr::symbol("x");
        assert_eq!(multiply(vec![Expr::integer(0), x.clone()]), ZERO.clone());
        assert_eq!(multiply(vec![Expr::integer(1), x.clone()]), x);
        assert_eq!(multiply(vec![]), ONE.clone());
        assert_eq!(
            multiply(vec![Expr::integer(0), Expr::number(Number::PositiveInfinity)]),
            NAN.clone(),
        );
    }
}
