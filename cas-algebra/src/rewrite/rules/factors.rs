//! Combining like factors: `x^2 * x^3 = x^5`.

use super::{f, w};
use crate::canonical::{add, multiply, power};
use crate::consts::{ONE, ONE_HALF};
use crate::expr::{Expr, Operator};
use crate::rewrite::UnbuiltRule;

/// Splits a factor into its base and exponent.
///
/// - `x^n` -> `(x, n)`
/// - `sqrt(x)` -> `(x, 1/2)`
/// - `x` -> `(x, 1)`
fn split_exponent(factor: &Expr) -> (Expr, Expr) {
    match factor.as_function() {
        Some((Operator::Power, [base, exp])) => (base.clone(), exp.clone()),
        Some((Operator::Sqrt, [base])) => (base.clone(), ONE_HALF.clone()),
        _ => (factor.clone(), ONE.clone()),
    }
}

/// `a^b * a^c = a^(b + c)`
///
/// Returns [`None`] if no two factors share a base.
fn combine_like_factors(factors: &[Expr]) -> Option<Expr> {
    let mut split = factors.iter().map(split_exponent).collect::<Vec<_>>();
    let mut combined = Vec::with_capacity(split.len());
    let mut changed = false;

    while let Some((base, mut exp)) = split.pop() {
        let mut i = 0;
        while i < split.len() {
            if split[i].0 == base {
                let (_, other) = split.swap_remove(i);
                exp = add(vec![exp, other]);
                changed = true;
            } else {
                i += 1;
            }
        }
        combined.push(power(base, exp));
    }

    changed.then(|| multiply(combined))
}

pub(super) fn rules() -> Vec<UnbuiltRule> {
    vec![UnbuiltRule::evaluate(
        f(Operator::Multiply, vec![w("__factors")]),
        "combine-like-factors",
        |expr, _| combine_like_factors(expr.operands()),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn combine(factors: Vec<Expr>) -> Option<Expr> {
        combine_like_factors(Expr::function(Operator::Multiply, factors).operands())
    }

    fn pow(base: &Expr, exp: Expr) -> Expr {
        Expr::function(Operator::Power, vec![base.clone(), exp])
    }

    #[test]
    fn like_factors() {
        let x = Expr::symbol("x");
        assert_eq!(combine(vec![pow(&x, Expr::integer(2)), pow(&x, Expr::integer(3))]), Some(pow(&x, Expr::integer(5))));
        assert_eq!(combine(vec![x.clone(), x.clone()]), Some(pow(&x, Expr::integer(2))));
        assert_eq!(
            combine(vec![x.clone(), Expr::function(Operator::Sqrt, vec![x.clone()])]),
            Some(pow(&x, Expr::rational(3, 2))),
        );
        assert_eq!(combine(vec![x.clone(), pow(&x, Expr::integer(-1))]), Some(Expr::integer(1)));
    }

    #[test]
    fn unlike_factors() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        assert_eq!(combine(vec![Expr::integer(3), x, y]), None);
    }
}
