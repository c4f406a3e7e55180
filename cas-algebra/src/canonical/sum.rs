//! Canonical forms of indexed sums and products, such as `Sum(k^2, Limits(k, 1, 10))`.

use super::{add, apply, multiply, power::power_canonical};
use crate::consts::{ONE, ZERO};
use crate::expr::{Expr, Operator};
use rug::Integer;

/// Ranges with at most this many values are unrolled into a plain sum or product.
const UNROLL_LIMIT: u32 = 64;

/// Returns the canonical form of `Sum(body, limits)`.
pub fn sum(body: Expr, limits: Expr) -> Expr {
    apply(Operator::Sum, vec![body, limits])
}

/// Returns the canonical form of `Product(body, limits)`.
pub fn product(body: Expr, limits: Expr) -> Expr {
    apply(Operator::Product, vec![body, limits])
}

/// Builds the canonical form of an indexed sum or product.
///
/// Only ranges with integer bounds are evaluated. Empty ranges give `0` (or `1`). If the body does
/// not depend on the index, the result is `count * body` (or `body^count`). Small ranges are
/// unrolled by instantiating the body for every value of the index.
pub(super) fn fold(op: Operator, body: Expr, limits: Expr) -> Expr {
    let (index, lower, upper) = match limits.as_function() {
        Some((Operator::Limits, [index, lower, upper])) => match index.as_symbol() {
            Some(index) => (index, lower, upper),
            None => return Expr::error("invalid-index", Some(limits.clone())),
        },
        // already reported by the limits themselves
        Some((Operator::Error, _)) => return limits.clone(),
        _ => return Expr::error("expected-limits", Some(limits.clone())),
    };

    let is_sum = op == Operator::Sum;
    let Some((lower, upper)) = lower.as_integer().zip(upper.as_integer()) else {
        // the count of a symbolic range may be negative
        return Expr::canonical_function(op, vec![body, limits]);
    };

    if upper < lower {
        return if is_sum { ZERO.clone() } else { ONE.clone() };
    }

    let span = Integer::from(upper - lower);
    if !body.has_symbol(index) {
        let count = Expr::integer(span + 1);
        return if is_sum {
            multiply::fold(vec![count, body])
        } else {
            power_canonical(body, count)
        };
    }

    if span < UNROLL_LIMIT {
        let mut values = Vec::new();
        let mut k = lower.clone();
        while k <= *upper {
            values.push(body.subs(index, &Expr::integer(k.clone())));
            k += 1;
        }
        return if is_sum { add::fold(values) } else { multiply::fold(values) };
    }

    Expr::canonical_function(op, vec![body, limits])
}
