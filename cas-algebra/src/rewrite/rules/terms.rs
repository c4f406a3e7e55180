//! Combining like terms: `2x + 3x = 5x`.

use super::{f, w};
use crate::canonical::{add, multiply};
use crate::expr::{Expr, Operator};
use crate::numeric::Number;
use crate::rewrite::UnbuiltRule;

/// Splits a term into its rational coefficient and the rest of the term.
///
/// - `3*x*y` -> `(3, x*y)`
/// - `-x` -> `(-1, x)`
/// - `x` -> `(1, x)`
fn split_coefficient(term: &Expr) -> (Number, Expr) {
    match term.as_function() {
        Some((Operator::Negate, [inner])) => {
            let (coefficient, rest) = split_coefficient(inner);
            (-coefficient, rest)
        },
        Some((Operator::Multiply, [first, rest @ ..])) => match first.as_rational() {
            Some(coefficient) => (Number::from_rational(coefficient.clone()), multiply(rest.to_vec())),
            None => (Number::one(), term.clone()),
        },
        _ => (Number::one(), term.clone()),
    }
}

/// `a*x + b*x = (a + b)*x`
///
/// Returns [`None`] if no two terms are alike.
fn combine_like_terms(terms: &[Expr]) -> Option<Expr> {
    let mut split = terms.iter().map(split_coefficient).collect::<Vec<_>>();
    let mut combined = Vec::with_capacity(split.len());
    let mut changed = false;

    while let Some((mut coefficient, rest)) = split.pop() {
        let mut i = 0;
        while i < split.len() {
            if split[i].1 == rest {
                let (other, _) = split.swap_remove(i);
                coefficient = &coefficient + &other;
                changed = true;
            } else {
                i += 1;
            }
        }
        combined.push(multiply(vec![Expr::number(coefficient), rest]));
    }

    changed.then(|| add(combined))
}

pub(super) fn rules() -> Vec<UnbuiltRule> {
    vec![UnbuiltRule::evaluate(
        f(Operator::Add, vec![w("__terms")]),
        "combine-like-terms",
        |expr, _| combine_like_terms(expr.operands()),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn combine(terms: Vec<Expr>) -> Option<Expr> {
        combine_like_terms(Expr::function(Operator::Add, terms).operands())
    }

    #[test]
    fn like_terms() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        assert_eq!(combine(vec![x.clone(), x.clone()]), Some(Expr::function(Operator::Multiply, vec![Expr::integer(2), x.clone()])));

        let two_x = Expr::function(Operator::Multiply, vec![Expr::integer(2), x.clone()]);
        let neg_x = Expr::function(Operator::Negate, vec![x.clone()]);
        assert_eq!(combine(vec![two_x.clone(), neg_x.clone()]), Some(x.clone()));
        assert_eq!(combine(vec![x.clone(), neg_x, y.clone()]), Some(y.clone()));

        let xy = Expr::function(Operator::Multiply, vec![x.clone(), y.clone()]);
        let three_xy = Expr::function(Operator::Multiply, vec![Expr::integer(3), x.clone(), y.clone()]);
        assert_eq!(
            combine(vec![xy, three_xy]),
            Some(Expr::function(Operator::Multiply, vec![Expr::integer(4), x, y])),
        );
    }

    #[test]
    fn unlike_terms() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        assert_eq!(combine(vec![x.clone(), y]), None);

        let square = Expr::function(Operator::Power, vec![x.clone(), Expr::integer(2)]);
        assert_eq!(combine(vec![x, square, Expr::integer(1)]), None);
    }
}
