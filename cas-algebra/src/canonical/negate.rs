//! Canonical negation, which distributes over sums and folds into products.

use super::{add, apply, multiply};
use crate::expr::{Expr, ExprKind, Operator};

/// Returns the canonical form of `-expr`.
pub fn negate(expr: Expr) -> Expr {
    apply(Operator::Negate, vec![expr])
}

/// Builds the canonical negation of a canonical expression.
///
/// The negation is pushed into the expression wherever it can be absorbed: literals change sign,
/// double negations cancel, sums negate every term, and products negate a single factor.
pub(super) fn negate_canonical(expr: Expr) -> Expr {
    match expr.kind() {
        ExprKind::Number(n) => Expr::number(-n),
        ExprKind::Function(Operator::Negate, operands) if operands.len() == 1 => operands[0].clone(),
        ExprKind::Function(Operator::Add, terms) => {
            add::fold(terms.iter().cloned().map(negate_canonical).collect())
        },
        ExprKind::Function(Operator::Multiply, factors) => negate_product(&expr, factors),
        _ => Expr::canonical_function(Operator::Negate, vec![expr]),
    }
}

/// Negates one factor of a product.
///
/// The factor to negate is, in order of preference: a negation (which then cancels), an integer
/// literal, or any other numeric literal. If the product has no such factor, the whole product is
/// wrapped in a negation.
fn negate_product(product: &Expr, factors: &[Expr]) -> Expr {
    let target = factors
        .iter()
        .position(|factor| factor.is_application_of(&Operator::Negate))
        .or_else(|| factors.iter().position(|factor| factor.as_integer().is_some()))
        .or_else(|| factors.iter().position(Expr::is_number));

    let Some(target) = target else {
        return Expr::canonical_function(Operator::Negate, vec![product.clone()]);
    };

    let mut factors = factors.to_vec();
    factors[target] = negate_canonical(factors[target].clone());
    multiply::fold(factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_and_symbols() {
        assert_eq!(negate(Expr::integer(3)), Expr::integer(-3));
        assert_eq!(negate(Expr::rational(-1, 2)), Expr::rational(1, 2));

        let x = Expr::symbol("x");
        let neg_x = negate(x.clone());
        assert_eq!(neg_x, Expr::raw(Operator::Negate, vec![x.clone()]));
        assert_eq!(negate(neg_x), x);
    }

    #[test]
    fn distributes_over_sums() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let expr = negate(Expr::function(Operator::Add, vec![x.clone(), y.clone(), Expr::integer(1)]));
        assert_eq!(expr.to_string(), "-1 - x - y");
    }

    #[test]
    fn negates_one_factor() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let product = Expr::function(Operator::Multiply, vec![Expr::integer(2), x.clone(), y.clone()]);
        assert_eq!(
            negate(product),
            Expr::raw(Operator::Multiply, vec![Expr::integer(-2), x.clone(), y.clone()]),
        );

        let plain = Expr::function(Operator::Multiply, vec![x.clone(), y.clone()]);
        assert_eq!(negate(plain.clone()), Expr::raw(Operator::Negate, vec![plain.clone()]));
        assert_eq!(negate(negate(plain.clone())), plain);
    }
}
