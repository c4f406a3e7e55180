//! Distribution of coefficients over sums, and of integer powers over products.

use super::{f, w};
use crate::canonical::{add, multiply, power};
use crate::expr::{Expr, Operator};
use crate::rewrite::UnbuiltRule;

/// `c * (a + b) = c*a + c*b`, for a numeric literal `c`.
fn distribute_coefficient(factors: &[Expr]) -> Option<Expr> {
    let [coefficient, sum] = factors else {
        return None;
    };
    if !coefficient.is_number() {
        return None;
    }

    let (Operator::Add, terms) = sum.as_function()? else {
        return None;
    };
    Some(add(
        terms
            .iter()
            .map(|term| multiply(vec![coefficient.clone(), term.clone()]))
            .collect(),
    ))
}

/// `(a * b)^n = a^n * b^n`, for an integer `n`.
fn distribute_power(expr: &Expr) -> Option<Expr> {
    let (_, [base, exp]) = expr.as_function()? else {
        return None;
    };
    exp.as_integer()?;

    Some(multiply(
        base.operands()
            .iter()
            .map(|factor| power(factor.clone(), exp.clone()))
            .collect(),
    ))
}

pub(super) fn rules() -> Vec<UnbuiltRule> {
    vec![
        UnbuiltRule::evaluate(
            f(Operator::Multiply, vec![w("__factors")]),
            "distribute-coefficient",
            |expr, _| distribute_coefficient(expr.operands()),
        ),
        UnbuiltRule::evaluate(
            f(Operator::Power, vec![f(Operator::Multiply, vec![w("__factors")]), w("_n")]),
            "distribute-power",
            |expr, _| distribute_power(expr),
        ),
    ]
}
