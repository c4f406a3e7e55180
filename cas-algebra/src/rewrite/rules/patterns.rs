//! Identities written as plain patterns.

use super::{f, w};
use crate::consts::symbols::EXPONENTIAL_E;
use crate::expr::{Expr, Operator};
use crate::rewrite::UnbuiltRule;

fn rule(id: &str, lhs: Expr, rhs: Expr) -> UnbuiltRule {
    UnbuiltRule::new(lhs, rhs).id(id)
}

fn ln(x: Expr) -> Expr {
    f(Operator::Ln, vec![x])
}

fn exp(x: Expr) -> Expr {
    f(Operator::Exp, vec![x])
}

fn neg(x: Expr) -> Expr {
    f(Operator::Negate, vec![x])
}

fn abs(x: Expr) -> Expr {
    f(Operator::Abs, vec![x])
}

fn squared(x: Expr) -> Expr {
    f(Operator::Power, vec![x, Expr::integer(2)])
}

pub(super) fn rules() -> Vec<UnbuiltRule> {
    let x = || w("_x");
    vec![
        // logarithms and exponentials
        rule("ln-exp", ln(exp(x())), x()),
        rule("exp-ln", exp(ln(x())), x()),
        rule("ln-one", ln(Expr::integer(1)), Expr::integer(0)),
        rule("ln-e", ln(Expr::symbol(EXPONENTIAL_E)), Expr::integer(1)),
        rule("exp-zero", exp(Expr::integer(0)), Expr::integer(1)),

        // parity
        rule("sin-odd", f(Operator::Sin, vec![neg(x())]), neg(f(Operator::Sin, vec![x()]))),
        rule("cos-even", f(Operator::Cos, vec![neg(x())]), f(Operator::Cos, vec![x()])),
        rule("tan-odd", f(Operator::Tan, vec![neg(x())]), neg(f(Operator::Tan, vec![x()]))),

        // sin^2 + cos^2 = 1
        rule(
            "pythagorean-identity",
            f(Operator::Add, vec![
                squared(f(Operator::Sin, vec![x()])),
                squared(f(Operator::Cos, vec![x()])),
                w("___rest"),
            ]),
            f(Operator::Add, vec![Expr::integer(1), w("___rest")]),
        ),

        // absolute values
        rule("abs-negate", abs(neg(x())), abs(x())),
        rule("abs-abs", abs(abs(x())), abs(x())),
        rule("sqrt-square", f(Operator::Sqrt, vec![squared(x())]), abs(x())),
        UnbuiltRule::evaluate(abs(x()), "abs-literal", |_, sub| {
            let n = sub.get_single("_x")?.as_number()?;
            Some(Expr::number(n.abs()))
        }),
    ]
}
