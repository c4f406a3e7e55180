//! The default cost function used to compare candidate rewrites.

use crate::expr::{Expr, ExprKind, Operator};
use crate::numeric::Number;
use std::sync::Arc;

/// A function ranking the complexity of an expression. Lower is simpler.
pub type CostFunction = Arc<dyn Fn(&Expr) -> f64 + Send + Sync>;

/// The default cost heuristic.
///
/// The cost of an expression is the sum of the costs of its nodes:
///
/// - `cost(integer) = 1`, or 2 for integers beyond `i64`
/// - `cost(rational) = 2`, plus 2 for a radical
/// - `cost(inexact) = 2`, `cost(complex) = 3`, `cost(special value) = 1`
/// - `cost(symbol) = cost(string) = 1`
/// - `cost(negate) = 1`, and 2 for arithmetic operators (`add`, `multiply`, `power`, ...)
/// - `cost(sin) = cost(exp) = 4`, and similarly for other transcendental functions
/// - `cost(error) = 100`
/// - any other application costs 2
pub fn default_cost(expr: &Expr) -> f64 {
    let mut cost = 0.0;
    let mut stack = vec![expr];
    while let Some(expr) = stack.pop() {
        cost += match expr.kind() {
            ExprKind::Number(n) => number_cost(n),
            ExprKind::Symbol(_) | ExprKind::String(_) => 1.0,
            ExprKind::Function(op, operands) => {
                stack.extend(operands.iter());
                operator_cost(op)
            },
        };
    }
    cost
}

fn number_cost(n: &Number) -> f64 {
    match n {
        Number::Exact(e) => {
            let r = e.rational();
            let rational = if *r.denom() == 1 && r.numer().to_i64().is_some() { 1.0 } else { 2.0 };
            if e.is_rational() { rational } else { rational + 2.0 }
        },
        Number::Real(_) => 2.0,
        Number::Complex(_) => 3.0,
        _ => 1.0,
    }
}

fn operator_cost(op: &Operator) -> f64 {
    match op {
        Operator::Negate => 1.0,
        Operator::Add
            | Operator::Multiply
            | Operator::Subtract
            | Operator::Power
            | Operator::Divide
            | Operator::Sqrt
            | Operator::Root => 2.0,
        Operator::Sin | Operator::Cos | Operator::Tan | Operator::Exp | Operator::Ln => 4.0,
        Operator::Error => 100.0,
        _ => 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{int, rational};
    use pretty_assertions::assert_eq;

    #[test]
    fn simpler_forms_cost_less() {
        let x = Expr::symbol("x");
        let square = Expr::raw(Operator::Power, vec![x.clone(), Expr::integer(2)]);
        let product = Expr::raw(Operator::Multiply, vec![x.clone(), x.clone()]);
        assert_eq!(default_cost(&x), 1.0);
        assert_eq!(default_cost(&square), 4.0);
        assert_eq!(default_cost(&product), 4.0);

        let two_x = Expr::raw(Operator::Multiply, vec![Expr::integer(2), x.clone()]);
        let sum = Expr::raw(Operator::Add, vec![x.clone(), x]);
        assert!(default_cost(&two_x) <= default_cost(&sum));
    }

    #[test]
    fn literal_costs() {
        assert_eq!(default_cost(&Expr::integer(7)), 1.0);
        assert_eq!(default_cost(&Expr::rational(1, 2)), 2.0);
        assert_eq!(default_cost(&Expr::number(Number::radical(rational(2, 1), int(3)))), 3.0);
    }
}
