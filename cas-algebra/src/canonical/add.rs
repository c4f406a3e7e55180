//! Canonical form of sums.

use super::{apply, flatten};
use crate::consts::{symbols::IMAGINARY_UNIT, NAN, ZERO};
use crate::expr::{Expr, ExprKind, Operator};
use crate::numeric::Number;
use crate::primitive::complex;

/// Returns the canonical sum of the given terms.
pub fn add(terms: Vec<Expr>) -> Expr {
    apply(Operator::Add, terms)
}

/// Returns the canonical form of `lhs - rhs`, which is `lhs + (-rhs)`.
pub fn subtract(lhs: Expr, rhs: Expr) -> Expr {
    apply(Operator::Subtract, vec![lhs, rhs])
}

/// Builds the canonical sum of canonical terms.
///
/// - `a + (b + c) = a + b + c`
/// - `1 + 2√3 + 1/2 + √3 = 3/2 + 3√3`
/// - `a + 0 = a`
/// - `1 + 2*ImaginaryUnit = (1 + 2i)`
pub(super) fn fold(terms: Vec<Expr>) -> Expr {
    let mut literals = Vec::new();
    let mut rest = Vec::new();
    for term in flatten(&Operator::Add, terms) {
        match term.kind() {
            ExprKind::Number(n) => literals.push(n.clone()),
            _ => rest.push(term),
        }
    }

    let literals = fold_literals(literals);
    if literals.iter().any(Number::is_nan) {
        return NAN.clone();
    }

    let mut operands = literals.into_iter().map(Expr::number).collect::<Vec<_>>();
    operands.extend(rest);

    if let Some(value) = complex_literal(&operands) {
        return Expr::number(value);
    }

    operands.sort_by(Expr::canonical_order);
    if operands.len() <= 1 {
        return operands.pop().unwrap_or_else(|| ZERO.clone());
    }
    Expr::canonical_function(Operator::Add, operands)
}

/// Folds numeric literals into as few literals as possible, dropping zeros.
///
/// If any literal is inexact (or special), everything is folded into a single inexact literal.
/// Otherwise, exact literals are grouped by radical, and each group is summed exactly.
fn fold_literals(literals: Vec<Number>) -> Vec<Number> {
    if literals.iter().any(|n| !n.is_exact()) {
        let total = literals.iter().fold(Number::zero(), |acc, n| &acc + n);
        return if total.is_zero() { Vec::new() } else { vec![total] };
    }

    let mut groups: Vec<Number> = Vec::new();
    for n in literals {
        let slot = groups.iter_mut().find(|group| group.checked_add(&n).is_some());
        match slot {
            Some(group) => *group = &*group + &n,
            None => groups.push(n),
        }
    }

    groups.retain(|n| !n.is_zero());
    groups
}

/// Returns the coefficient `b` if the expression is `b * ImaginaryUnit` for a real literal `b`.
fn imaginary_coefficient(expr: &Expr) -> Option<Number> {
    match expr.kind() {
        ExprKind::Symbol(name) if name == IMAGINARY_UNIT => Some(Number::one()),
        ExprKind::Function(Operator::Negate, operands) => match operands {
            [i] if i.is_symbol(IMAGINARY_UNIT) => Some(Number::integer(-1)),
            _ => None,
        },
        ExprKind::Function(Operator::Multiply, factors) => match factors {
            [b, i] if i.is_symbol(IMAGINARY_UNIT) => {
                b.as_number().filter(|b| b.is_finite() && b.signum().is_some()).cloned()
            },
            _ => None,
        },
        _ => None,
    }
}

/// Promotes the sum `a + b*ImaginaryUnit` of real literals `a` and `b` to a complex literal.
fn complex_literal(operands: &[Expr]) -> Option<Number> {
    let [real, imaginary] = operands else {
        return None;
    };

    let real = real.as_number().filter(|n| n.is_finite() && n.signum().is_some())?;
    let imaginary = imaginary_coefficient(imaginary)?;
    Some(Number::complex(complex((real.to_float()?, imaginary.to_float()?))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{float, rational, int};
    use crate::consts::I;
    use pretty_assertions::assert_eq;

    #[test]
    fn fold_exact_literals() {
        let x = Expr::symbol("x");
        let sqrt3 = Expr::number(Number::radical(rational(1, 1), int(3)));
        let expr = add(vec![
            Expr::integer(1),
            x.clone(),
            Expr::number(Number::radical(rational(2, 1), int(3))),
            Expr::rational(1, 2),
            sqrt3,
        ]);
        assert_eq!(expr, Expr::raw(Operator::Add, vec![
            Expr::rational(3, 2),
            Expr::number(Number::radical(rational(3, 1), int(3))),
            x,
        ]));
    }

    #[test]
    fn inexact_absorbs_exact() {
        let expr = add(vec![Expr::integer(1), Expr::number(float(0.5)), Expr::symbol("x")]);
        assert_eq!(expr, Expr::raw(Operator::Add, vec![Expr::number(float(1.5)), Expr::symbol("x")]));
    }

    #[test]
    fn cancel_to_zero() {
        assert_eq!(add(vec![Expr::integer(1), Expr::function(Operator::Negate, vec![Expr::integer(1)])]), ZERO.clone());
        assert_eq!(add(vec![]), ZERO.clone());
        assert_eq!(add(vec![Expr::symbol("x"), Expr::integer(0)]), Expr::symbol("x"));
    }

    #[test]
    fn nan_absorbs() {
        let expr = add(vec![Expr::symbol("x"), Expr::number(Number::NaN)]);
        assert_eq!(expr, NAN.clone());
        let opposite = add(vec![
            Expr::number(Number::PositiveInfinity),
            Expr::number(Number::NegativeInfinity),
        ]);
        assert_eq!(opposite, NAN.clone());
    }

    #[test]
    fn complex_promotion() {
        let expr = add(vec![
            Expr::integer(1),
            Expr::function(Operator::Multiply, vec![Expr::integer(2), I.clone()]),
        ]);
        assert_eq!(expr, Expr::number(Number::complex(complex((1, 2)))));
    }

    #[test]
    fn subtraction() {
        let x = Expr::symbol("x");
        assert_eq!(subtract(Expr::integer(5), Expr::integer(7)), Expr::integer(-2));
        assert_eq!(subtract(x.clone(), x.clone()).to_string(), "x - x");
    }
}
