//! Exact values of the trigonometric functions at rational multiples of π.

use super::{f, w};
use crate::consts::symbols::PI;
use crate::expr::{Expr, Operator};
use crate::numeric::Number;
use crate::primitive::{int, rational};
use crate::rewrite::UnbuiltRule;
use once_cell::sync::Lazy;
use rug::Rational;
use std::collections::HashMap;

/// The sine of angles in `[0, 1)` turns, for multiples of 1/12 and 1/8 of a turn.
static SIN_TABLE: Lazy<HashMap<Rational, Number>> = Lazy::new(|| {
    let half = Number::rational(1, 2);
    let sqrt_two_half = Number::radical(rational(1, 2), int(2));
    let sqrt_three_half = Number::radical(rational(1, 2), int(3));
    let one = Number::one();

    HashMap::from([
        (rational(0, 1), Number::zero()),
        // pi/6 rad = 30 deg
        (rational(1, 12), half.clone()),
        (rational(1, 8), sqrt_two_half.clone()),
        (rational(1, 6), sqrt_three_half.clone()),
        (rational(1, 4), one.clone()),
        (rational(1, 3), sqrt_three_half.clone()),
        (rational(3, 8), sqrt_two_half.clone()),
        (rational(5, 12), half.clone()),
        (rational(1, 2), Number::zero()),
        (rational(7, 12), -&half),
        (rational(5, 8), -&sqrt_two_half),
        (rational(2, 3), -&sqrt_three_half),
        (rational(3, 4), -&one),
        (rational(5, 6), -&sqrt_three_half),
        (rational(7, 8), -&sqrt_two_half),
        (rational(11, 12), -&half),
    ])
});

/// Returns the angle as a fraction of a full turn, if it is a rational multiple of π.
fn turns(angle: &Expr) -> Option<Rational> {
    if angle.is_zero() {
        return Some(Rational::new());
    }
    if angle.is_symbol(PI) {
        return Some(rational(1, 2));
    }

    match angle.as_function()? {
        (Operator::Negate, [inner]) if inner.is_symbol(PI) => Some(rational(-1, 2)),
        (Operator::Multiply, [coefficient, pi]) if pi.is_symbol(PI) => {
            Some(coefficient.as_rational()?.clone() / 2)
        },
        _ => None,
    }
}

/// Reduces an angle in turns into `[0, 1)`.
fn normalize(turns: Rational) -> Rational {
    let whole = turns.clone().floor();
    turns - whole
}

fn sin(turns: Rational) -> Option<Number> {
    SIN_TABLE.get(&normalize(turns)).cloned()
}

/// `cos(x) = sin(x + pi/2)`
fn cos(turns: Rational) -> Option<Number> {
    sin(turns + rational(1, 4))
}

fn tan(turns: Rational) -> Option<Number> {
    let cos = cos(turns.clone())?;
    if cos.is_zero() {
        return Some(Number::ComplexInfinity);
    }
    Some(&sin(turns)? / &cos)
}

fn exact_value(op: Operator, id: &str, value: fn(Rational) -> Option<Number>) -> UnbuiltRule {
    UnbuiltRule::evaluate(f(op, vec![w("_x")]), id, move |_, sub| {
        value(turns(sub.get_single("_x")?)?).map(Expr::number)
    })
}

pub(super) fn rules() -> Vec<UnbuiltRule> {
    vec![
        exact_value(Operator::Sin, "sin-exact", sin),
        exact_value(Operator::Cos, "cos-exact", cos),
        exact_value(Operator::Tan, "tan-exact", tan),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{COMPLEX_INFINITY, PI as PI_EXPR};
    use crate::pattern::PatternMatchOptions;
    use crate::rewrite::RuleSet;
    use pretty_assertions::assert_eq;

    fn eval(op: Operator, angle: Expr) -> Option<Expr> {
        let rules = RuleSet::compile(rules()).unwrap();
        let expr = Expr::function(op, vec![angle]);
        rules.iter().find_map(|rule| rule.apply(&expr, &PatternMatchOptions::default(), true))
    }

    fn pi_times(numer: i64, denom: i64) -> Expr {
        Expr::function(Operator::Multiply, vec![Expr::rational(numer, denom), PI_EXPR.clone()])
    }

    #[test]
    fn table_values() {
        assert_eq!(eval(Operator::Sin, pi_times(1, 6)), Some(Expr::rational(1, 2)));
        assert_eq!(eval(Operator::Sin, Expr::integer(0)), Some(Expr::integer(0)));
        assert_eq!(eval(Operator::Cos, PI_EXPR.clone()), Some(Expr::integer(-1)));
        assert_eq!(eval(Operator::Cos, pi_times(2, 3)), Some(Expr::rational(-1, 2)));
        assert_eq!(
            eval(Operator::Sin, pi_times(1, 4)),
            Some(Expr::number(Number::radical(rational(1, 2), int(2)))),
        );
    }

    #[test]
    fn quadrant_reduction() {
        assert_eq!(eval(Operator::Sin, pi_times(-1, 2)), Some(Expr::integer(-1)));
        assert_eq!(eval(Operator::Sin, pi_times(13, 6)), Some(Expr::rational(1, 2)));
        assert_eq!(
            eval(Operator::Cos, Expr::function(Operator::Negate, vec![PI_EXPR.clone()])),
            Some(Expr::integer(-1)),
        );
    }

    #[test]
    fn tangent() {
        assert_eq!(eval(Operator::Tan, pi_times(1, 4)), Some(Expr::integer(1)));
        assert_eq!(eval(Operator::Tan, pi_times(1, 2)), Some(COMPLEX_INFINITY.clone()));
        assert_eq!(eval(Operator::Tan, pi_times(3, 4)), Some(Expr::integer(-1)));
    }

    #[test]
    fn no_exact_value() {
        assert_eq!(eval(Operator::Sin, pi_times(1, 5)), None);
        assert_eq!(eval(Operator::Sin, Expr::symbol("x")), None);
        assert_eq!(eval(Operator::Cos, Expr::integer(1)), None);
    }
}
