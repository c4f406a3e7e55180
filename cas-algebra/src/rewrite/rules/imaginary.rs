//! Powers of the imaginary unit.

use super::{f, w};
use crate::canonical::negate;
use crate::consts::{symbols::IMAGINARY_UNIT, I, NEG_ONE, ONE};
use crate::expr::{Expr, Operator};
use crate::pattern::Substitution;
use crate::rewrite::UnbuiltRule;

// i^..
// 0 1 2  3
// 1 i -1 -i
//
// 4 5 6  7
// 1 i -1 -i

/// Returns the exponent of `i^n` modulo 4, if it is an integer.
fn residue(sub: &Substitution) -> Option<u32> {
    Some(sub.get_single("_n")?.as_integer()?.mod_u(4))
}

fn i_pow(id: &str, n: u32, value: fn() -> Expr) -> UnbuiltRule {
    let lhs = f(Operator::Power, vec![Expr::symbol(IMAGINARY_UNIT), w("_n")]);
    UnbuiltRule::evaluate(lhs, id, move |_, sub| (residue(sub)? == n).then(value))
}

pub(super) fn rules() -> Vec<UnbuiltRule> {
    vec![
        // `i^(4n) = 1`
        i_pow("i-pow-0", 0, || ONE.clone()),
        // `i^(4n+1) = i`
        i_pow("i-pow-1", 1, || I.clone()),
        // `i^(4n+2) = -1`
        i_pow("i-pow-2", 2, || NEG_ONE.clone()),
        // `i^(4n+3) = -i`
        i_pow("i-pow-3", 3, || negate(I.clone())),
    ]
}
