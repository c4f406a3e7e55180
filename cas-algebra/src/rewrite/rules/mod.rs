//! The standard rule set.
//!
//! Canonical forms already fold literals and remove trivial operations, so these rules only
//! handle what canonicalization deliberately leaves alone: combining like terms and factors,
//! distribution, and the exact values of elementary functions.

mod distribute;
mod factors;
mod imaginary;
mod patterns;
mod terms;
mod trigonometry;

use super::{RuleSet, UnbuiltRule};
use crate::expr::{Expr, Operator};

/// Builds `op(operands...)` exactly as written, for use in patterns and templates.
fn f(op: Operator, operands: Vec<Expr>) -> Expr {
    Expr::raw(op, operands)
}

/// Builds a wildcard.
fn w(key: &str) -> Expr {
    Expr::symbol(key)
}

/// Returns the standard simplification rules.
///
/// Collecting like terms and factors comes first, then exact evaluation of the imaginary unit,
/// trigonometric and other elementary functions, and distribution last.
pub fn standard() -> RuleSet {
    let rules: Vec<UnbuiltRule> = terms::rules()
        .into_iter()
        .chain(factors::rules())
        .chain(imaginary::rules())
        .chain(trigonometry::rules())
        .chain(patterns::rules())
        .chain(distribute::rules())
        .collect();
    RuleSet::compile(rules).expect("standard rules are well-formed")
}
