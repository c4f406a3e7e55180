//! Canonical forms.
//!
//! Every operator known to the library has a _canonical builder_: a pure function that takes
//! canonical operands and returns a canonical expression. Builders flatten nested sums and
//! products, fold numeric literals, sort the operands of commutative operators, and remove
//! trivial operations. Applying a builder to its own output returns the same expression.
//!
//! [`apply`] is the single entry point: it canonicalizes the operands, splices
//! [`Operator::Sequence`] operands into the operand list, checks the arity of the operator, and
//! dispatches to the builder. An application with the wrong number of operands becomes an
//! `Error('missing', ...)` or `Error('unexpected-argument', ...)` node instead.
//!
//! The public builder functions ([`add`], [`multiply`], [`divide`], ...) accept operands in any
//! form and are shorthands for [`apply`].

mod add;
mod multiply;
mod negate;
mod power;
mod sum;

pub use add::{add, subtract};
pub use multiply::multiply;
pub use negate::negate;
pub use power::{divide, power, root, sqrt};
pub use sum::{product, sum};

use crate::consts::NOTHING;
use crate::expr::{Expr, Operator};
use crate::numeric::Number;

/// Returns the canonical form of an expression. Canonical sub-trees are reused as-is.
pub fn canonical(expr: &Expr) -> Expr {
    if expr.is_canonical() {
        return expr.clone();
    }

    let Some((op, operands)) = expr.as_function() else {
        return expr.clone();
    };

    let result = apply(op.clone(), operands.to_vec());
    match expr.metadata() {
        Some(metadata) => result.with_metadata(metadata.clone()),
        None => result,
    }
}

/// Applies an operator to a list of operands in canonical form.
pub fn apply(op: Operator, operands: Vec<Expr>) -> Expr {
    // errors keep their culprit exactly as written
    if op == Operator::Error {
        return Expr::canonical_function(op, operands);
    }

    let mut spliced = Vec::with_capacity(operands.len());
    for operand in &operands {
        splice_into(&mut spliced, operand);
    }

    if let Err(error) = check_arity(&op, &spliced) {
        return error;
    }

    build(op, spliced)
}

/// Canonicalizes the operand and pushes it, splicing the items of sequences.
fn splice_into(out: &mut Vec<Expr>, operand: &Expr) {
    match operand.as_function() {
        Some((Operator::Sequence, items)) => {
            for item in items {
                splice_into(out, item);
            }
        },
        _ => {
            let operand = canonical(operand);
            if operand.is_application_of(&Operator::Sequence) {
                splice_into(out, &operand);
            } else {
                out.push(operand);
            }
        },
    }
}

fn check_arity(op: &Operator, operands: &[Expr]) -> Result<(), Expr> {
    let (min, max) = op.arity();
    let culprit = || Some(Expr::raw(op.clone(), operands.to_vec()));
    if operands.len() < min {
        Err(Expr::error("missing", culprit()))
    } else if max.is_some_and(|max| operands.len() > max) {
        Err(Expr::error("unexpected-argument", culprit()))
    } else {
        Ok(())
    }
}

/// Dispatches to the builder of the operator. The arity has already been checked.
fn build(op: Operator, operands: Vec<Expr>) -> Expr {
    match (&op, operands.as_slice()) {
        (Operator::Add, _) => add::fold(operands.clone()),
        (Operator::Subtract, [operand]) => negate::negate_canonical(operand.clone()),
        (Operator::Subtract, [lhs, rhs]) => {
            add::fold(vec![lhs.clone(), negate::negate_canonical(rhs.clone())])
        },
        (Operator::Multiply, _) => multiply::fold(operands.clone()),
        (Operator::Divide, [num, den]) => power::divide_canonical(num.clone(), den.clone()),
        (Operator::Negate, [operand]) => negate::negate_canonical(operand.clone()),
        (Operator::Power, [base, exp]) => power::power_canonical(base.clone(), exp.clone()),
        (Operator::Sqrt, [operand]) => power::sqrt_canonical(operand.clone()),
        (Operator::Root, [operand, degree]) => power::root_canonical(operand.clone(), degree.clone()),
        (Operator::Rational, [numer, denom]) => rational(numer, denom),
        (Operator::Sum | Operator::Product, [body, limits]) => {
            sum::fold(op.clone(), body.clone(), limits.clone())
        },
        (Operator::Limits, [index, _, _]) if index.as_symbol().is_none() => {
            Expr::error("invalid-index", Some(Expr::raw(op.clone(), operands.clone())))
        },
        (op, [lhs, rhs]) if op.is_relational() => relation(op, lhs.clone(), rhs.clone()),
        (Operator::Dictionary, entries) => dictionary(entries),
        (Operator::KeyValuePair, [key, _]) if key.as_string().is_none() => {
            Expr::error("expected-string-key", Some(Expr::raw(op.clone(), operands.clone())))
        },
        (Operator::Sequence, items) => sequence(items),
        _ => Expr::canonical_function(op.clone(), operands.clone()),
    }
}

/// `Rational(p, q)` of two integer literals is the exact fraction `p/q`.
fn rational(numer: &Expr, denom: &Expr) -> Expr {
    match (numer.as_integer(), denom.as_integer()) {
        (Some(numer), Some(denom)) => Expr::number(Number::rational(numer.clone(), denom.clone())),
        _ => Expr::error(
            "incompatible-type",
            Some(Expr::raw(Operator::Rational, vec![numer.clone(), denom.clone()])),
        ),
    }
}

/// Relations are kept as written, except that `Greater` and `GreaterEqual` are flipped into
/// `Less` and `LessEqual`.
fn relation(op: &Operator, lhs: Expr, rhs: Expr) -> Expr {
    match op {
        Operator::Greater => Expr::canonical_function(Operator::Less, vec![rhs, lhs]),
        Operator::GreaterEqual => Expr::canonical_function(Operator::LessEqual, vec![rhs, lhs]),
        op => Expr::canonical_function(op.clone(), vec![lhs, rhs]),
    }
}

/// Dictionaries hold key-value pairs with unique keys. A repeated key keeps its first position
/// and its last value.
fn dictionary(entries: &[Expr]) -> Expr {
    let mut unique: Vec<Expr> = Vec::with_capacity(entries.len());
    for entry in entries {
        let key = match entry.as_function() {
            Some((Operator::KeyValuePair, [key, _])) => key,
            _ => return Expr::error("expected-key-value", Some(entry.clone())),
        };

        match unique.iter_mut().find(|existing| existing.operands()[0] == *key) {
            Some(existing) => *existing = entry.clone(),
            None => unique.push(entry.clone()),
        }
    }
    Expr::canonical_function(Operator::Dictionary, unique)
}

/// A sequence of one item is the item itself, and an empty sequence is the symbol `Nothing`.
fn sequence(items: &[Expr]) -> Expr {
    match items {
        [] => NOTHING.clone(),
        [item] => item.clone(),
        items => Expr::canonical_function(Operator::Sequence, items.to_vec()),
    }
}

/// Splices the operands of nested applications of an associative operator.
pub(crate) fn flatten(op: &Operator, operands: Vec<Expr>) -> Vec<Expr> {
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        if operand.is_application_of(op) {
            flat.extend(flatten(op, operand.operands().to_vec()));
        } else {
            flat.push(operand);
        }
    }
    flat
}
