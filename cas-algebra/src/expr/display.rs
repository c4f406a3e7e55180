//! Infix rendering of expressions.

use super::{Expr, ExprKind, Operator};
use crate::numeric::Number;
use std::{cmp::Ordering, fmt};

/// Binding strength of a rendered expression, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Relation,
    Sum,
    Product,
    Prefix,
    Power,
    Primary,
}

impl Expr {
    /// Returns the precedence of the expression when rendered.
    pub(crate) fn precedence(&self) -> Precedence {
        match self.kind() {
            ExprKind::Number(n) => match n {
                Number::Exact(e) if e.is_integer() && n.is_negative() => Precedence::Prefix,
                Number::Exact(e) if e.is_integer() => Precedence::Primary,
                // `3/4`, `2√3`
                Number::Exact(_) => Precedence::Product,
                Number::Real(_) | Number::NegativeInfinity if n.is_negative() => Precedence::Prefix,
                _ => Precedence::Primary,
            },
            ExprKind::Symbol(_) | ExprKind::String(_) => Precedence::Primary,
            ExprKind::Function(op, _) => match op {
                Operator::Add | Operator::Subtract => Precedence::Sum,
                Operator::Multiply | Operator::Divide => Precedence::Product,
                Operator::Negate => Precedence::Prefix,
                Operator::Power => Precedence::Power,
                op if op.is_relational() => Precedence::Relation,
                _ => Precedence::Primary,
            },
        }
    }

    /// Compares the rendering precedence of two expressions.
    ///
    /// This is used to determine if parentheses are needed around an operand when printing.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }
}

/// Writes the operand, wrapping it in parentheses if it binds more loosely than `min`.
fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expr, min: Precedence) -> fmt::Result {
    if operand.precedence() < min {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

/// If the term is rendered with a leading minus sign inside a sum, returns the term without it.
fn subtracted(term: &Expr) -> Option<Expr> {
    match term.kind() {
        ExprKind::Number(n) if n.is_negative() => Some(Expr::number(n.abs())),
        ExprKind::Function(Operator::Negate, operands) if operands.len() == 1 => {
            Some(operands[0].clone())
        },
        ExprKind::Function(Operator::Multiply, factors) => {
            let coefficient = factors.first()?.as_number()?;
            if !coefficient.is_negative() {
                return None;
            }

            let mut factors = factors.to_vec();
            factors[0] = Expr::number(coefficient.abs());
            Some(Expr::raw(Operator::Multiply, factors))
        },
        _ => None,
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, operands: &[Expr]) -> fmt::Result {
    write!(f, "{}(", name)?;
    write_list(f, operands)?;
    write!(f, ")")
}

fn write_list(f: &mut fmt::Formatter<'_>, operands: &[Expr]) -> fmt::Result {
    let mut iter = operands.iter();
    if let Some(operand) = iter.next() {
        write!(f, "{}", operand)?;
        for operand in iter {
            write!(f, ", {}", operand)?;
        }
    }
    Ok(())
}

fn relation_symbol(op: &Operator) -> &'static str {
    match op {
        Operator::Equal => "=",
        Operator::NotEqual => "!=",
        Operator::Less => "<",
        Operator::LessEqual => "<=",
        Operator::Greater => ">",
        _ => ">=",
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, operands) = match self.kind() {
            ExprKind::Number(n) => return write!(f, "{}", n),
            ExprKind::Symbol(name) => return write!(f, "{}", name),
            ExprKind::String(text) => return write!(f, "'{}'", text),
            ExprKind::Function(op, operands) => (op, operands.as_slice()),
        };

        match (op, operands) {
            (Operator::Add, [first, rest @ ..]) => {
                write_operand(f, first, Precedence::Sum)?;
                for term in rest {
                    match subtracted(term) {
                        Some(positive) => {
                            write!(f, " - ")?;
                            write_operand(f, &positive, Precedence::Product)?;
                        },
                        None => {
                            write!(f, " + ")?;
                            write_operand(f, term, Precedence::Sum)?;
                        },
                    }
                }
                Ok(())
            },
            (Operator::Multiply, [first, rest @ ..]) => {
                write_operand(f, first, Precedence::Product)?;
                for factor in rest {
                    write!(f, " * ")?;
                    write_operand(f, factor, Precedence::Prefix)?;
                }
                Ok(())
            },
            (Operator::Subtract, [lhs, rhs]) => {
                write_operand(f, lhs, Precedence::Sum)?;
                write!(f, " - ")?;
                write_operand(f, rhs, Precedence::Product)
            },
            (Operator::Divide, [lhs, rhs]) => {
                write_operand(f, lhs, Precedence::Product)?;
                write!(f, " / ")?;
                write_operand(f, rhs, Precedence::Prefix)
            },
            (Operator::Negate, [operand]) => {
                write!(f, "-")?;
                write_operand(f, operand, Precedence::Power)
            },
            (Operator::Power, [base, exp]) => {
                write_operand(f, base, Precedence::Primary)?;
                write!(f, "^")?;
                write_operand(f, exp, Precedence::Primary)
            },
            (op, [lhs, rhs]) if op.is_relational() => {
                write_operand(f, lhs, Precedence::Sum)?;
                write!(f, " {} ", relation_symbol(op))?;
                write_operand(f, rhs, Precedence::Sum)
            },
            (Operator::List, operands) => {
                write!(f, "[")?;
                write_list(f, operands)?;
                write!(f, "]")
            },
            (op, operands) => write_call(f, op.name(), operands),
        }
    }
}
