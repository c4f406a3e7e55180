use super::{Expr, ExprKind};
use std::cmp::Ordering;

impl Expr {
    /// The total order used to sort the operands of commutative operators.
    ///
    /// Numeric literals come first (by value), then symbols and strings (by name), then function
    /// applications, ordered by size, operator name, arity, and finally operand by operand.
    pub fn canonical_order(&self, other: &Self) -> Ordering {
        fn rank(expr: &Expr) -> u8 {
            match expr.kind() {
                ExprKind::Number(_) => 0,
                ExprKind::Symbol(_) => 1,
                ExprKind::String(_) => 2,
                ExprKind::Function(..) => 3,
            }
        }

        match (self.kind(), other.kind()) {
            (ExprKind::Number(lhs), ExprKind::Number(rhs)) => lhs.total_cmp(rhs),
            (ExprKind::Symbol(lhs), ExprKind::Symbol(rhs))
                | (ExprKind::String(lhs), ExprKind::String(rhs)) => lhs.cmp(rhs),
            (ExprKind::Function(lhs_op, lhs), ExprKind::Function(rhs_op, rhs)) => self
                .node_count()
                .cmp(&other.node_count())
                .then_with(|| lhs_op.name().cmp(rhs_op.name()))
                .then_with(|| lhs.len().cmp(&rhs.len()))
                .then_with(|| {
                    lhs.iter()
                        .zip(rhs)
                        .map(|(lhs, rhs)| lhs.canonical_order(rhs))
                        .find(|ord| ord.is_ne())
                        .unwrap_or(Ordering::Equal)
                }),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}
