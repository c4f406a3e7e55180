//! The expression tree.
//!
//! An [`Expr`] is a reference-counted, immutable node. Cloning is cheap, and nodes can be shared
//! between threads and between expressions. There is no way to mutate a node in place; every
//! transformation builds new nodes, reusing unchanged sub-trees.
//!
//! # Canonical and raw expressions
//!
//! Each node records whether it is _canonical_, that is, whether it was produced by a canonical
//! builder (see [`crate::canonical`]). Leaves (numbers, symbols, and strings) are always
//! canonical. Function applications built with [`Expr::function`] are canonical, while those
//! built with [`Expr::raw`] are kept as written. The flag is what lets [`crate::canonical::canonical`]
//! skip sub-trees that are already in canonical form.
//!
//! # Strict equality
//!
//! The [`PartialEq`] implementation (also available as [`Expr::is_same`]) is structural: same
//! kind, same literal values, and pairwise equal operands in the same order. Metadata and the
//! canonical flag are ignored.

mod display;
mod iter;
mod operator;
mod order;

use crate::canonical;
use crate::numeric::Number;
use rug::{Integer, Rational};
use std::{ops::{Add, Div, Mul, Neg, Sub}, sync::Arc};

pub use iter::ExprIter;
pub use operator::Operator;

/// Optional annotations attached to a node. Metadata never affects equality or canonical forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// A LaTeX rendering of the node.
    pub latex: Option<String>,

    /// A Wikidata identifier for the concept the node represents.
    pub wikidata: Option<String>,
}

impl Metadata {
    /// Returns true if no annotation is present.
    pub fn is_empty(&self) -> bool {
        self.latex.is_none() && self.wikidata.is_none()
    }
}

/// The kind of an expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A numeric literal.
    Number(Number),

    /// A named symbol, such as `x` or `Pi`. Inside patterns, symbols starting with underscores
    /// are wildcards.
    Symbol(String),

    /// A string literal.
    String(String),

    /// An operator applied to an ordered list of operands.
    Function(Operator, Vec<Expr>),
}

#[derive(Debug)]
struct Node {
    kind: ExprKind,
    canonical: bool,
    metadata: Option<Metadata>,
}

/// A mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Clone)]
pub struct Expr(Arc<Node>);

impl Expr {
    fn new(kind: ExprKind, canonical: bool) -> Self {
        Self(Arc::new(Node { kind, canonical, metadata: None }))
    }

    /// Creates a numeric literal.
    pub fn number(n: impl Into<Number>) -> Self {
        Self::new(ExprKind::Number(n.into()), true)
    }

    /// Creates an exact integer literal.
    pub fn integer(n: impl Into<Integer>) -> Self {
        Self::number(Number::integer(n))
    }

    /// Creates an exact rational literal. A zero denominator produces `NaN` or
    /// `ComplexInfinity`.
    pub fn rational(numer: i64, denom: i64) -> Self {
        Self::number(Number::rational(numer, denom))
    }

    /// Creates a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Symbol(name.into()), true)
    }

    /// Creates a string literal.
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ExprKind::String(text.into()), true)
    }

    /// Applies an operator to a list of operands, and puts the result in canonical form.
    ///
    /// The result is not necessarily an application of `op`: `Add(x, 0)` is simply `x`, and
    /// `Divide(x, y)` becomes `Multiply(x, Power(y, -1))`.
    pub fn function(op: Operator, operands: Vec<Expr>) -> Self {
        canonical::apply(op, operands)
    }

    /// Applies an operator to a list of operands, keeping the application exactly as written.
    pub fn raw(op: Operator, operands: Vec<Expr>) -> Self {
        Self::new(ExprKind::Function(op, operands), false)
    }

    /// Wraps an application that a canonical builder has already put in canonical form.
    pub(crate) fn canonical_function(op: Operator, operands: Vec<Expr>) -> Self {
        Self::new(ExprKind::Function(op, operands), true)
    }

    /// Creates an `Error('code', culprit)` node.
    pub fn error(code: &str, culprit: Option<Expr>) -> Self {
        let mut operands = vec![Self::string(code)];
        operands.extend(culprit);
        Self::canonical_function(Operator::Error, operands)
    }

    /// Returns a copy of this node with the given metadata attached.
    pub fn with_metadata(&self, metadata: Metadata) -> Self {
        Self(Arc::new(Node {
            kind: self.0.kind.clone(),
            canonical: self.0.canonical,
            metadata: (!metadata.is_empty()).then_some(metadata),
        }))
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.0.metadata.as_ref()
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Returns true if this node is in canonical form.
    pub fn is_canonical(&self) -> bool {
        self.0.canonical
    }

    /// Checks if two expressions are **structurally** equal.
    ///
    /// For more information about structural equality, see the [module-level
    /// documentation](self).
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.kind == other.0.kind
    }

    /// If the expression is a numeric literal, returns a reference to it.
    pub fn as_number(&self) -> Option<&Number> {
        match self.kind() {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the expression is an exact integer literal, returns a reference to it.
    pub fn as_integer(&self) -> Option<&Integer> {
        self.as_number()?.as_integer()
    }

    /// If the expression is an exact rational literal, returns a reference to it.
    pub fn as_rational(&self) -> Option<&Rational> {
        self.as_number()?.as_rational()
    }

    /// If the expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// If the expression is a string literal, returns its text.
    pub fn as_string(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::String(text) => Some(text),
            _ => None,
        }
    }

    /// If the expression is a function application, returns its operator and operands.
    pub fn as_function(&self) -> Option<(&Operator, &[Expr])> {
        match self.kind() {
            ExprKind::Function(op, operands) => Some((op, operands)),
            _ => None,
        }
    }

    /// Returns the operator of a function application.
    pub fn operator(&self) -> Option<&Operator> {
        self.as_function().map(|(op, _)| op)
    }

    /// Returns the operands of a function application, or an empty slice for leaves.
    pub fn operands(&self) -> &[Expr] {
        match self.kind() {
            ExprKind::Function(_, operands) => operands,
            _ => &[],
        }
    }

    /// Returns true if the expression is an application of the given operator.
    pub fn is_application_of(&self, op: &Operator) -> bool {
        self.operator() == Some(op)
    }

    /// Returns true if the expression is a numeric literal.
    pub fn is_number(&self) -> bool {
        matches!(self.kind(), ExprKind::Number(_))
    }

    /// Returns true if the expression is a numeric, symbol or string literal.
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind(), ExprKind::Function(..))
    }

    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    /// Returns true if the expression is the symbol with the given name.
    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns every `Error` node in the tree, innermost first.
    pub fn errors(&self) -> Vec<Expr> {
        self.post_order_iter()
            .filter(|expr| expr.is_application_of(&Operator::Error))
            .cloned()
            .collect()
    }

    /// Returns true if the symbol with the given name occurs anywhere in the tree.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.is_symbol(name))
    }

    /// Replaces every occurrence of the symbol `name` with `value`. Canonical applications are
    /// rebuilt in canonical form.
    pub fn subs(&self, name: &str, value: &Expr) -> Expr {
        match self.kind() {
            ExprKind::Symbol(symbol) if symbol == name => value.clone(),
            ExprKind::Function(op, operands) => {
                let operands = operands.iter().map(|o| o.subs(name, value)).collect();
                if self.is_canonical() {
                    Self::function(op.clone(), operands)
                } else {
                    Self::raw(op.clone(), operands)
                }
            },
            _ => self.clone(),
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind().fmt(f)
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Self::number(n)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

/// Adds two expressions with the canonical [`Operator::Add`] builder.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        canonical::add(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        canonical::subtract(self, rhs)
    }
}

/// Multiplies two expressions with the canonical [`Operator::Multiply`] builder.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        canonical::multiply(vec![self, rhs])
    }
}

impl Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        canonical::divide(self, rhs)
    }
}

impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        canonical::negate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn structural_equality() {
        let x = Expr::symbol("x");
        let lhs = Expr::raw(Operator::Add, vec![x.clone(), Expr::integer(1)]);
        let rhs = Expr::raw(Operator::Add, vec![x.clone(), Expr::integer(1)]);
        let swapped = Expr::raw(Operator::Add, vec![Expr::integer(1), x]);
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, swapped);
    }

    #[test]
    fn metadata_is_ignored() {
        let x = Expr::symbol("x");
        let annotated = x.with_metadata(Metadata {
            latex: Some("x".to_string()),
            wikidata: None,
        });
        assert_eq!(annotated, x);
        assert!(annotated.metadata().is_some());
        assert!(x.metadata().is_none());
    }

    #[test]
    fn collect_errors() {
        let bad = Expr::function(Operator::Sin, vec![]);
        let expr = Expr::function(Operator::Add, vec![Expr::symbol("x"), bad]);
        let errors = expr.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].operands()[0], Expr::string("missing"));
    }

    #[test]
    fn substitute_symbol() {
        let x = Expr::symbol("x");
        let expr = Expr::function(Operator::Add, vec![x.clone(), Expr::integer(1)]);
        assert_eq!(expr.subs("x", &Expr::integer(2)), Expr::integer(3));
        assert!(expr.has_symbol("x"));
        assert!(!expr.has_symbol("y"));
    }

    #[test]
    fn operators() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        assert_eq!(
            x.clone() - x.clone(),
            Expr::function(Operator::Add, vec![
                x.clone(),
                Expr::function(Operator::Negate, vec![x.clone()]),
            ]),
        );
        assert_eq!(-(-y.clone()), y);
        assert_eq!(Expr::integer(6) / Expr::integer(4), Expr::rational(3, 2));
    }
}
