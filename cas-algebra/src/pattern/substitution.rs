use crate::expr::{Expr, Operator};
use std::collections::BTreeMap;

/// The value bound to a wildcard.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A single expression, bound by a `_name` wildcard.
    Single(Expr),

    /// A run of operands, bound by a `__name` or `___name` wildcard. May be empty.
    Sequence(Vec<Expr>),
}

impl Binding {
    /// Returns the bound expressions. A single binding is a run of length one.
    pub fn as_slice(&self) -> &[Expr] {
        match self {
            Self::Single(expr) => std::slice::from_ref(expr),
            Self::Sequence(exprs) => exprs,
        }
    }

    /// Returns true if both bindings hold the same expressions. `Single(x)` and `Sequence([x])`
    /// are considered the same.
    pub fn is_same(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }

    /// Returns the binding as a single expression. Runs of any length other than one become a
    /// raw `Sequence`.
    pub fn to_expr(&self) -> Expr {
        match self.as_slice() {
            [expr] => expr.clone(),
            exprs => Expr::raw(Operator::Sequence, exprs.to_vec()),
        }
    }
}

impl From<Expr> for Binding {
    fn from(expr: Expr) -> Self {
        Self::Single(expr)
    }
}

impl From<Vec<Expr>> for Binding {
    fn from(exprs: Vec<Expr>) -> Self {
        Self::Sequence(exprs)
    }
}

/// A mapping from wildcard keys (such as `_x` or `___rest`) to the expressions they matched.
///
/// Substitutions are values: binding a wildcard produces a new substitution, leaving the
/// original untouched, so a failed matching attempt never has to be undone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution(BTreeMap<String, Binding>);

impl Substitution {
    /// Creates an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the binding of the wildcard with the given key.
    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.0.get(key)
    }

    /// Returns the expression bound to the wildcard, if it is bound to exactly one expression.
    pub fn get_single(&self, key: &str) -> Option<&Expr> {
        match self.get(key)?.as_slice() {
            [expr] => Some(expr),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the bindings, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.0.iter().map(|(key, binding)| (key.as_str(), binding))
    }

    /// Returns a copy of this substitution with the given binding added, replacing any existing
    /// binding of the same key.
    pub fn with(mut self, key: impl Into<String>, binding: impl Into<Binding>) -> Self {
        self.0.insert(key.into(), binding.into());
        self
    }

    /// Binds the wildcard to a value, returning the extended substitution.
    ///
    /// If the key is already bound, the existing binding must be the same as the new one, and
    /// the substitution is returned unchanged. Otherwise, the binding conflicts and [`None`] is
    /// returned.
    pub(crate) fn bind(&self, key: &str, binding: Binding) -> Option<Self> {
        match self.get(key) {
            Some(existing) if existing.is_same(&binding) => Some(self.clone()),
            Some(_) => None,
            None => Some(self.clone().with(key, binding)),
        }
    }
}

impl<K: Into<String>, B: Into<Binding>> FromIterator<(K, B)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (K, B)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, binding)| (key.into(), binding.into())).collect())
    }
}
