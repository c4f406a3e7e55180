//! Canonical expression trees, pattern matching, and rule-driven simplification.
//!
//! # Expression representation
//!
//! Expressions are immutable trees of [`Expr`] nodes. A node is a numeric literal ([`Number`]),
//! a symbol, a string, or a function application: an [`Operator`] applied to an ordered list of
//! operands. Nodes are reference counted, so cloning an expression is cheap and sub-trees are
//! shared freely between expressions, threads, and the steps of a simplification trace.
//!
//! Every node carries a _canonical_ flag. Expressions built with [`Expr::function`] (or the
//! builders in [`canonical`]) are canonical: nested sums and products are flattened, numeric
//! literals are folded, operands of commutative operators are sorted, and trivial operations
//! such as `x + 0` or `x^1` disappear. Expressions built with [`Expr::raw`] are kept exactly as
//! written, which is what patterns and rule templates need.
//!
//! ```
//! use cas_algebra::{Expr, Operator};
//!
//! let x = Expr::symbol("x");
//! let expr = Expr::function(Operator::Add, vec![x.clone(), Expr::integer(0), Expr::integer(2)]);
//! assert_eq!(expr, Expr::function(Operator::Add, vec![Expr::integer(2), x]));
//! ```
//!
//! # Strict equality
//!
//! The [`PartialEq`] implementation for [`Expr`] is _structural_ equality: two expressions are
//! equal if they have the same kind, the same literal values, and pairwise equal operands **in
//! the same order**. Since canonical forms sort the operands of commutative operators,
//! structural equality of canonical expressions is a cheap, false-positive free approximation
//! of mathematical equality.
//!
//! # Pattern matching and rewriting
//!
//! Symbols whose name begins with underscores are _wildcards_ when they appear in a pattern (see
//! [`pattern::Wildcard`]). [`match_pattern`] binds wildcards to sub-expressions, and
//! [`substitute`] instantiates a template with those bindings. Rules pair a pattern with a
//! replacement and are compiled into a [`RuleSet`], which [`replace`] applies a bounded number
//! of times.
//!
//! # Simplification
//!
//! [`Engine::simplify`] drives rule application toward a lower-cost form, where cost is
//! measured by a pluggable function ([`default_cost`] by default). A rewrite is only accepted
//! if it does not make the expression much more expensive, and every run is bounded by an
//! iteration limit, an optional time limit, and an optional [`CancellationToken`]. The steps
//! taken are recorded in a [`Trace`].
//!
//! ```
//! use cas_algebra::{Engine, Expr, Operator};
//!
//! let x = Expr::symbol("x");
//! let expr = Expr::function(Operator::Multiply, vec![
//!     Expr::function(Operator::Power, vec![x.clone(), Expr::integer(2)]),
//!     Expr::function(Operator::Power, vec![x.clone(), Expr::integer(3)]),
//! ]);
//!
//! let simplified = Engine::new().simplify(&expr);
//! assert_eq!(simplified.value, Expr::function(Operator::Power, vec![x, Expr::integer(5)]));
//! ```

pub mod canonical;
pub mod consts;
pub mod expr;
pub mod interchange;
pub mod numeric;
pub mod pattern;
pub mod primitive;
pub mod rewrite;
pub mod step_collector;

#[cfg(test)]
mod proptests;

pub use expr::{Expr, ExprKind, Metadata, Operator};
pub use numeric::Number;
pub use pattern::{match_pattern, substitute, test_pattern, Binding, PatternMatchOptions, Substitution};
pub use rewrite::{
    default_cost,
    replace,
    standard_rules,
    CancellationToken,
    Engine,
    ReplaceOptions,
    Rule,
    RuleSet,
    Simplified,
    SimplifyOptions,
    Step,
    Trace,
    UnbuiltRule,
};
