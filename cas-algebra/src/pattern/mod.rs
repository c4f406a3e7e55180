//! Pattern matching over expression trees.
//!
//! A pattern is an ordinary (usually raw) [`Expr`] in which some symbols are _wildcards_:
//!
//! | Syntax              | Matches                                         |
//! |---------------------|-------------------------------------------------|
//! | `_`, `_name`        | exactly one expression                          |
//! | `__`, `__name`      | one or more consecutive operands                |
//! | `___`, `___name`    | zero or more consecutive operands               |
//!
//! Matching a pattern against an expression produces a [`Substitution`] mapping each named
//! wildcard to the expression(s) it matched. A wildcard name appearing more than once must match
//! the same expression every time. Matching never mutates anything, and failure is reported as
//! [`None`].
//!
//! ```
//! use cas_algebra::{match_pattern, Expr, Operator, PatternMatchOptions};
//!
//! let x = Expr::symbol("x");
//! let expr = Expr::function(Operator::Add, vec![x.clone(), Expr::symbol("y")]);
//! let pattern = Expr::raw(Operator::Add, vec![Expr::symbol("y"), Expr::symbol("_a")]);
//!
//! // `Add` is commutative, so the operands of the pattern are tried in every order
//! let sub = match_pattern(&pattern, &expr, &PatternMatchOptions::default()).unwrap();
//! assert_eq!(sub.get_single("_a"), Some(&x));
//! ```

mod matcher;
mod substitute;
mod substitution;
mod wildcard;

pub use matcher::{match_pattern, test_pattern};
pub use substitute::substitute;
pub use substitution::{Binding, Substitution};
pub use wildcard::{Wildcard, WildcardKind};

pub(crate) use wildcard::{is_malformed, named_wildcards};

/// Options for [`match_pattern`].
#[derive(Debug, Clone)]
pub struct PatternMatchOptions {
    /// Bindings the match must agree with. Wildcards bound here must match the same
    /// expressions, and are included in the result.
    pub substitution: Substitution,

    /// If the expression does not match, search its sub-expressions too.
    ///
    /// The default value is `false`.
    pub recursive: bool,

    /// Allow the expression to match in a form equal to it, but with the shape of the pattern,
    /// such as `x` matching `_a + _b` as `x + 0`.
    ///
    /// The default value is `false`.
    pub use_variations: bool,

    /// Try every ordering of the operands of commutative operators.
    ///
    /// The default value is `true`.
    pub match_permutations: bool,
}

impl Default for PatternMatchOptions {
    fn default() -> Self {
        Self {
            substitution: Substitution::default(),
            recursive: false,
            use_variations: false,
            match_permutations: true,
        }
    }
}

impl PatternMatchOptions {
    /// Set the bindings the match must agree with.
    pub fn substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Set whether sub-expressions are searched.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether variations of the expression are tried.
    pub fn use_variations(mut self, use_variations: bool) -> Self {
        self.use_variations = use_variations;
        self
    }

    /// Set whether the operands of commutative operators are matched in any order.
    pub fn match_permutations(mut self, match_permutations: bool) -> Self {
        self.match_permutations = match_permutations;
        self
    }
}
