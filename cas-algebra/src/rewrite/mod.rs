//! Rewrite rules, rule application, and cost-guided simplification.
//!
//! A rule pairs a pattern (the left-hand side) with a replacement: either a template whose
//! wildcards are filled in with the bindings of the match, or a function computing the
//! replacement from the matched expression. Rules are written as [`UnbuiltRule`]s and compiled
//! all at once into a [`RuleSet`], which rejects malformed rules before any of them is applied.
//!
//! [`replace`] applies a rule set a bounded number of times, accepting every rewrite. The
//! [`Engine`] only accepts rewrites that keep the [cost](default_cost) of the expression in check,
//! and records why it stopped in a [`Trace`].

mod cost;
mod engine;
pub mod error;
mod replace;
mod rule;
mod rules;
mod step;

pub use cost::{default_cost, CostFunction};
pub use engine::{CancellationToken, Engine, Simplified, SimplifyOptions};
pub use replace::{replace, replace_with, ReplaceOptions};
pub use rule::{Condition, Evaluator, Replacement, Rule, RuleSet, UnbuiltRule};
pub use rules::standard as standard_rules;
pub use step::{Step, Trace};
