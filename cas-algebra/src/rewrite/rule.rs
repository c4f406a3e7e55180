//! Rewrite rules and their compilation into rule sets.

use super::error::{InvalidRulePattern, UnboundWildcard, UnknownWildcard};
use crate::canonical;
use crate::expr::Expr;
use crate::pattern::{
    is_malformed,
    match_pattern,
    named_wildcards,
    substitute,
    PatternMatchOptions,
    Substitution,
    Wildcard,
};
use cas_error::{spans_of, Error, Errors};
use std::{fmt, sync::Arc};

/// A predicate a match must satisfy for the rule to apply.
pub type Condition = Arc<dyn Fn(&Substitution) -> bool + Send + Sync>;

/// Computes the replacement of a matched expression. Returning [`None`] rejects the match.
pub type Evaluator = Arc<dyn Fn(&Expr, &Substitution) -> Option<Expr> + Send + Sync>;

/// What a matched expression is replaced with.
#[derive(Clone)]
pub enum Replacement {
    /// A template whose wildcards are replaced with their bindings.
    Template(Expr),

    /// A function computing the replacement.
    Evaluate(Evaluator),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => write!(f, "Template({})", template),
            Self::Evaluate(_) => write!(f, "Evaluate(..)"),
        }
    }
}

/// A rule that has not been checked yet. Compile a list of these with [`RuleSet::compile`].
///
/// ```
/// use cas_algebra::{Expr, Operator, UnbuiltRule};
///
/// let rule = UnbuiltRule::new(
///     Expr::raw(Operator::Ln, vec![Expr::raw(Operator::Exp, vec![Expr::symbol("_x")])]),
///     Expr::symbol("_x"),
/// )
/// .id("ln-exp")
/// .priority(10);
/// ```
#[derive(Clone)]
pub struct UnbuiltRule {
    lhs: Expr,
    replacement: Replacement,
    id: Option<String>,
    condition: Option<Condition>,
    priority: i32,
}

impl UnbuiltRule {
    /// Creates a rule replacing matches of `lhs` with the template `rhs`.
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self {
            lhs,
            replacement: Replacement::Template(rhs),
            id: None,
            condition: None,
            priority: 0,
        }
    }

    /// Creates a rule replacing matches of `lhs` with the result of a function.
    pub fn evaluate<F>(lhs: Expr, id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Expr, &Substitution) -> Option<Expr> + Send + Sync + 'static,
    {
        Self {
            lhs,
            replacement: Replacement::Evaluate(Arc::new(f)),
            id: Some(id.into()),
            condition: None,
            priority: 0,
        }
    }

    /// Set the text recorded in the trace when the rule applies.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a predicate the match must satisfy.
    pub fn condition<F>(mut self, f: F) -> Self
    where
        F: Fn(&Substitution) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(f));
        self
    }

    /// Set the priority of the rule. Rules with a higher priority are tried first.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The rule as text, `lhs -> rhs`, which error spans point into.
    fn source(&self) -> String {
        match &self.replacement {
            Replacement::Template(rhs) => format!("{} -> {}", self.lhs, rhs),
            Replacement::Evaluate(_) => format!("{} -> ..", self.lhs),
        }
    }

    /// Checks the rule, pushing every problem found into `errors`.
    fn check(&self, errors: &mut Errors) {
        let source = self.source();

        let mut malformed = Vec::new();
        let template = match &self.replacement {
            Replacement::Template(rhs) => Some(rhs),
            Replacement::Evaluate(_) => None,
        };
        for node in std::iter::once(&self.lhs).chain(template).flat_map(Expr::post_order_iter) {
            if let Some(name) = node.as_symbol().filter(|name| is_malformed(name)) {
                if !malformed.contains(&name) {
                    malformed.push(name);
                    errors.push(Error::new(
                        source.clone(),
                        spans_of(&source, name),
                        UnknownWildcard { name: name.to_string() },
                    ));
                }
            }
        }

        let invalid = if Wildcard::of(&self.lhs).is_some_and(|w| w.is_sequence()) {
            Some("a sequence wildcard cannot be rewritten on its own")
        } else if self.lhs.is_number() || self.lhs.as_string().is_some() {
            Some("literals are never rewritten")
        } else {
            None
        };
        if let Some(reason) = invalid {
            let lhs = self.lhs.to_string();
            let span = 0..lhs.chars().count();
            errors.push(Error::new(source.clone(), vec![span], InvalidRulePattern { reason }));
        }

        if let Some(rhs) = template {
            let bound = named_wildcards(&self.lhs);
            for key in named_wildcards(rhs) {
                if !bound.contains(&key) {
                    // only point at the occurrences in the right-hand side
                    let rhs_start = source.chars().count() - rhs.to_string().chars().count();
                    let spans = spans_of(&source, key)
                        .into_iter()
                        .filter(|span| span.start >= rhs_start)
                        .collect();
                    errors.push(Error::new(source.clone(), spans, UnboundWildcard { key: key.to_string() }));
                }
            }
        }
    }

    fn build(self) -> Rule {
        let id = self.id.unwrap_or_else(|| self.source());
        Rule {
            id,
            lhs: self.lhs,
            replacement: self.replacement,
            condition: self.condition,
            priority: self.priority,
        }
    }
}

impl From<(Expr, Expr)> for UnbuiltRule {
    fn from((lhs, rhs): (Expr, Expr)) -> Self {
        Self::new(lhs, rhs)
    }
}

/// A compiled rewrite rule.
#[derive(Clone)]
pub struct Rule {
    /// The text recorded in the trace when the rule applies. Defaults to `lhs -> rhs`.
    pub id: String,

    /// The pattern matched against expressions.
    pub lhs: Expr,

    replacement: Replacement,
    condition: Option<Condition>,

    /// Rules with a higher priority are tried first.
    pub priority: i32,
}

impl Rule {
    /// Applies the rule to the expression itself (not its sub-expressions). Returns the
    /// replacement if the pattern matches and the condition holds.
    pub fn apply(&self, expr: &Expr, options: &PatternMatchOptions, canonical: bool) -> Option<Expr> {
        let sub = match_pattern(&self.lhs, expr, options)?;
        if let Some(condition) = &self.condition {
            if !condition(&sub) {
                return None;
            }
        }

        match &self.replacement {
            Replacement::Template(rhs) => Some(substitute(rhs, &sub, canonical)),
            Replacement::Evaluate(f) => {
                let value = f(expr, &sub)?;
                Some(if canonical { canonical::canonical(&value) } else { value })
            },
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("lhs", &self.lhs)
            .field("replacement", &self.replacement)
            .field("conditional", &self.condition.is_some())
            .field("priority", &self.priority)
            .finish()
    }
}

/// An ordered, immutable collection of compiled rules, sorted by descending priority. Rules of
/// equal priority keep the order they were given in.
///
/// Cloning a rule set is cheap, and rule sets can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct RuleSet(Arc<Vec<Rule>>);

impl RuleSet {
    /// Compiles the rules, reporting every malformed rule at once.
    ///
    /// A rule is malformed if its right-hand side uses a wildcard its left-hand side does not
    /// bind, if it contains a symbol with too many underscores to be a wildcard, or if its
    /// left-hand side is a bare sequence wildcard or a literal.
    pub fn compile<I, R>(rules: I) -> Result<Self, Errors>
    where
        I: IntoIterator<Item = R>,
        R: Into<UnbuiltRule>,
    {
        let rules = rules.into_iter().map(Into::into).collect::<Vec<UnbuiltRule>>();
        let mut errors = Errors::default();
        for rule in &rules {
            rule.check(&mut errors);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut rules = rules.into_iter().map(UnbuiltRule::build).collect::<Vec<_>>();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(Self(Arc::new(rules)))
    }

    /// Returns a rule set with the rules of both sets, sorted by priority. On equal priority,
    /// rules of `self` come first.
    pub fn extend(&self, other: &RuleSet) -> RuleSet {
        let mut rules = self.iter().chain(other.iter()).cloned().collect::<Vec<_>>();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self(Arc::new(rules))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;
    use pretty_assertions::assert_eq;

    fn raw(op: Operator, operands: Vec<Expr>) -> Expr {
        Expr::raw(op, operands)
    }

    fn w(key: &str) -> Expr {
        Expr::symbol(key)
    }

    #[test]
    fn sorted_by_priority() {
        let rules = RuleSet::compile([
            UnbuiltRule::new(raw(Operator::Sin, vec![w("_x")]), w("_x")).id("low"),
            UnbuiltRule::new(raw(Operator::Cos, vec![w("_x")]), w("_x")).id("high").priority(5),
            UnbuiltRule::new(raw(Operator::Tan, vec![w("_x")]), w("_x")).id("also-low"),
        ])
        .unwrap();
        let ids = rules.iter().map(|rule| rule.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["high", "low", "also-low"]);
    }

    #[test]
    fn default_id_is_the_rule() {
        let rules = RuleSet::compile([(raw(Operator::Sin, vec![w("_x")]), w("_x"))]).unwrap();
        assert_eq!(rules.iter().next().unwrap().id, "Sin(_x) -> _x");
    }

    #[test]
    fn reports_every_error() {
        let errors = RuleSet::compile([
            (raw(Operator::Sin, vec![w("_x")]), w("_y")),
            (raw(Operator::Cos, vec![w("____x")]), Expr::integer(1)),
            (w("__all"), Expr::integer(0)),
            (raw(Operator::Tan, vec![w("_x")]), w("_x")),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 3);

        let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(messages, vec![
            "the wildcard `_y` is not bound by the left-hand side of the rule (in `Sin(_x) -> _y`)",
            "`____x` is not a valid wildcard (in `Cos(____x) -> 1`)",
            "invalid rule pattern: a sequence wildcard cannot be rewritten on its own (in `__all -> 0`)",
        ]);

        let unbound = errors.iter().next().unwrap();
        assert_eq!(unbound.spans, vec![11..13]);
    }

    #[test]
    fn apply_with_condition() {
        let x = Expr::symbol("x");
        let rule = RuleSet::compile([UnbuiltRule::new(raw(Operator::Abs, vec![w("_x")]), w("_x"))
            .condition(|sub| sub.get_single("_x").and_then(Expr::as_number).is_some_and(|n| !n.is_negative()))])
            .unwrap();
        let rule = rule.iter().next().unwrap();
        let opts = PatternMatchOptions::default();

        let two = Expr::function(Operator::Abs, vec![Expr::integer(2)]);
        assert_eq!(rule.apply(&two, &opts, true), Some(Expr::integer(2)));
        let abs_x = Expr::function(Operator::Abs, vec![x]);
        assert_eq!(rule.apply(&abs_x, &opts, true), None);
    }

    #[test]
    fn evaluated_replacement() {
        let rules = RuleSet::compile([UnbuiltRule::evaluate(
            raw(Operator::Sin, vec![w("_x")]),
            "sin-zero",
            |_, sub| sub.get_single("_x")?.is_zero().then(|| Expr::integer(0)),
        )])
        .unwrap();
        let rule = rules.iter().next().unwrap();
        let opts = PatternMatchOptions::default();
        let sin_zero = Expr::raw(Operator::Sin, vec![Expr::integer(0)]);
        assert_eq!(rule.apply(&sin_zero, &opts, true), Some(Expr::integer(0)));
        assert_eq!(rule.id, "sin-zero");
    }
}
