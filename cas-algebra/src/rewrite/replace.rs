//! Plain rule application, without cost comparison.

use super::{rule::Rule, step::Step, RuleSet};
use crate::expr::Expr;
use crate::pattern::PatternMatchOptions;
use crate::step_collector::StepCollector;
use tracing::trace;

/// Options for [`replace`].
#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    /// Apply the rules to sub-expressions as well.
    ///
    /// The default value is `false`.
    pub recursive: bool,

    /// Stop after the first rule that applies.
    ///
    /// The default value is `false`.
    pub once: bool,

    /// Try every ordering of the operands of commutative operators when matching.
    ///
    /// The default value is `true`.
    pub match_permutations: bool,

    /// Allow patterns to match variations of expressions (see [`PatternMatchOptions`]).
    ///
    /// The default value is `false`.
    pub use_variations: bool,

    /// The maximum number of passes over the rule set.
    ///
    /// The default value is `1`.
    pub iteration_limit: usize,

    /// Put replacements in canonical form.
    ///
    /// The default value is `true`.
    pub canonical: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            once: false,
            match_permutations: true,
            use_variations: false,
            iteration_limit: 1,
            canonical: true,
        }
    }
}

impl ReplaceOptions {
    /// Set whether sub-expressions are rewritten.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether to stop after the first rule that applies.
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Set whether the operands of commutative operators are matched in any order.
    pub fn match_permutations(mut self, match_permutations: bool) -> Self {
        self.match_permutations = match_permutations;
        self
    }

    /// Set whether patterns can match variations of expressions.
    pub fn use_variations(mut self, use_variations: bool) -> Self {
        self.use_variations = use_variations;
        self
    }

    /// Set the maximum number of passes over the rule set.
    pub fn iteration_limit(mut self, iteration_limit: usize) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }

    /// Set whether replacements are put in canonical form.
    pub fn canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    pub(crate) fn match_options(&self) -> PatternMatchOptions {
        PatternMatchOptions::default()
            .match_permutations(self.match_permutations)
            .use_variations(self.use_variations)
    }
}

/// Applies the rules of the rule set, in order, to the expression.
///
/// Returns the steps taken, the last of which holds the final expression, or [`None`] if no rule
/// applied.
pub fn replace(expr: &Expr, rules: &RuleSet, options: &ReplaceOptions) -> Option<Vec<Step>> {
    let mut steps = Vec::new();
    replace_with(expr, rules, options, &mut steps);
    (!steps.is_empty()).then_some(steps)
}

/// Applies the rules of the rule set to the expression, collecting the steps taken, and returns
/// the final expression.
///
/// Every pass tries each rule once, in order. Passes repeat until a pass changes nothing, or
/// [`ReplaceOptions::iteration_limit`] passes have been made.
pub fn replace_with(
    expr: &Expr,
    rules: &RuleSet,
    options: &ReplaceOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Expr {
    let match_options = options.match_options();
    let mut current = expr.clone();

    for _ in 0..options.iteration_limit {
        let mut changed = false;
        for rule in rules {
            let next = if options.recursive {
                apply_everywhere(&current, rule, &match_options, options.canonical)
            } else {
                rule.apply(&current, &match_options, options.canonical)
            };

            let Some(next) = next.filter(|next| *next != current) else {
                continue;
            };

            trace!(rule = %rule.id, from = %current, to = %next, "rule applied");
            step_collector.push(Step::new(next.clone(), rule.id.clone()));
            current = next;
            changed = true;

            if options.once {
                return current;
            }
        }

        if !changed {
            break;
        }
    }

    current
}

/// Applies the rule to the expression, or, if it does not match, to every operand it matches
/// somewhere inside.
fn apply_everywhere(expr: &Expr, rule: &Rule, options: &PatternMatchOptions, canonical: bool) -> Option<Expr> {
    if let Some(replaced) = rule.apply(expr, options, canonical) {
        return Some(replaced);
    }

    let (op, operands) = expr.as_function()?;
    let mut changed = false;
    let operands = operands
        .iter()
        .map(|operand| match apply_everywhere(operand, rule, options, canonical) {
            Some(replaced) => {
                changed = true;
                replaced
            },
            None => operand.clone(),
        })
        .collect();

    if !changed {
        return None;
    }
    Some(if canonical {
        Expr::function(op.clone(), operands)
    } else {
        Expr::raw(op.clone(), operands)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;
    use crate::rewrite::UnbuiltRule;
    use pretty_assertions::assert_eq;

    fn sin_to_cos() -> RuleSet {
        RuleSet::compile([UnbuiltRule::new(
            Expr::raw(Operator::Sin, vec![Expr::symbol("_x")]),
            Expr::raw(Operator::Cos, vec![Expr::symbol("_x")]),
        )
        .id("sin-to-cos")])
        .unwrap()
    }

    #[test]
    fn top_level_only() {
        let x = Expr::symbol("x");
        let expr = Expr::function(Operator::Add, vec![Expr::integer(1), Expr::function(Operator::Sin, vec![x.clone()])]);
        assert_eq!(replace(&expr, &sin_to_cos(), &ReplaceOptions::default()), None);

        let steps = replace(&expr, &sin_to_cos(), &ReplaceOptions::default().recursive(true)).unwrap();
        assert_eq!(steps, vec![Step::new(
            Expr::function(Operator::Add, vec![Expr::integer(1), Expr::function(Operator::Cos, vec![x])]),
            "sin-to-cos",
        )]);
    }

    #[test]
    fn once_and_limits() {
        let (a, b, c) = (Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c"));
        let rules = RuleSet::compile([(a.clone(), b.clone()), (b.clone(), c.clone())]).unwrap();

        let steps = replace(&a, &rules, &ReplaceOptions::default()).unwrap();
        assert_eq!(steps.iter().map(|s| s.value.clone()).collect::<Vec<_>>(), vec![b.clone(), c.clone()]);

        let steps = replace(&a, &rules, &ReplaceOptions::default().once(true)).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].value, b);
        assert_eq!(steps[0].because, "a -> b");
    }

    #[test]
    fn back_and_forth_is_bounded() {
        let (a, b) = (Expr::symbol("a"), Expr::symbol("b"));
        let rules = RuleSet::compile([(a.clone(), b.clone()), (b.clone(), a.clone())]).unwrap();
        let steps = replace(&a, &rules, &ReplaceOptions::default().iteration_limit(3)).unwrap();
        assert_eq!(steps.len(), 6);
    }
}
