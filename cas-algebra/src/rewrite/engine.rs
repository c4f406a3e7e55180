//! Cost-guided simplification.

use super::{
    cost::{default_cost, CostFunction},
    rules,
    step::{Step, Trace},
    RuleSet,
};
use crate::canonical::{self, add, multiply};
use crate::consts::{FALSE, TRUE, ZERO};
use crate::expr::{Expr, ExprKind, Operator};
use crate::numeric::Number;
use crate::pattern::PatternMatchOptions;
use crate::step_collector::StepCollector;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use rug::{Integer, Rational};
use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering as AtomicOrdering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::{debug, trace};

/// A candidate rewrite is accepted if its cost is at most this many times the current cost.
const COST_TOLERANCE: f64 = 1.2;

/// A flag shared between a simplification run and whoever may want to stop it.
///
/// The run checks the flag between iterations, so it stops soon after [`cancel`] is called, not
/// immediately.
///
/// [`cancel`]: CancellationToken::cancel
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every run holding a clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Options for [`Engine::simplify_with`].
#[derive(Clone)]
pub struct SimplifyOptions {
    /// The rules to apply. If [`None`], the engine's standard rules are used.
    pub rules: Option<RuleSet>,

    /// Simplify sub-expressions before the expression itself.
    ///
    /// The default value is `true`.
    pub recursive: bool,

    /// Stop rewriting an expression after the first accepted rewrite.
    ///
    /// The default value is `false`.
    pub once: bool,

    /// Try every ordering of the operands of commutative operators when matching.
    ///
    /// The default value is `true`.
    pub match_permutations: bool,

    /// The maximum number of accepted rewrites in a run, across all sub-expressions. Value
    /// substitutions count as rewrites.
    ///
    /// The default value is `1024`.
    pub iteration_limit: usize,

    /// Replace symbols with the values assigned to them in the engine.
    ///
    /// The default value is `false`.
    pub substitute_values: bool,

    /// The cost function. If [`None`], [`default_cost`] is used.
    pub cost: Option<CostFunction>,

    /// Stop the run once this much time has passed.
    pub time_limit: Option<Duration>,

    /// Stop the run once this token is cancelled.
    pub cancellation: Option<CancellationToken>,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            rules: None,
            recursive: true,
            once: false,
            match_permutations: true,
            iteration_limit: 1024,
            substitute_values: false,
            cost: None,
            time_limit: None,
            cancellation: None,
        }
    }
}

impl fmt::Debug for SimplifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplifyOptions")
            .field("rules", &self.rules.as_ref().map(RuleSet::len))
            .field("recursive", &self.recursive)
            .field("once", &self.once)
            .field("match_permutations", &self.match_permutations)
            .field("iteration_limit", &self.iteration_limit)
            .field("substitute_values", &self.substitute_values)
            .field("custom_cost", &self.cost.is_some())
            .field("time_limit", &self.time_limit)
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

impl SimplifyOptions {
    /// Set the rules to apply.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Set whether sub-expressions are simplified.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether to stop after the first accepted rewrite of each expression.
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Set whether the operands of commutative operators are matched in any order.
    pub fn match_permutations(mut self, match_permutations: bool) -> Self {
        self.match_permutations = match_permutations;
        self
    }

    /// Set the maximum number of rewrite iterations.
    pub fn iteration_limit(mut self, iteration_limit: usize) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }

    /// Set whether symbols are replaced with their assigned values.
    pub fn substitute_values(mut self, substitute_values: bool) -> Self {
        self.substitute_values = substitute_values;
        self
    }

    /// Set the cost function.
    pub fn cost<F>(mut self, cost: F) -> Self
    where
        F: Fn(&Expr) -> f64 + Send + Sync + 'static,
    {
        self.cost = Some(Arc::new(cost));
        self
    }

    /// Set the wall-clock limit of a run.
    pub fn time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Set the token that cancels the run.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// The result of a simplification run.
#[derive(Debug, Clone, PartialEq)]
pub struct Simplified {
    /// The simplest expression found.
    pub value: Expr,

    /// How it was found.
    pub trace: Trace,
}

/// A simplification engine.
///
/// The engine holds the values assigned to symbols and the standard rule set, which is compiled
/// the first time it is needed. Engines are independent of each other, and a single engine can
/// simplify many expressions concurrently.
#[derive(Debug, Default)]
pub struct Engine {
    values: HashMap<String, Expr>,
    standard: OnceCell<RuleSet>,
    options: SimplifyOptions,
}

impl Engine {
    /// Creates an engine with no assigned values and the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose [`Engine::simplify`] uses the given options.
    pub fn with_options(options: SimplifyOptions) -> Self {
        Self { options, ..Self::default() }
    }

    /// Assigns a value to a symbol, used when simplifying with
    /// [`SimplifyOptions::substitute_values`].
    pub fn assign(&mut self, name: impl Into<String>, value: Expr) {
        self.values.insert(name.into(), canonical::canonical(&value));
    }

    /// Returns the value assigned to a symbol.
    pub fn value_of(&self, name: &str) -> Option<&Expr> {
        self.values.get(name)
    }

    /// Returns the standard rule set, compiling it on first use.
    pub fn standard_rules(&self) -> &RuleSet {
        self.standard.get_or_init(rules::standard)
    }

    /// Simplifies the expression with the engine's options.
    pub fn simplify(&self, expr: &Expr) -> Simplified {
        self.simplify_with(expr, &self.options)
    }

    /// Simplifies the expression with the given options, recording a trace.
    pub fn simplify_with(&self, expr: &Expr, options: &SimplifyOptions) -> Simplified {
        let mut steps = Vec::new();
        let (value, mut trace) = self.run(expr, options, &mut steps);
        trace.steps = steps;
        Simplified { value, trace }
    }

    /// Simplifies the expression with the engine's options, without recording the steps taken.
    pub fn simplify_value(&self, expr: &Expr) -> Expr {
        self.run(expr, &self.options, &mut ()).0
    }

    /// Simplifies every expression in parallel.
    pub fn simplify_all(&self, exprs: &[Expr]) -> Vec<Simplified> {
        exprs.par_iter().map(|expr| self.simplify(expr)).collect()
    }

    fn run(
        &self,
        expr: &Expr,
        options: &SimplifyOptions,
        steps: &mut dyn StepCollector<Step>,
    ) -> (Expr, Trace) {
        let rules = options.rules.as_ref().unwrap_or_else(|| self.standard_rules());
        let cost: CostFunction = match &options.cost {
            Some(cost) => Arc::clone(cost),
            None => Arc::new(default_cost),
        };
        let mut run = Run {
            engine: self,
            options,
            rules,
            cost,
            match_options: PatternMatchOptions::default().match_permutations(options.match_permutations),
            deadline: options.time_limit.map(|limit| Instant::now() + limit),
            iterations: 0,
            steps,
            flags: Trace::default(),
        };

        let value = run.simplify(&canonical::canonical(expr), &mut Vec::new());
        debug!(iterations = run.iterations, result = %value, "simplification finished");
        (value, run.flags)
    }
}

/// The state of one simplification run.
struct Run<'a> {
    engine: &'a Engine,
    options: &'a SimplifyOptions,
    rules: &'a RuleSet,
    cost: CostFunction,
    match_options: PatternMatchOptions,
    deadline: Option<Instant>,

    /// Accepted rewrites so far, across the whole tree.
    iterations: usize,
    steps: &'a mut dyn StepCollector<Step>,

    /// Why the run stopped early. The steps are collected separately.
    flags: Trace,
}

impl Run<'_> {
    /// Checks every limit, recording the first one hit.
    fn should_stop(&mut self) -> bool {
        if !self.flags.is_complete() {
            return true;
        }

        if self.options.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            debug!("simplification cancelled");
            self.flags.cancelled = true;
        } else if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!("simplification time limit reached");
            self.flags.time_limit_reached = true;
        } else if self.iterations >= self.options.iteration_limit {
            debug!(limit = self.options.iteration_limit, "simplification iteration limit reached");
            self.flags.iteration_limit_reached = true;
        }
        !self.flags.is_complete()
    }

    fn push_step(&mut self, value: &Expr, because: &str) {
        if self.steps.is_collecting() {
            self.steps.push(Step::new(value.clone(), because));
        }
    }

    /// Simplifies a canonical expression. `substituted` holds the symbols whose values are
    /// being simplified, so that a symbol defined in terms of itself is left alone.
    fn simplify(&mut self, expr: &Expr, substituted: &mut Vec<String>) -> Expr {
        if let Some(value) = self.substitute_value(expr, substituted) {
            return value;
        }

        let Some((op, operands)) = expr.as_function() else {
            return expr.clone();
        };
        if op == &Operator::Error {
            return expr.clone();
        }

        if op.is_relational() {
            if let [lhs, rhs] = operands {
                return self.simplify_relation(op, lhs, rhs, substituted);
            }
        }

        let current = if self.options.recursive {
            self.simplify_operands(expr, substituted)
        } else {
            expr.clone()
        };
        self.rewrite(current, substituted)
    }

    /// Replaces a symbol with its assigned value, and simplifies the value.
    fn substitute_value(&mut self, expr: &Expr, substituted: &mut Vec<String>) -> Option<Expr> {
        if !self.options.substitute_values {
            return None;
        }

        let name = expr.as_symbol()?;
        let value = self.engine.values.get(name)?;
        if substituted.iter().any(|seen| seen == name) || self.should_stop() {
            return None;
        }

        self.iterations += 1;
        self.push_step(value, &format!("value of {}", name));
        substituted.push(name.to_string());
        let simplified = self.simplify(value, substituted);
        substituted.pop();
        Some(simplified)
    }

    /// Simplifies each operand of an application, rebuilding it in canonical form if any
    /// operand changed.
    fn simplify_operands(&mut self, expr: &Expr, substituted: &mut Vec<String>) -> Expr {
        let Some((op, operands)) = expr.as_function() else {
            return expr.clone();
        };

        let simplified = operands
            .iter()
            .map(|operand| self.simplify(operand, substituted))
            .collect::<Vec<_>>();
        if simplified.iter().zip(operands).all(|(new, old)| new == old) {
            return expr.clone();
        }
        Expr::function(op.clone(), simplified)
    }

    /// Applies rules to the expression until none of them produces an acceptable candidate.
    fn rewrite(&mut self, mut current: Expr, substituted: &mut Vec<String>) -> Expr {
        let mut seen = vec![current.clone()];
        let mut current_cost = (self.cost)(&current);

        while !current.is_leaf() && !self.should_stop() {
            let mut accepted = None;
            for rule in self.rules {
                let Some(candidate) = rule.apply(&current, &self.match_options, true) else {
                    continue;
                };
                if candidate == current {
                    continue;
                }

                let candidate_cost = (self.cost)(&candidate);
                if candidate_cost > COST_TOLERANCE * current_cost {
                    trace!(rule = %rule.id, from = current_cost, to = candidate_cost, "candidate rejected on cost");
                    continue;
                }

                accepted = Some((candidate, rule.id.as_str()));
                break;
            }

            let Some((candidate, because)) = accepted else {
                break;
            };
            self.iterations += 1;

            if seen.contains(&candidate) {
                debug!(rule = because, value = %candidate, "rewrite cycle detected");
                self.flags.cycle_detected = true;
                break;
            }

            trace!(rule = because, from = %current, to = %candidate, "rule applied");
            self.push_step(&candidate, because);

            current = if self.options.recursive {
                self.simplify_operands(&candidate, substituted)
            } else {
                candidate
            };
            current_cost = (self.cost)(&current);
            seen.push(current.clone());

            if self.options.once {
                break;
            }
        }

        // a rewrite may produce a relation, which is simplified differently
        if let Some((op, [lhs, rhs])) = current.as_function() {
            if op.is_relational() && !self.should_stop() {
                let (op, lhs, rhs) = (op.clone(), lhs.clone(), rhs.clone());
                return self.simplify_relation(&op, &lhs, &rhs, substituted);
            }
        }
        current
    }

    /// Simplifies both sides of a relation, then tries to make the relation itself simpler.
    ///
    /// - relations between real literals become `True` or `False`
    /// - a positive rational factor common to both sides is divided out (`2x < 4y` becomes
    ///   `x < 2y`)
    /// - if `lhs - rhs op 0` is cheaper, it replaces the relation
    fn simplify_relation(
        &mut self,
        op: &Operator,
        lhs: &Expr,
        rhs: &Expr,
        substituted: &mut Vec<String>,
    ) -> Expr {
        let lhs = self.simplify(lhs, substituted);
        let rhs = self.simplify(rhs, substituted);

        if let Some(decided) = decide(op, &lhs, &rhs) {
            self.push_step(&decided, "evaluate-relation");
            return decided;
        }

        let mut current = Expr::function(op.clone(), vec![lhs.clone(), rhs.clone()]);
        let mut current_cost = (self.cost)(&current);

        if let Some(factor) = common_factor(&lhs, &rhs) {
            let scaled = Expr::function(op.clone(), vec![scale(&lhs, &factor), scale(&rhs, &factor)]);
            let scaled_cost = (self.cost)(&scaled);
            if scaled_cost <= current_cost {
                self.push_step(&scaled, "factor-relation");
                current = scaled;
                current_cost = scaled_cost;
            }
        }

        let Some((op, [lhs, rhs])) = current.as_function() else {
            return current.clone();
        };
        if !rhs.is_zero() && !self.should_stop() {
            let difference = canonical::subtract(lhs.clone(), rhs.clone());
            let difference = self.simplify(&difference, substituted);
            if let Some(decided) = decide(op, &difference, &ZERO) {
                self.push_step(&decided, "evaluate-relation");
                return decided;
            }

            let moved = Expr::function(op.clone(), vec![difference, ZERO.clone()]);
            if (self.cost)(&moved) < current_cost {
                self.push_step(&moved, "move-to-one-side");
                return moved;
            }
        }

        current
    }
}

/// Decides a relation between two real literals.
fn decide(op: &Operator, lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    let ordering = lhs.as_number()?.cmp_real(rhs.as_number()?)?;
    let holds = match op {
        Operator::Equal => ordering == Ordering::Equal,
        Operator::NotEqual => ordering != Ordering::Equal,
        Operator::Less => ordering == Ordering::Less,
        Operator::LessEqual => ordering != Ordering::Greater,
        Operator::Greater => ordering == Ordering::Greater,
        Operator::GreaterEqual => ordering != Ordering::Less,
        _ => return None,
    };
    Some(if holds { TRUE.clone() } else { FALSE.clone() })
}

/// Returns the positive rational coefficient of an expression, if it has one.
///
/// - `6` -> `6`
/// - `-4x` -> `4`
/// - `2x + 6` -> `2`
fn content(expr: &Expr) -> Option<Rational> {
    match expr.kind() {
        ExprKind::Number(n) => n.as_rational().filter(|r| **r != 0).map(|r| r.clone().abs()),
        ExprKind::Function(Operator::Negate, operands) => content(operands.first()?),
        ExprKind::Function(Operator::Multiply, factors) => {
            factors.first()?.as_rational().map(|r| r.clone().abs())
        },
        ExprKind::Function(Operator::Add, terms) => {
            let mut terms = terms.iter().map(content);
            let first = terms.next()??;
            terms.try_fold(first, |acc, term| Some(rational_gcd(&acc, &term?)))
        },
        _ => None,
    }
}

/// The largest rational dividing both: `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
fn rational_gcd(a: &Rational, b: &Rational) -> Rational {
    let numer = Integer::from(a.numer().gcd_ref(b.numer()));
    let denom = Integer::from(a.denom().lcm_ref(b.denom()));
    Rational::from((numer, denom))
}

/// Returns the factor common to both sides of a relation, if it is not `1`. A zero side does not
/// constrain the factor.
fn common_factor(lhs: &Expr, rhs: &Expr) -> Option<Rational> {
    let factor = match (content(lhs), content(rhs)) {
        (Some(a), Some(b)) => rational_gcd(&a, &b),
        (Some(a), None) if rhs.is_zero() => a,
        (None, Some(b)) if lhs.is_zero() => b,
        _ => return None,
    };
    (factor != 1).then_some(factor)
}

/// Divides the expression by a positive rational, distributing over sums.
fn scale(expr: &Expr, factor: &Rational) -> Expr {
    let reciprocal = Expr::number(Number::from_rational(factor.clone().recip()));
    match expr.as_function() {
        Some((Operator::Add, terms)) => add(
            terms
                .iter()
                .map(|term| multiply(vec![reciprocal.clone(), term.clone()]))
                .collect(),
        ),
        _ => multiply(vec![reciprocal, expr.clone()]),
    }
}
