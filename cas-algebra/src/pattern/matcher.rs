//! The matching algorithm.

use super::{
    substitution::{Binding, Substitution},
    wildcard::{Wildcard, WildcardKind},
    PatternMatchOptions,
};
use crate::consts::{NEG_ONE, ONE, ONE_HALF, ZERO};
use crate::expr::{Expr, ExprKind, Operator};
use tracing::debug;

/// Commutative operand lists are tried in at most this many orders (`8!`).
const MAX_PERMUTATIONS: usize = 40_320;

/// Matches the pattern against the expression, returning the wildcard bindings on success.
///
/// If [`PatternMatchOptions::recursive`] is set and the expression itself does not match, every
/// sub-expression is tried in pre-order, and the bindings of the first match are returned.
pub fn match_pattern(
    pattern: &Expr,
    expr: &Expr,
    options: &PatternMatchOptions,
) -> Option<Substitution> {
    let matcher = Matcher { options };
    if options.recursive {
        matcher.search(pattern, expr)
    } else {
        matcher.match_expr(pattern, expr, &options.substitution)
    }
}

/// Returns true if the pattern matches the expression.
pub fn test_pattern(pattern: &Expr, expr: &Expr, options: &PatternMatchOptions) -> bool {
    match_pattern(pattern, expr, options).is_some()
}

struct Matcher<'a> {
    options: &'a PatternMatchOptions,
}

impl Matcher<'_> {
    /// Tries the expression, then each of its sub-expressions in pre-order.
    fn search(&self, pattern: &Expr, expr: &Expr) -> Option<Substitution> {
        self.match_expr(pattern, expr, &self.options.substitution).or_else(|| {
            expr.operands().iter().find_map(|operand| self.search(pattern, operand))
        })
    }

    fn match_expr(&self, pattern: &Expr, expr: &Expr, sub: &Substitution) -> Option<Substitution> {
        if let Some(wildcard) = Wildcard::of(pattern) {
            let binding = match wildcard.kind {
                WildcardKind::Single => Binding::Single(expr.clone()),
                _ => Binding::Sequence(vec![expr.clone()]),
            };
            return bind(wildcard, binding, sub);
        }

        let direct = self.match_direct(pattern, expr, sub);
        if direct.is_some() || !self.options.use_variations {
            return direct;
        }

        let (op, _) = pattern.as_function()?;
        variations(op, expr)
            .iter()
            .find_map(|variation| self.match_direct(pattern, variation, sub))
    }

    /// Matches without trying variations of the expression itself.
    fn match_direct(&self, pattern: &Expr, expr: &Expr, sub: &Substitution) -> Option<Substitution> {
        match (pattern.kind(), expr.kind()) {
            (ExprKind::Number(a), ExprKind::Number(b)) => (a == b).then(|| sub.clone()),
            (ExprKind::Symbol(a), ExprKind::Symbol(b))
                | (ExprKind::String(a), ExprKind::String(b)) => (a == b).then(|| sub.clone()),
            (ExprKind::Function(pattern_op, patterns), ExprKind::Function(op, operands))
                if pattern_op == op => self.match_operands(op, patterns, operands, sub),
            _ => None,
        }
    }

    /// Matches the operand list of an application, searching the orderings of the pattern
    /// operands if the operator is commutative.
    fn match_operands(
        &self,
        op: &Operator,
        patterns: &[Expr],
        operands: &[Expr],
        sub: &Substitution,
    ) -> Option<Substitution> {
        if !op.is_commutative() || !self.options.match_permutations || patterns.len() < 2 {
            let patterns = patterns.iter().collect::<Vec<_>>();
            return self.match_list(&patterns, operands, sub);
        }

        let mut order = (0..patterns.len()).collect::<Vec<_>>();
        let mut attempts = 0;
        loop {
            let permuted = order.iter().map(|&i| &patterns[i]).collect::<Vec<_>>();
            if let Some(sub) = self.match_list(&permuted, operands, sub) {
                return Some(sub);
            }

            attempts += 1;
            if !next_permutation(&mut order) {
                return None;
            }
            if attempts == MAX_PERMUTATIONS {
                debug!(operator = %op, operands = patterns.len(), "permutation search truncated");
                return None;
            }
        }
    }

    /// Matches a list of patterns position by position. Sequence wildcards consume runs of
    /// operands, shortest run first.
    fn match_list(&self, patterns: &[&Expr], operands: &[Expr], sub: &Substitution) -> Option<Substitution> {
        let Some((first, rest)) = patterns.split_first() else {
            return operands.is_empty().then(|| sub.clone());
        };

        match Wildcard::of(first).filter(Wildcard::is_sequence) {
            Some(wildcard) => {
                let reserved = rest.iter().map(|pattern| min_len(pattern)).sum::<usize>();
                let max = operands.len().checked_sub(reserved)?;
                (wildcard.kind.min_len()..=max).find_map(|len| {
                    let run = Binding::Sequence(operands[..len].to_vec());
                    let sub = bind(wildcard, run, sub)?;
                    self.match_list(rest, &operands[len..], &sub)
                })
            },
            None => {
                let (operand, remaining) = operands.split_first()?;
                let sub = self.match_expr(first, operand, sub)?;
                self.match_list(rest, remaining, &sub)
            },
        }
    }
}

/// The minimum number of operands a pattern consumes in an operand list.
fn min_len(pattern: &Expr) -> usize {
    Wildcard::of(pattern).map_or(1, |wildcard| wildcard.kind.min_len())
}

/// Records the binding of a named wildcard. Unnamed wildcards always match.
fn bind(wildcard: Wildcard, binding: Binding, sub: &Substitution) -> Option<Substitution> {
    if wildcard.is_named() {
        sub.bind(wildcard.key, binding)
    } else {
        Some(sub.clone())
    }
}

/// Rearranges the indices into the next permutation in lexicographic order. Returns false once
/// every permutation has been produced.
fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = order.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    let successor = order.iter().rposition(|&i| i > order[pivot]).unwrap_or(pivot);
    order.swap(pivot, successor);
    order[pivot + 1..].reverse();
    true
}

/// Returns raw forms of the expression that are equal to it, but are applications of `op`, such
/// as `x` as `x + 0` or `x * 1`.
fn variations(op: &Operator, expr: &Expr) -> Vec<Expr> {
    let raw = |operands: Vec<Expr>| Expr::raw(op.clone(), operands);
    match op {
        Operator::Add => vec![raw(vec![expr.clone(), ZERO.clone()])],
        Operator::Multiply => {
            let mut forms = Vec::new();
            if let Some((Operator::Negate, [operand])) = expr.as_function() {
                forms.push(raw(vec![NEG_ONE.clone(), operand.clone()]));
            }
            forms.push(raw(vec![ONE.clone(), expr.clone()]));
            forms
        },
        Operator::Divide => match expr.as_function() {
            Some((Operator::Multiply, factors)) => {
                let reciprocal = factors.iter().position(|factor| {
                    matches!(factor.as_function(), Some((Operator::Power, [_, exp])) if exp.as_integer().is_some_and(|n| *n == -1))
                });
                match reciprocal {
                    Some(i) => {
                        let mut numerator = factors.to_vec();
                        let denominator = numerator.remove(i).operands()[0].clone();
                        let numerator = match numerator.len() {
                            1 => numerator.remove(0),
                            _ => Expr::raw(Operator::Multiply, numerator),
                        };
                        vec![raw(vec![numerator, denominator])]
                    },
                    None => vec![raw(vec![expr.clone(), ONE.clone()])],
                }
            },
            _ => vec![raw(vec![expr.clone(), ONE.clone()])],
        },
        Operator::Power => match expr.as_function() {
            Some((Operator::Sqrt, [operand])) => vec![raw(vec![operand.clone(), ONE_HALF.clone()])],
            _ => vec![raw(vec![expr.clone(), ONE.clone()])],
        },
        Operator::Negate => match expr.kind() {
            ExprKind::Number(n) if n.is_negative() => vec![raw(vec![Expr::number(n.abs())])],
            ExprKind::Function(Operator::Multiply, factors) => {
                let Some(coefficient) = factors.first().and_then(Expr::as_number) else {
                    return Vec::new();
                };
                if !coefficient.is_negative() {
                    return Vec::new();
                }

                let mut factors = factors.to_vec();
                if coefficient.is_negative_one() {
                    factors.remove(0);
                } else {
                    factors[0] = Expr::number(coefficient.abs());
                }
                let product = match factors.len() {
                    1 => factors.remove(0),
                    _ => Expr::raw(Operator::Multiply, factors),
                };
                vec![raw(vec![product])]
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn f(op: Operator, operands: Vec<Expr>) -> Expr {
        Expr::function(op, operands)
    }

    fn raw(op: Operator, operands: Vec<Expr>) -> Expr {
        Expr::raw(op, operands)
    }

    fn w(key: &str) -> Expr {
        Expr::symbol(key)
    }

    fn opts() -> PatternMatchOptions {
        PatternMatchOptions::default()
    }

    #[test]
    fn literals_and_symbols() {
        let x = Expr::symbol("x");
        assert!(test_pattern(&x, &x, &opts()));
        assert!(!test_pattern(&x, &Expr::symbol("y"), &opts()));
        assert!(test_pattern(&Expr::rational(1, 2), &Expr::rational(2, 4), &opts()));
        assert!(!test_pattern(&Expr::integer(1), &Expr::string("1"), &opts()));
    }

    #[test]
    fn single_wildcards() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let pattern = raw(Operator::Sin, vec![w("_a")]);
        let sub = match_pattern(&pattern, &f(Operator::Sin, vec![x.clone()]), &opts()).unwrap();
        assert_eq!(sub.get_single("_a"), Some(&x));

        // repeated names must bind the same expression
        let twice = raw(Operator::Tuple, vec![w("_a"), w("_a")]);
        assert!(test_pattern(&twice, &f(Operator::Tuple, vec![x.clone(), x.clone()]), &opts()));
        assert!(!test_pattern(&twice, &f(Operator::Tuple, vec![x.clone(), y.clone()]), &opts()));

        // unnamed wildcards bind nothing
        let anon = raw(Operator::Tuple, vec![w("_"), w("_")]);
        let sub = match_pattern(&anon, &f(Operator::Tuple, vec![x, y]), &opts()).unwrap();
        assert!(sub.is_empty());
    }

    #[test]
    fn seeded_substitution() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let pattern = raw(Operator::Sin, vec![w("_a")]);
        let seeded = opts().substitution(Substitution::new().with("_a", y));
        assert!(!test_pattern(&pattern, &f(Operator::Sin, vec![x]), &seeded));
    }

    #[test]
    fn sequence_wildcards() {
        let (x, y, z) = (Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z"));
        let list = f(Operator::List, vec![x.clone(), y.clone(), z.clone()]);

        let pattern = raw(Operator::List, vec![w("_first"), w("__rest")]);
        let sub = match_pattern(&pattern, &list, &opts()).unwrap();
        assert_eq!(sub.get("__rest"), Some(&Binding::Sequence(vec![y.clone(), z.clone()])));

        // sequences need at least one operand, optional sequences do not
        let single = f(Operator::List, vec![x.clone()]);
        assert!(!test_pattern(&pattern, &single, &opts()));
        let optional = raw(Operator::List, vec![w("_first"), w("___rest")]);
        let sub = match_pattern(&optional, &single, &opts()).unwrap();
        assert_eq!(sub.get("___rest"), Some(&Binding::Sequence(vec![])));

        // shortest run first
        let split = raw(Operator::List, vec![w("__a"), w("__b")]);
        let sub = match_pattern(&split, &list, &opts()).unwrap();
        assert_eq!(sub.get("__a"), Some(&Binding::Sequence(vec![x])));
        assert_eq!(sub.get("__b"), Some(&Binding::Sequence(vec![y, z])));
    }

    #[test]
    fn permutations() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let sum = f(Operator::Add, vec![x.clone(), y.clone()]);
        let pattern = raw(Operator::Add, vec![w("_a"), w("_b")]);
        let sub = match_pattern(&pattern, &sum, &opts()).unwrap();
        assert_eq!(sub.get_single("_a"), Some(&x));
        assert_eq!(sub.get_single("_b"), Some(&y));

        // `y` has to be matched first, which needs the second ordering
        let fixed = raw(Operator::Add, vec![y.clone(), w("_a")]);
        let sub = match_pattern(&fixed, &sum, &opts()).unwrap();
        assert_eq!(sub.get_single("_a"), Some(&x));
        assert!(!test_pattern(&fixed, &sum, &opts().match_permutations(false)));
    }

    #[test]
    fn next_permutation_order() {
        let mut order = vec![0, 1, 2];
        let mut seen = vec![order.clone()];
        while next_permutation(&mut order) {
            seen.push(order.clone());
        }
        assert_eq!(seen, vec![
            vec![0, 1, 2],
            vec![0, 2, 1],
            vec![1, 0, 2],
            vec![1, 2, 0],
            vec![2, 0, 1],
            vec![2, 1, 0],
        ]);
    }

    #[test]
    fn recursive_search() {
        let x = Expr::symbol("x");
        let expr = f(Operator::Add, vec![Expr::integer(1), f(Operator::Cos, vec![x.clone()])]);
        let pattern = raw(Operator::Cos, vec![w("_a")]);
        assert!(!test_pattern(&pattern, &expr, &opts()));

        let sub = match_pattern(&pattern, &expr, &opts().recursive(true)).unwrap();
        assert_eq!(sub.get_single("_a"), Some(&x));
    }

    #[test]
    fn variations_of_identity() {
        let x = Expr::symbol("x");
        let with_variations = opts().use_variations(true);

        let sum = raw(Operator::Add, vec![w("_a"), w("_b")]);
        let sub = match_pattern(&sum, &x, &with_variations).unwrap();
        assert_eq!(sub.get_single("_a"), Some(&x));
        assert_eq!(sub.get_single("_b"), Some(&ZERO.clone()));
        assert!(!test_pattern(&sum, &x, &opts()));

        let scaled = raw(Operator::Multiply, vec![w("_k"), x.clone()]);
        let neg_x = f(Operator::Negate, vec![x.clone()]);
        let sub = match_pattern(&scaled, &neg_x, &with_variations).unwrap();
        assert_eq!(sub.get_single("_k"), Some(&NEG_ONE.clone()));

        let square_root = raw(Operator::Power, vec![w("_b"), w("_e")]);
        let sub = match_pattern(&square_root, &f(Operator::Sqrt, vec![x.clone()]), &with_variations).unwrap();
        assert_eq!(sub.get_single("_e"), Some(&ONE_HALF.clone()));

        let quotient = raw(Operator::Divide, vec![w("_n"), w("_d")]);
        let sub = match_pattern(&quotient, &f(Operator::Divide, vec![Expr::symbol("y"), x.clone()]), &with_variations).unwrap();
        assert_eq!(sub.get_single("_d"), Some(&x));
    }
}
