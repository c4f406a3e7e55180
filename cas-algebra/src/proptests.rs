//! Property-based tests for canonical forms and pattern matching.

use crate::canonical::{canonical, negate};
use crate::expr::{Expr, Operator};
use crate::pattern::{match_pattern, substitute, PatternMatchOptions};
use proptest::prelude::*;

// Strategy for generating literals and symbols
fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (-20i64..20).prop_map(|n| Expr::integer(n)),
        prop::sample::select(vec!["x", "y", "z"]).prop_map(|name| Expr::symbol(name)),
    ]
}

// Strategy for generating raw trees of sums, products, negations and powers
fn raw_expr() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(|terms| Expr::raw(Operator::Add, terms)),
            prop::collection::vec(inner.clone(), 2..4)
                .prop_map(|factors| Expr::raw(Operator::Multiply, factors)),
            inner.prop_map(|x| Expr::raw(Operator::Negate, vec![x])),
            (prop::sample::select(vec!["x", "y", "z"]), 2i64..4).prop_map(|(name, n)| {
                Expr::raw(Operator::Power, vec![Expr::symbol(name), Expr::integer(n)])
            }),
        ]
    })
}

/// Rebuilds a tree with raw nodes, so that canonicalization has to redo everything.
fn to_raw(expr: &Expr) -> Expr {
    match expr.as_function() {
        Some((op, operands)) => Expr::raw(op.clone(), operands.iter().map(to_raw).collect()),
        None => expr.clone(),
    }
}

fn f(operands: Vec<Expr>) -> Expr {
    Expr::function(Operator::Custom("f".to_string()), operands)
}

proptest! {
    #[test]
    fn canonical_is_idempotent(expr in raw_expr()) {
        let once = canonical(&expr);
        prop_assert!(once.is_canonical());
        prop_assert_eq!(canonical(&to_raw(&once)), once);
    }

    #[test]
    fn operand_order_does_not_matter(
        terms in prop::collection::vec(leaf(), 1..5),
        rotation in 0usize..5,
    ) {
        let mut rotated = terms.clone();
        rotated.rotate_left(rotation % terms.len());
        prop_assert_eq!(
            Expr::function(Operator::Add, terms.clone()),
            Expr::function(Operator::Add, rotated.clone()),
        );
        prop_assert_eq!(
            Expr::function(Operator::Multiply, terms),
            Expr::function(Operator::Multiply, rotated),
        );
    }

    #[test]
    fn negate_is_an_involution(expr in raw_expr()) {
        let expr = canonical(&expr);
        prop_assert_eq!(negate(negate(expr.clone())), expr);
    }

    #[test]
    fn integer_literals_fold_exactly(a in -1000i64..1000, b in -1000i64..1000) {
        let (x, y) = (Expr::integer(a), Expr::integer(b));
        prop_assert_eq!(Expr::function(Operator::Add, vec![x.clone(), y.clone()]), Expr::integer(a + b));
        prop_assert_eq!(Expr::function(Operator::Multiply, vec![x, y]), Expr::integer(a * b));
    }

    #[test]
    fn single_wildcards_round_trip(operands in prop::collection::vec(leaf(), 0..5)) {
        let expr = f(operands.clone());
        let pattern = f((0..operands.len()).map(|i| Expr::symbol(format!("_w{}", i))).collect());
        let sub = match_pattern(&pattern, &expr, &PatternMatchOptions::default());
        prop_assert!(sub.is_some());
        prop_assert_eq!(substitute(&pattern, &sub.unwrap(), true), expr);
    }

    #[test]
    fn sequence_wildcards_round_trip(operands in prop::collection::vec(leaf(), 1..6)) {
        let expr = f(operands.clone());
        let pattern = f(vec![Expr::symbol("_first"), Expr::symbol("___rest")]);
        let sub = match_pattern(&pattern, &expr, &PatternMatchOptions::default()).unwrap();
        prop_assert_eq!(sub.get_single("_first"), Some(&operands[0]));
        prop_assert_eq!(substitute(&pattern, &sub, true), expr);
    }
}
