use super::{substitution::Substitution, wildcard::Wildcard};
use crate::canonical;
use crate::expr::{Expr, ExprKind};

/// Replaces the wildcards of a template with their bindings.
///
/// Wildcards bound to a run of operands are spliced into the operand list they appear in. A
/// template that is itself a sequence wildcard produces a `Sequence` application (which is
/// spliced into its parent once canonicalized). Unbound wildcards are left in place.
///
/// If `canonical` is true, the result is put in canonical form.
pub fn substitute(template: &Expr, sub: &Substitution, canonical: bool) -> Expr {
    let result = replace_wildcards(template, sub);
    if canonical {
        canonical::canonical(&result)
    } else {
        result
    }
}

fn replace_wildcards(template: &Expr, sub: &Substitution) -> Expr {
    if let Some(wildcard) = Wildcard::of(template) {
        return match sub.get(wildcard.key) {
            Some(binding) => binding.to_expr(),
            None => template.clone(),
        };
    }

    let ExprKind::Function(op, operands) = template.kind() else {
        return template.clone();
    };

    let mut replaced = Vec::with_capacity(operands.len());
    for operand in operands {
        match Wildcard::of(operand).and_then(|wildcard| sub.get(wildcard.key)) {
            Some(binding) => replaced.extend(binding.as_slice().iter().cloned()),
            None => replaced.push(replace_wildcards(operand, sub)),
        }
    }
    Expr::raw(op.clone(), replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;
    use crate::pattern::Binding;
    use pretty_assertions::assert_eq;

    #[test]
    fn splices_sequences() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let sub = Substitution::new()
            .with("_a", Expr::integer(2))
            .with("___rest", Binding::Sequence(vec![x.clone(), y.clone()]));

        let template = Expr::raw(Operator::List, vec![Expr::symbol("_a"), Expr::symbol("___rest")]);
        assert_eq!(
            substitute(&template, &sub, false),
            Expr::raw(Operator::List, vec![Expr::integer(2), x.clone(), y.clone()]),
        );

        let sum = Expr::raw(Operator::Add, vec![Expr::symbol("___rest"), Expr::symbol("_a")]);
        assert_eq!(substitute(&sum, &sub, true).to_string(), "2 + x + y");
    }

    #[test]
    fn empty_runs_and_unbound() {
        let sub = Substitution::new().with("___rest", Binding::Sequence(vec![]));
        let template = Expr::raw(Operator::Add, vec![Expr::integer(1), Expr::symbol("___rest")]);
        assert_eq!(substitute(&template, &sub, true), Expr::integer(1));
        assert_eq!(substitute(&Expr::symbol("___rest"), &sub, true), Expr::symbol("Nothing"));
        assert_eq!(substitute(&Expr::symbol("_z"), &sub, true), Expr::symbol("_z"));
    }
}
