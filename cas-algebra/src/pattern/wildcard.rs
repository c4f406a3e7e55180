use crate::expr::Expr;

/// How many operands a wildcard can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardKind {
    /// `_` or `_name`: exactly one expression.
    Single,

    /// `__` or `__name`: one or more consecutive operands.
    Sequence,

    /// `___` or `___name`: zero or more consecutive operands.
    OptionalSequence,
}

impl WildcardKind {
    /// The minimum number of operands this kind of wildcard consumes.
    pub fn min_len(self) -> usize {
        match self {
            Self::Single | Self::Sequence => 1,
            Self::OptionalSequence => 0,
        }
    }
}

/// A wildcard symbol in a pattern.
///
/// The key of a wildcard is the full symbol name, underscores included, and is the key its
/// binding is recorded under. Unnamed wildcards (`_`, `__`, `___`) match without recording a
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wildcard<'a> {
    pub kind: WildcardKind,
    pub key: &'a str,
}

impl<'a> Wildcard<'a> {
    /// Parses a symbol name as a wildcard. Returns [`None`] if the name does not start with one
    /// to three underscores.
    pub fn parse(name: &'a str) -> Option<Self> {
        let kind = match underscores(name) {
            1 => WildcardKind::Single,
            2 => WildcardKind::Sequence,
            3 => WildcardKind::OptionalSequence,
            _ => return None,
        };
        Some(Self { kind, key: name })
    }

    /// If the expression is a wildcard symbol, returns the wildcard.
    pub fn of(expr: &'a Expr) -> Option<Self> {
        expr.as_symbol().and_then(Self::parse)
    }

    /// The name of the wildcard, without its underscores.
    pub fn name(&self) -> &'a str {
        self.key.trim_start_matches('_')
    }

    /// Returns true if matches of this wildcard are recorded in the substitution.
    pub fn is_named(&self) -> bool {
        !self.name().is_empty()
    }

    /// Returns true if the wildcard can match a run of operands instead of a single one.
    pub fn is_sequence(&self) -> bool {
        self.kind != WildcardKind::Single
    }
}

/// Returns the number of leading underscores of a symbol name.
fn underscores(name: &str) -> usize {
    name.chars().take_while(|&c| c == '_').count()
}

/// Returns true if the symbol name looks like a wildcard, but has too many underscores to be one
/// (`____x`).
pub(crate) fn is_malformed(name: &str) -> bool {
    underscores(name) > 3
}

/// Returns the keys of every named wildcard in the expression, in order of first appearance.
pub(crate) fn named_wildcards(expr: &Expr) -> Vec<&str> {
    let mut keys = Vec::new();
    for node in expr.post_order_iter() {
        if let Some(wildcard) = Wildcard::of(node).filter(Wildcard::is_named) {
            if !keys.contains(&wildcard.key) {
                keys.push(wildcard.key);
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse() {
        assert_eq!(Wildcard::parse("_x"), Some(Wildcard { kind: WildcardKind::Single, key: "_x" }));
        assert_eq!(Wildcard::parse("__").map(|w| w.kind), Some(WildcardKind::Sequence));
        assert_eq!(Wildcard::parse("___rest").map(|w| w.name()), Some("rest"));
        assert_eq!(Wildcard::parse("x"), None);
        assert_eq!(Wildcard::parse("____x"), None);
        assert!(is_malformed("____x"));
        assert!(!Wildcard::parse("_").unwrap().is_named());
    }

    #[test]
    fn collect_named() {
        let pattern = Expr::raw(Operator::Add, vec![
            Expr::symbol("_a"),
            Expr::raw(Operator::Multiply, vec![Expr::symbol("_"), Expr::symbol("_a")]),
            Expr::symbol("___rest"),
        ]);
        assert_eq!(named_wildcards(&pattern), vec!["_a", "___rest"]);
    }
}
