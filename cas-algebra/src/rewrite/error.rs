//! Errors reported when compiling a rule set.

use ariadne::{Fmt, Label, Report, ReportKind};
use cas_error::{ErrorKind, EXPR};
use std::ops::Range;

/// Builds a report with one label per span, the first of which carries the label text.
fn report<'a>(
    src_id: &'a str,
    spans: &[Range<usize>],
    message: String,
    label: &str,
    help: Option<String>,
) -> Report<(&'a str, Range<usize>)> {
    let start = spans.first().map_or(0, |span| span.start);
    let mut builder = Report::build(ReportKind::Error, src_id, start)
        .with_message(message)
        .with_labels(spans.iter().enumerate().map(|(i, span)| {
            let label_text = if i == 0 { label } else { "" };
            let label = Label::new((src_id, span.clone())).with_color(EXPR);
            if label_text.is_empty() {
                label
            } else {
                label.with_message(label_text)
            }
        }));

    if let Some(help) = help {
        builder.set_help(help);
    }
    builder.finish()
}

/// The right-hand side of a rule uses a wildcard that the left-hand side never binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundWildcard {
    /// The key of the wildcard, such as `_y`.
    pub key: String,
}

impl ErrorKind for UnboundWildcard {
    fn message(&self) -> String {
        format!("the wildcard `{}` is not bound by the left-hand side of the rule", self.key)
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        report(
            src_id,
            spans,
            self.message(),
            "this wildcard has no value",
            Some(format!("add {} to the pattern, or remove it from the replacement", (&self.key).fg(EXPR))),
        )
    }
}

/// A symbol starts with more underscores than any kind of wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWildcard {
    /// The full symbol name.
    pub name: String,
}

impl ErrorKind for UnknownWildcard {
    fn message(&self) -> String {
        format!("`{}` is not a valid wildcard", self.name)
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        report(
            src_id,
            spans,
            self.message(),
            "too many underscores",
            Some("wildcards start with `_` (one expression), `__` (one or more) or `___` (zero or more)".to_string()),
        )
    }
}

/// The left-hand side of a rule can never match anything the rewriter visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRulePattern {
    /// What is wrong with the pattern.
    pub reason: &'static str,
}

impl ErrorKind for InvalidRulePattern {
    fn message(&self) -> String {
        format!("invalid rule pattern: {}", self.reason)
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        report(src_id, spans, self.message(), "this pattern", None)
    }
}
