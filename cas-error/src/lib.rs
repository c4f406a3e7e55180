//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors in `cas-algebra` do not originate from typed source code. Instead, the offending value
//! (a rule rendered as `lhs -> rhs`, or a fragment of interchange JSON) is rendered to text, and
//! that text is used as the source the [`Report`] points into.

use ariadne::{Color, Report, Source};
use std::{error, fmt, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: fmt::Debug + Send + Sync {
    /// A one-line summary of the error, used by the [`fmt::Display`] implementation of [`Error`].
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of rendered source text that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The text the spans point into.
    pub source: String,

    /// The regions of the source text that this error originated from, as character offsets.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given source text, spans and kind.
    pub fn new(
        source: impl Into<String>,
        spans: Vec<Range<usize>>,
        kind: impl ErrorKind + 'static,
    ) -> Self {
        Self { source: source.into(), spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report for this error into a string, including ANSI color codes.
    pub fn render(&self, src_id: &str) -> String {
        let mut buf = Vec::new();
        let cache = (src_id, Source::from(self.source.as_str()));
        if self.build_report(src_id).write(cache, &mut buf).is_err() {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in `{}`)", self.kind.message(), self.source)
    }
}

impl error::Error for Error {}

/// A collection of errors reported together, such as every malformed rule of a rule set.
#[derive(Debug, Default)]
pub struct Errors(pub Vec<Error>);

impl Errors {
    /// Returns true if no errors were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of collected errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over the collected errors.
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    /// Adds an error to the collection.
    pub fn push(&mut self, error: Error) {
        self.0.push(error);
    }
}

impl From<Error> for Errors {
    fn from(error: Error) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl error::Error for Errors {}

/// Returns the character spans of every whole-word occurrence of `needle` in `source`.
///
/// A match is whole-word if it is not directly preceded or followed by an alphanumeric character
/// or an underscore.
pub fn spans_of(source: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    source
        .match_indices(needle)
        .filter(|(start, _)| {
            let before = source[..*start].chars().next_back();
            let after = source[start + needle.len()..].chars().next();
            !before.is_some_and(is_word) && !after.is_some_and(is_word)
        })
        .map(|(start, _)| {
            let start = source[..start].chars().count();
            start..start + needle.chars().count()
        })
        .collect()
}
