//! Conversion between expressions and a JSON interchange tree.
//!
//! The tree is close to MathJSON:
//!
//! - numbers are JSON integers when they fit in an `i64`, and otherwise objects such as
//!   `{"num": "1/3"}`, `{"num": "2", "sqrt": "3"}` (which is `2√3`), `{"num": "1.5"}`,
//!   `{"num": "1.5", "im": "2.0"}` or `{"num": "NaN"}`
//! - symbols are JSON strings (`"x"`), or `{"sym": "x"}`
//! - strings are JSON strings wrapped in single quotes (`"'text'"`), or `{"str": "text"}`
//! - function applications are JSON arrays whose first item is the operator name
//!   (`["Add", "x", 1]`), or `{"fn": ["Add", "x", 1]}`
//! - dictionaries are `{"dict": {"key": value}}`
//!
//! Metadata (`latex` and `wikidata`) can only be attached to the object forms.
//!
//! ```
//! use cas_algebra::{interchange, Expr, Operator};
//! use serde_json::json;
//!
//! let expr = interchange::from_json(&json!(["Add", "x", 1, 2])).unwrap();
//! assert_eq!(expr, Expr::function(Operator::Add, vec![Expr::symbol("x"), Expr::integer(3)]));
//! ```

use crate::expr::{Expr, ExprKind, Metadata, Operator};
use crate::numeric::Number;
use crate::primitive::{complex, float, float_from_str};
use ariadne::{Fmt, Label, Report, ReportKind};
use cas_error::{Error, ErrorKind, EXPR};
use rug::{Float, Integer, Rational};
use serde_json::{Map, Value};
use std::ops::Range;
use std::str::FromStr;

/// A JSON value that cannot be decoded into an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The text is not valid JSON.
    Syntax { message: String },

    /// `true`, `false` and `null` have no expression equivalent.
    UnsupportedValue,

    /// An empty array, which has no operator.
    EmptyFunction,

    /// The first item of a function array is not an operator name.
    InvalidHead,

    /// A number object whose fields cannot be parsed.
    InvalidNumber { text: String },

    /// An empty symbol name.
    EmptySymbol,

    /// An object with none of the known keys (`num`, `sym`, `str`, `fn`, `dict`).
    UnknownObject,
}

impl ErrorKind for InterchangeError {
    fn message(&self) -> String {
        match self {
            Self::Syntax { message } => format!("invalid JSON: {}", message),
            Self::UnsupportedValue => "`true`, `false` and `null` are not expressions".to_string(),
            Self::EmptyFunction => "a function application needs an operator".to_string(),
            Self::InvalidHead => "the first item of a function application must be an operator name".to_string(),
            Self::InvalidNumber { text } => format!("`{}` is not a valid number", text),
            Self::EmptySymbol => "a symbol needs a name".to_string(),
            Self::UnknownObject => "unrecognized object form".to_string(),
        }
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let start = spans.first().map_or(0, |span| span.start);
        let mut builder = Report::build(ReportKind::Error, src_id, start)
            .with_message(self.message())
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone()))
                    .with_message("this value")
                    .with_color(EXPR)
            }));

        if let Self::UnknownObject = self {
            builder.set_help(format!(
                "an object must have one of the keys {}",
                "`num`, `sym`, `str`, `fn` or `dict`".fg(EXPR),
            ));
        }
        builder.finish()
    }
}

/// Builds an error pointing at the whole of the offending JSON value.
fn error(value: &Value, kind: InterchangeError) -> Error {
    let source = value.to_string();
    let span = 0..source.chars().count();
    Error::new(source, vec![span], kind)
}

/// Encodes an expression as a JSON tree.
pub fn to_json(expr: &Expr) -> Value {
    let Some(metadata) = expr.metadata() else {
        return to_compact(expr);
    };

    let mut object = to_object(expr);
    if let Some(latex) = &metadata.latex {
        object.insert("latex".to_string(), Value::from(latex.as_str()));
    }
    if let Some(wikidata) = &metadata.wikidata {
        object.insert("wikidata".to_string(), Value::from(wikidata.as_str()));
    }
    Value::Object(object)
}

/// Encodes the expression in the shortest form.
fn to_compact(expr: &Expr) -> Value {
    match expr.kind() {
        ExprKind::Number(n) => match small_integer(n) {
            Some(i) => Value::from(i),
            None => Value::Object(number_object(n)),
        },
        // a name in quotes would read back as a string
        ExprKind::Symbol(name) if name.starts_with('\'') || name.is_empty() => Value::Object(to_object(expr)),
        ExprKind::Symbol(name) => Value::from(name.as_str()),
        ExprKind::String(text) => Value::from(format!("'{}'", text)),
        ExprKind::Function(op, operands) => match dictionary_object(op, operands) {
            Some(dict) => Value::Object(dict),
            None => function_array(op, operands),
        },
    }
}

/// Encodes the expression in object form, which can carry metadata.
fn to_object(expr: &Expr) -> Map<String, Value> {
    let mut object = Map::new();
    match expr.kind() {
        ExprKind::Number(n) => return number_object(n),
        ExprKind::Symbol(name) => {
            object.insert("sym".to_string(), Value::from(name.as_str()));
        },
        ExprKind::String(text) => {
            object.insert("str".to_string(), Value::from(text.as_str()));
        },
        ExprKind::Function(op, operands) => {
            if let Some(dict) = dictionary_object(op, operands) {
                return dict;
            }
            object.insert("fn".to_string(), function_array(op, operands));
        },
    }
    object
}

fn function_array(op: &Operator, operands: &[Expr]) -> Value {
    let mut items = Vec::with_capacity(operands.len() + 1);
    items.push(Value::from(op.name()));
    items.extend(operands.iter().map(to_json));
    Value::Array(items)
}

/// Encodes a dictionary whose entries all have string keys as `{"dict": {...}}`.
fn dictionary_object(op: &Operator, operands: &[Expr]) -> Option<Map<String, Value>> {
    if op != &Operator::Dictionary {
        return None;
    }

    let mut entries = Map::new();
    for entry in operands {
        let (Operator::KeyValuePair, [key, value]) = entry.as_function()? else {
            return None;
        };
        entries.insert(key.as_string()?.to_string(), to_json(value));
    }

    let mut object = Map::new();
    object.insert("dict".to_string(), Value::Object(entries));
    Some(object)
}

fn small_integer(n: &Number) -> Option<i64> {
    n.as_integer()?.to_i64()
}

/// Formats a float so that it reads back as inexact.
fn decimal(f: &Float) -> String {
    let text = f.to_string();
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{}.0", text)
    }
}

fn number_object(n: &Number) -> Map<String, Value> {
    let mut object = Map::new();
    let mut insert = |key: &str, text: String| {
        object.insert(key.to_string(), Value::from(text));
    };

    match n {
        Number::Exact(e) => {
            insert("num", e.rational().to_string());
            if !e.is_rational() {
                insert("sqrt", e.radical().to_string());
            }
        },
        Number::Real(f) => insert("num", decimal(f)),
        Number::Complex(c) => {
            insert("num", decimal(c.real()));
            insert("im", decimal(c.imag()));
        },
        Number::NaN => insert("num", "NaN".to_string()),
        Number::PositiveInfinity => insert("num", "+Infinity".to_string()),
        Number::NegativeInfinity => insert("num", "-Infinity".to_string()),
        Number::ComplexInfinity => insert("num", "ComplexInfinity".to_string()),
    }
    object
}

/// Decodes a JSON tree into a canonical expression.
pub fn from_json(value: &Value) -> Result<Expr, Error> {
    decode(value, true)
}

/// Decodes a JSON tree into an expression kept exactly as written, such as a pattern.
pub fn from_json_raw(value: &Value) -> Result<Expr, Error> {
    decode(value, false)
}

/// Parses JSON text and decodes it into a canonical expression.
pub fn parse(text: &str) -> Result<Expr, Error> {
    let value = serde_json::from_str::<Value>(text).map_err(|err| {
        let span = 0..text.chars().count();
        Error::new(text, vec![span], InterchangeError::Syntax { message: err.to_string() })
    })?;
    from_json(&value)
}

fn decode(value: &Value, canonical: bool) -> Result<Expr, Error> {
    match value {
        Value::Number(n) => decode_json_number(value, n).map(Expr::number),
        Value::String(text) => decode_text(value, text),
        Value::Array(items) => decode_function(value, items, canonical),
        Value::Object(object) => decode_object(value, object, canonical),
        Value::Bool(_) | Value::Null => Err(error(value, InterchangeError::UnsupportedValue)),
    }
}

fn decode_json_number(value: &Value, n: &serde_json::Number) -> Result<Number, Error> {
    if let Some(i) = n.as_i64() {
        Ok(Number::integer(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::integer(u))
    } else if let Some(f) = n.as_f64() {
        Ok(Number::real(float(f)))
    } else {
        Err(error(value, InterchangeError::InvalidNumber { text: n.to_string() }))
    }
}

/// A quoted JSON string is a string literal; anything else is a symbol.
fn decode_text(value: &Value, text: &str) -> Result<Expr, Error> {
    if let Some(inner) = text.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        return Ok(Expr::string(inner));
    }
    if text.is_empty() {
        return Err(error(value, InterchangeError::EmptySymbol));
    }
    Ok(Expr::symbol(text))
}

fn decode_function(value: &Value, items: &[Value], canonical: bool) -> Result<Expr, Error> {
    let (head, operands) = items
        .split_first()
        .ok_or_else(|| error(value, InterchangeError::EmptyFunction))?;

    let name = head
        .as_str()
        .filter(|name| !name.is_empty() && !name.starts_with('\''))
        .ok_or_else(|| error(value, InterchangeError::InvalidHead))?;

    let operands = operands
        .iter()
        .map(|operand| decode(operand, canonical))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(build(Operator::from_name(name), operands, canonical))
}

fn build(op: Operator, operands: Vec<Expr>, canonical: bool) -> Expr {
    if canonical {
        Expr::function(op, operands)
    } else {
        Expr::raw(op, operands)
    }
}

fn decode_object(value: &Value, object: &Map<String, Value>, canonical: bool) -> Result<Expr, Error> {
    let expr = if let Some(num) = object.get("num") {
        Expr::number(decode_number_object(value, num, object.get("im"), object.get("sqrt"))?)
    } else if let Some(name) = object.get("sym") {
        match name.as_str() {
            Some(name) if !name.is_empty() => Expr::symbol(name),
            _ => return Err(error(value, InterchangeError::EmptySymbol)),
        }
    } else if let Some(text) = object.get("str") {
        match text.as_str() {
            Some(text) => Expr::string(text),
            None => return Err(error(value, InterchangeError::UnknownObject)),
        }
    } else if let Some(function) = object.get("fn") {
        match function {
            Value::Array(items) => decode_function(function, items, canonical)?,
            _ => return Err(error(value, InterchangeError::InvalidHead)),
        }
    } else if let Some(entries) = object.get("dict") {
        let Value::Object(entries) = entries else {
            return Err(error(value, InterchangeError::UnknownObject));
        };
        let entries = entries
            .iter()
            .map(|(key, entry)| {
                let entry = decode(entry, canonical)?;
                Ok(build(Operator::KeyValuePair, vec![Expr::string(key.as_str()), entry], canonical))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        build(Operator::Dictionary, entries, canonical)
    } else {
        return Err(error(value, InterchangeError::UnknownObject));
    };

    let metadata = Metadata {
        latex: object.get("latex").and_then(Value::as_str).map(str::to_string),
        wikidata: object.get("wikidata").and_then(Value::as_str).map(str::to_string),
    };
    Ok(if metadata.is_empty() { expr } else { expr.with_metadata(metadata) })
}

fn decode_number_object(
    value: &Value,
    num: &Value,
    im: Option<&Value>,
    sqrt: Option<&Value>,
) -> Result<Number, Error> {
    let invalid = |text: &str| error(value, InterchangeError::InvalidNumber { text: text.to_string() });

    let text = match num {
        Value::Number(n) if im.is_none() && sqrt.is_none() => return decode_json_number(value, n),
        Value::Number(n) => n.to_string(),
        Value::String(text) => text.clone(),
        other => return Err(invalid(&other.to_string())),
    };

    if let Some(im) = im {
        let im = match im {
            Value::Number(n) => n.to_string(),
            Value::String(text) => text.clone(),
            other => return Err(invalid(&other.to_string())),
        };
        let re = float_from_str(&text).ok_or_else(|| invalid(&text))?;
        let im = float_from_str(&im).ok_or_else(|| invalid(&im))?;
        return Ok(Number::complex(complex((re, im))));
    }

    match text.as_str() {
        "NaN" => return Ok(Number::NaN),
        "+Infinity" | "Infinity" => return Ok(Number::PositiveInfinity),
        "-Infinity" => return Ok(Number::NegativeInfinity),
        "ComplexInfinity" => return Ok(Number::ComplexInfinity),
        _ => {},
    }

    if text.contains(['.', 'e', 'E']) {
        return float_from_str(&text).map(Number::real).ok_or_else(|| invalid(&text));
    }

    let rational = Rational::from_str(&text).map_err(|_| invalid(&text))?;
    match sqrt {
        None => Ok(Number::from_rational(rational)),
        Some(radicand) => {
            let radicand = match radicand {
                Value::Number(n) => n.to_string(),
                Value::String(text) => text.clone(),
                other => return Err(invalid(&other.to_string())),
            };
            let radicand = Integer::from_str(&radicand).map_err(|_| invalid(&radicand))?;
            Ok(Number::radical(rational, radicand))
        },
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Expr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&to_json(self), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Expr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
        from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{int, rational};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(op: Operator, operands: Vec<Expr>) -> Expr {
        Expr::raw(op, operands)
    }

    #[test]
    fn encode_functions() {
        let x = Expr::symbol("x");
        let expr = raw(Operator::Add, vec![
            raw(Operator::Power, vec![x.clone(), Expr::integer(2)]),
            Expr::integer(1),
            Expr::string("note"),
        ]);
        assert_eq!(to_json(&expr), json!(["Add", ["Power", "x", 2], 1, "'note'"]));
    }

    #[test]
    fn encode_numbers() {
        assert_eq!(to_json(&Expr::rational(1, 2)), json!({"num": "1/2"}));
        assert_eq!(
            to_json(&Expr::number(Number::radical(rational(2, 1), int(3)))),
            json!({"num": "2", "sqrt": "3"}),
        );
        assert_eq!(to_json(&Expr::number(Number::NaN)), json!({"num": "NaN"}));
        assert_eq!(to_json(&Expr::number(Number::NegativeInfinity)), json!({"num": "-Infinity"}));

        let big = Integer::from(Integer::u_pow_u(2, 70));
        assert_eq!(to_json(&Expr::integer(big)), json!({"num": "1180591620717411303424"}));
    }

    #[test]
    fn encode_metadata() {
        let x = Expr::symbol("x").with_metadata(Metadata {
            latex: Some("x".to_string()),
            wikidata: None,
        });
        assert_eq!(to_json(&x), json!({"sym": "x", "latex": "x"}));

        let two = Expr::integer(2).with_metadata(Metadata {
            latex: None,
            wikidata: Some("Q200".to_string()),
        });
        assert_eq!(to_json(&two), json!({"num": "2", "wikidata": "Q200"}));
    }

    #[test]
    fn decode_canonical_and_raw() {
        let value = json!(["Add", 1, 2]);
        assert_eq!(from_json(&value).unwrap(), Expr::integer(3));
        assert_eq!(
            from_json_raw(&value).unwrap(),
            raw(Operator::Add, vec![Expr::integer(1), Expr::integer(2)]),
        );

        let pattern = from_json_raw(&json!(["Sin", "_x"])).unwrap();
        assert_eq!(pattern, raw(Operator::Sin, vec![Expr::symbol("_x")]));
    }

    #[test]
    fn decode_literals() {
        assert_eq!(from_json(&json!("'hello'")).unwrap(), Expr::string("hello"));
        assert_eq!(from_json(&json!({"str": "hello"})).unwrap(), Expr::string("hello"));
        assert_eq!(from_json(&json!({"sym": "x"})).unwrap(), Expr::symbol("x"));
        assert_eq!(from_json(&json!({"num": "3/6"})).unwrap(), Expr::rational(1, 2));
        assert_eq!(from_json(&json!({"num": "ComplexInfinity"})).unwrap(), Expr::number(Number::ComplexInfinity));
        assert_eq!(from_json(&json!(1.5)).unwrap(), Expr::number(Number::real(float(1.5))));
        assert_eq!(
            from_json(&json!({"num": "1", "sqrt": "12"})).unwrap(),
            Expr::number(Number::radical(rational(2, 1), int(3))),
        );
    }

    #[test]
    fn decode_dictionary_and_metadata() {
        let expr = from_json(&json!({"dict": {"a": 1}})).unwrap();
        assert_eq!(expr, Expr::function(Operator::Dictionary, vec![
            Expr::function(Operator::KeyValuePair, vec![Expr::string("a"), Expr::integer(1)]),
        ]));
        assert_eq!(to_json(&expr), json!({"dict": {"a": 1}}));

        let expr = from_json(&json!({"fn": ["Sin", "x"], "latex": "\\sin x"})).unwrap();
        assert_eq!(expr.metadata().and_then(|m| m.latex.as_deref()), Some("\\sin x"));
        assert_eq!(to_json(&expr), json!({"fn": ["Sin", "x"], "latex": "\\sin x"}));
    }

    #[test]
    fn malformed_values() {
        let message = |value: Value| from_json(&value).unwrap_err().kind.message();
        assert_eq!(message(json!(true)), "`true`, `false` and `null` are not expressions");
        assert_eq!(message(json!([])), "a function application needs an operator");
        assert_eq!(message(json!([1, 2])), "the first item of a function application must be an operator name");
        assert_eq!(message(json!({"num": "abc"})), "`abc` is not a valid number");
        assert_eq!(message(json!({"foo": 1})), "unrecognized object form");
        assert_eq!(message(json!(["Add", "x", null])), "`true`, `false` and `null` are not expressions");

        let err = from_json(&json!(["Add", "x", null])).unwrap_err();
        assert_eq!(err.source, "null");
        assert_eq!(err.spans, vec![0..4]);
    }

    #[test]
    fn parse_text() {
        let x = Expr::symbol("x");
        assert_eq!(
            parse(r#"["Multiply", "x", "x"]"#).unwrap(),
            Expr::function(Operator::Multiply, vec![x.clone(), x]),
        );

        let err = parse(r#"["Add", "x""#).unwrap_err();
        assert!(err.kind.message().starts_with("invalid JSON"));
    }

    #[test]
    fn round_trip() {
        let x = Expr::symbol("x");
        let expr = Expr::function(Operator::Less, vec![
            Expr::function(Operator::Multiply, vec![Expr::rational(2, 3), x.clone()]),
            Expr::function(Operator::Sqrt, vec![Expr::integer(12)]),
        ]);
        assert_eq!(from_json(&to_json(&expr)).unwrap(), expr);
    }
}
