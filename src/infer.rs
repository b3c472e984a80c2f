//! Element type inference for `IN` lists.
//!
//! The filter language only carries text, so `@id IN [1, 2, 3]` has to recover
//! a native element type without a schema. A list is typed only when every
//! element agrees; integers mixed with floats widen to floats.

use tracing::trace;

use crate::ast::{List, Value};
use crate::error::{DafiError, DafiResult};

/// Type detected for a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    String,
}

impl ValueKind {
    /// Classify a token: integer, then float, then boolean, else string.
    pub fn of(token: &str) -> Self {
        if token.parse::<i64>().is_ok() {
            ValueKind::Int
        } else if token.parse::<f64>().is_ok() {
            ValueKind::Float
        } else if parse_bool(token).is_some() {
            ValueKind::Bool
        } else {
            ValueKind::String
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Bool => "boolean",
            ValueKind::String => "string",
        }
    }
}

/// Boolean spellings accepted in list values.
pub fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Decide the common element type of `tokens`.
///
/// Returns `None` when the elements disagree or the list is empty.
pub fn infer_kind<S: AsRef<str>>(tokens: &[S]) -> Option<ValueKind> {
    let mut iter = tokens.iter().map(|t| ValueKind::of(t.as_ref()));
    let mut kind = iter.next()?;

    for next in iter {
        kind = match (kind, next) {
            (a, b) if a == b => a,
            (ValueKind::Int, ValueKind::Float) | (ValueKind::Float, ValueKind::Int) => {
                ValueKind::Float
            }
            _ => return None,
        };
    }

    Some(kind)
}

/// Convert trimmed tokens into a typed list, falling back to strings on disagreement.
pub fn infer_list<S: AsRef<str>>(tokens: &[S]) -> DafiResult<List> {
    let Some(kind) = infer_kind(tokens) else {
        trace!(len = tokens.len(), "mixed or empty list, keeping strings");
        return Ok(List::String(
            tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        ));
    };

    trace!(kind = kind.name(), len = tokens.len(), "inferred list type");

    let list = match kind {
        ValueKind::Int => List::Int(convert(tokens, kind, |t| t.parse().ok())?),
        ValueKind::Float => List::Float(convert(tokens, kind, |t| t.parse().ok())?),
        ValueKind::Bool => List::Bool(convert(tokens, kind, parse_bool)?),
        ValueKind::String => {
            List::String(tokens.iter().map(|t| t.as_ref().to_string()).collect())
        }
    };

    Ok(list)
}

/// Split a bracketed `IN` value on commas and infer its element type.
pub fn parse_in_value(raw: &str) -> DafiResult<Value> {
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    infer_list(&tokens).map(Value::List)
}

fn convert<S, T>(
    tokens: &[S],
    kind: ValueKind,
    parse: impl Fn(&str) -> Option<T>,
) -> DafiResult<Vec<T>>
where
    S: AsRef<str>,
{
    tokens
        .iter()
        .map(|t| {
            let t = t.as_ref();
            parse(t).ok_or_else(|| DafiError::conversion(t, kind.name()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify() {
        assert_eq!(ValueKind::of("42"), ValueKind::Int);
        assert_eq!(ValueKind::of("-7"), ValueKind::Int);
        assert_eq!(ValueKind::of("4.5"), ValueKind::Float);
        assert_eq!(ValueKind::of("true"), ValueKind::Bool);
        assert_eq!(ValueKind::of("F"), ValueKind::Bool);
        assert_eq!(ValueKind::of("yanelly"), ValueKind::String);
        assert_eq!(ValueKind::of(""), ValueKind::String);
    }

    #[test]
    fn test_int_list() {
        assert_eq!(infer_list(&["1", "2", "3"]).unwrap(), List::Int(vec![1, 2, 3]));
    }

    #[test]
    fn test_int_promoted_to_float() {
        assert_eq!(
            infer_list(&["4", "5.5", "6"]).unwrap(),
            List::Float(vec![4.0, 5.5, 6.0])
        );
        assert_eq!(
            infer_list(&["4.4", "5", "6"]).unwrap(),
            List::Float(vec![4.4, 5.0, 6.0])
        );
    }

    #[test]
    fn test_bool_list() {
        assert_eq!(
            infer_list(&["true", "false"]).unwrap(),
            List::Bool(vec![true, false])
        );
    }

    #[test]
    fn test_mismatch_falls_back_to_strings() {
        assert_eq!(
            infer_list(&["1", "2", "x"]).unwrap(),
            List::String(vec!["1".into(), "2".into(), "x".into()])
        );
        assert_eq!(
            infer_list(&["2024", "yanelly", "hernan"]).unwrap(),
            List::String(vec!["2024".into(), "yanelly".into(), "hernan".into()])
        );
    }

    #[test]
    fn test_mismatch_is_sticky_across_numeric_widening() {
        // the string in the middle must keep the whole list untyped
        assert_eq!(
            infer_list(&["1", "x", "2.5"]).unwrap(),
            List::String(vec!["1".into(), "x".into(), "2.5".into()])
        );
    }

    #[test]
    fn test_empty_list() {
        let empty: [&str; 0] = [];
        assert_eq!(infer_list(&empty).unwrap(), List::String(vec![]));
    }

    #[test]
    fn test_parse_in_value_trims() {
        assert_eq!(
            parse_in_value("1, 2 ,3").unwrap(),
            Value::List(List::Int(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_conversion_failure_propagates() {
        let err = convert(&["1", "x"], ValueKind::Int, |t| t.parse::<i64>().ok()).unwrap_err();
        assert!(matches!(
            err,
            DafiError::TypeConversion { ref value, expected: "integer" } if value == "x"
        ));
    }
}
