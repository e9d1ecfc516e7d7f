//! String conversions for typed map keys and leaf assignment.
//!
//! Path segments arrive as strings; map lookup and write operations convert
//! them into the typed form the destination expects. Failures carry the
//! source string and the target type for diagnosability.

use thiserror::Error;

use crate::value::{KeyKind, Kind, Value};

/// A failed string-to-typed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {input:?} into {target}")]
pub struct ConversionError {
    /// The string that failed to convert.
    pub input: String,
    /// Human-readable name of the target type.
    pub target: String,
}

impl ConversionError {
    fn new(input: &str, target: impl Into<String>) -> Self {
        ConversionError {
            input: input.to_string(),
            target: target.into(),
        }
    }
}

/// Converts a path segment into the canonical key string for a map of the
/// given key kind.
///
/// String keys pass through unchanged; numeric and boolean keys are parsed
/// and re-rendered canonically, so `"1.50"` and `"1.5"` address the same
/// float-keyed entry.
///
/// # Examples
///
/// ```
/// use command_gate_core::{KeyKind, parse_key};
///
/// assert_eq!(parse_key("42", KeyKind::Int).unwrap(), "42");
/// assert_eq!(parse_key("1.50", KeyKind::Float).unwrap(), "1.5");
/// assert!(parse_key("notanint", KeyKind::Int).is_err());
/// ```
pub fn parse_key(segment: &str, kind: KeyKind) -> Result<String, ConversionError> {
    match kind {
        KeyKind::Str => Ok(segment.to_string()),
        KeyKind::Int => segment
            .parse::<i64>()
            .map(|k| k.to_string())
            .map_err(|_| ConversionError::new(segment, kind.to_string())),
        KeyKind::Float => segment
            .parse::<f64>()
            .ok()
            .filter(|k| k.is_finite())
            .map(|k| k.to_string())
            .ok_or_else(|| ConversionError::new(segment, kind.to_string())),
        KeyKind::Bool => segment
            .parse::<bool>()
            .map(|k| k.to_string())
            .map_err(|_| ConversionError::new(segment, kind.to_string())),
    }
}

/// Converts a raw string into a leaf [`Value`] of the given kind.
///
/// Only scalar kinds are valid conversion targets; the resolver rejects
/// container destinations before calling this.
pub fn parse_leaf(raw: &str, kind: Kind) -> Result<Value, ConversionError> {
    match kind {
        Kind::Str => Ok(Value::Str(raw.to_string())),
        Kind::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ConversionError::new(raw, kind.to_string())),
        Kind::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ConversionError::new(raw, kind.to_string())),
        Kind::Bool => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| ConversionError::new(raw, kind.to_string())),
        Kind::Null | Kind::Seq | Kind::Record | Kind::Map => {
            Err(ConversionError::new(raw, kind.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_int() {
        assert_eq!(parse_key("42", KeyKind::Int).unwrap(), "42");
        assert_eq!(parse_key("-3", KeyKind::Int).unwrap(), "-3");

        let err = parse_key("notanint", KeyKind::Int).unwrap_err();
        assert_eq!(err.input, "notanint");
    }

    #[test]
    fn test_parse_key_float_is_canonical() {
        assert_eq!(parse_key("1.5", KeyKind::Float).unwrap(), "1.5");
        assert_eq!(parse_key("1.50", KeyKind::Float).unwrap(), "1.5");
        assert_eq!(parse_key("1", KeyKind::Float).unwrap(), "1");
        assert!(parse_key("NaN", KeyKind::Float).is_err());
    }

    #[test]
    fn test_parse_leaf_scalars() {
        assert_eq!(parse_leaf("ok", Kind::Str).unwrap(), Value::from("ok"));
        assert_eq!(parse_leaf("12", Kind::Int).unwrap(), Value::Int(12));
        assert_eq!(parse_leaf("0.5", Kind::Float).unwrap(), Value::Float(0.5));
        assert_eq!(parse_leaf("true", Kind::Bool).unwrap(), Value::Bool(true));
        assert!(parse_leaf("twelve", Kind::Int).is_err());
        assert!(parse_leaf("x", Kind::Record).is_err());
    }
}
