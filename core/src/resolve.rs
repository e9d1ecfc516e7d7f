//! Single-value path resolution: read and write.
//!
//! Read and write share traversal semantics (field matching, index parsing,
//! typed key conversion, nil handling) but diverge deliberately at the
//! edges: reads fail on an out-of-range sequence index, while writes
//! auto-grow the sequence with nil elements up to the requested index; and
//! writes convert the raw string into the destination leaf's kind before
//! assignment.

use crate::convert::{ConversionError, parse_key, parse_leaf};
use crate::error::{Result, TraversalError};
use crate::path::{Path, Segment};
use crate::value::{Kind, Value, fold_name};

/// Resolves a non-wildcard path against a value graph and returns the
/// addressed value.
///
/// The root path returns the root value unchanged. A nil reference before
/// the final segment, or at the final segment, is an error.
///
/// # Examples
///
/// ```
/// use command_gate_core::{Path, Value, resolve_value};
///
/// let obj = Value::record([(
///     "Slice",
///     Value::seq([
///         Value::record([("Value", Value::from("A"))]),
///         Value::record([("Value", Value::from("B"))]),
///     ]),
/// )]);
///
/// let path = Path::parse("slice.1.value")?;
/// assert_eq!(resolve_value(&obj, &path)?.as_str(), Some("B"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn resolve_value<'a>(root: &'a Value, path: &Path) -> Result<&'a Value> {
    let mut current = root;
    let mut consumed: Vec<&str> = Vec::new();
    for segment in path.segments() {
        current = step(current, segment, &consumed)?;
        consumed.push(segment.as_str());
    }
    if current.is_null() {
        return Err(TraversalError::NilFinal {
            path: path.to_string(),
        });
    }
    Ok(current)
}

/// Resolves one concrete segment against the current value.
fn step<'a>(current: &'a Value, segment: &Segment, consumed: &[&str]) -> Result<&'a Value> {
    let at = consumed.join(".");
    let name = match segment {
        Segment::Named(name) => name,
        wild => {
            return Err(TraversalError::WildcardSegment {
                path: at,
                segment: wild.as_str().to_string(),
            });
        }
    };
    match current {
        Value::Null => Err(TraversalError::NilReference {
            path: at,
            segment: name.clone(),
        }),
        Value::Record(_) => current.field(name).ok_or(TraversalError::FieldNotFound {
            path: at,
            segment: name.clone(),
        }),
        Value::Seq(items) => {
            let index = parse_index(name, &at)?;
            items.get(index).ok_or(TraversalError::IndexOutOfRange {
                path: at,
                index,
                len: items.len(),
            })
        }
        Value::Map { key_kind, entries } => {
            let key = parse_key(name, *key_kind)
                .map_err(|source| TraversalError::Conversion { path: at.clone(), source })?;
            entries
                .get(&key)
                .ok_or(TraversalError::KeyNotFound { path: at, key })
        }
        other => Err(TraversalError::UnsupportedKind {
            path: at,
            kind: other.kind(),
            segment: name.clone(),
        }),
    }
}

fn parse_index(name: &str, at: &str) -> Result<usize> {
    name.parse::<usize>().map_err(|_| TraversalError::Conversion {
        path: at.to_string(),
        source: ConversionError {
            input: name.to_string(),
            target: "sequence index".to_string(),
        },
    })
}

/// Writes a raw string value at a non-wildcard path, converting it into the
/// destination leaf's kind.
///
/// Divergences from the read side:
///
/// - An out-of-range sequence index grows the sequence with nil elements up
///   to and including the requested index. A grown (or still-nil) element
///   written as the final segment adopts the kind of the sequence's
///   existing elements; with no typed sibling to imitate, the raw string is
///   stored verbatim.
/// - A nil destination at the final segment is overwritten rather than
///   rejected; only a nil hit *before* the final segment is an error.
///
/// # Examples
///
/// ```
/// use command_gate_core::{Path, Value, resolve_value, write_value};
///
/// let mut obj = Value::record([("Ports", Value::seq([Value::from(80)]))]);
///
/// write_value(&mut obj, &Path::parse("ports.2")?, "443")?;
/// assert_eq!(
///     resolve_value(&obj, &Path::parse("ports.2")?)?.as_int(),
///     Some(443),
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_value(root: &mut Value, path: &Path, raw: &str) -> Result<()> {
    let mut consumed: Vec<String> = Vec::new();
    write_at(root, path.segments(), &mut consumed, raw)
}

fn write_at(
    current: &mut Value,
    segments: &[Segment],
    consumed: &mut Vec<String>,
    raw: &str,
) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        return assign_leaf(current, raw, consumed);
    };
    let name = match segment {
        Segment::Named(name) => name.clone(),
        wild => {
            return Err(TraversalError::WildcardSegment {
                path: consumed.join("."),
                segment: wild.as_str().to_string(),
            });
        }
    };
    match current {
        Value::Null => Err(TraversalError::NilReference {
            path: consumed.join("."),
            segment: name,
        }),
        Value::Record(fields) => {
            let folded = fold_name(&name);
            let Some((_, child)) = fields.iter_mut().find(|(n, _)| fold_name(n) == folded) else {
                return Err(TraversalError::FieldNotFound {
                    path: consumed.join("."),
                    segment: name,
                });
            };
            consumed.push(name);
            write_at(child, rest, consumed, raw)
        }
        Value::Seq(items) => {
            let index = parse_index(&name, &consumed.join("."))?;
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            if rest.is_empty() && items[index].is_null() {
                // A grown slot has no kind of its own; imitate the siblings.
                if let Some(kind) = items.iter().find(|v| !v.is_null()).map(Value::kind) {
                    if matches!(kind, Kind::Bool | Kind::Int | Kind::Float | Kind::Str) {
                        items[index] =
                            parse_leaf(raw, kind).map_err(|source| TraversalError::Conversion {
                                path: consumed.join("."),
                                source,
                            })?;
                        return Ok(());
                    }
                }
            }
            consumed.push(name);
            write_at(&mut items[index], rest, consumed, raw)
        }
        Value::Map { key_kind, entries } => {
            let key = parse_key(&name, *key_kind).map_err(|source| TraversalError::Conversion {
                path: consumed.join("."),
                source,
            })?;
            let Some(child) = entries.get_mut(&key) else {
                return Err(TraversalError::KeyNotFound {
                    path: consumed.join("."),
                    key,
                });
            };
            consumed.push(name);
            write_at(child, rest, consumed, raw)
        }
        other => Err(TraversalError::UnsupportedKind {
            path: consumed.join("."),
            kind: other.kind(),
            segment: name,
        }),
    }
}

fn assign_leaf(current: &mut Value, raw: &str, consumed: &[String]) -> Result<()> {
    *current = if current.is_null() {
        // No static type to convert toward; keep the string form.
        Value::Str(raw.to_string())
    } else {
        parse_leaf(raw, current.kind()).map_err(|source| TraversalError::Conversion {
            path: consumed.join("."),
            source,
        })?
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::record([
            (
                "Slice",
                Value::seq([
                    Value::record([("Value", Value::from("A"))]),
                    Value::record([("Value", Value::from("B"))]),
                ]),
            ),
            (
                "MapInt",
                Value::int_map([
                    (7, Value::record([("Value", Value::from("sept"))])),
                    (42, Value::record([("Value", Value::from("quarante-deux"))])),
                ]),
            ),
            ("Count", Value::from(3)),
            ("Missing", Value::Null),
        ])
    }

    fn read<'a>(v: &'a Value, path: &str) -> Result<&'a Value> {
        resolve_value(v, &Path::parse(path).unwrap())
    }

    #[test]
    fn test_root_path_returns_root() {
        let v = sample();
        assert_eq!(read(&v, "").unwrap(), &v);
    }

    #[test]
    fn test_read_through_sequence_index() {
        let v = sample();
        assert_eq!(read(&v, "slice.1.value").unwrap().as_str(), Some("B"));
    }

    #[test]
    fn test_read_int_keyed_map() {
        let v = sample();

        assert_eq!(
            read(&v, "mapint.42.value").unwrap().as_str(),
            Some("quarante-deux"),
        );
        assert!(matches!(
            read(&v, "mapint.notanint.value"),
            Err(TraversalError::Conversion { .. })
        ));
        assert!(matches!(
            read(&v, "mapint.99.value"),
            Err(TraversalError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_read_reports_field_not_found() {
        let v = sample();
        let err = read(&v, "slice.0.nope").unwrap_err();

        assert!(matches!(err, TraversalError::FieldNotFound { .. }));
        assert!(err.to_string().contains("slice.0"));
    }

    #[test]
    fn test_read_out_of_range_index_fails() {
        let v = sample();
        assert!(matches!(
            read(&v, "slice.5.value"),
            Err(TraversalError::IndexOutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn test_nil_at_final_segment_fails() {
        let v = sample();
        assert!(matches!(
            read(&v, "missing"),
            Err(TraversalError::NilFinal { .. })
        ));
    }

    #[test]
    fn test_nil_before_final_segment_fails() {
        let v = sample();
        assert!(matches!(
            read(&v, "missing.value"),
            Err(TraversalError::NilReference { .. })
        ));
    }

    #[test]
    fn test_wildcard_rejected_in_single_value_read() {
        let v = sample();
        assert!(matches!(
            read(&v, "slice.{index}.value"),
            Err(TraversalError::WildcardSegment { .. })
        ));
    }

    #[test]
    fn test_write_read_round_trip_leaves_value_unchanged() {
        let mut v = sample();
        let path = Path::parse("slice.0.value").unwrap();
        let before = v.clone();

        let current = resolve_value(&v, &path).unwrap().as_str().unwrap().to_string();
        write_value(&mut v, &path, &current).unwrap();
        assert_eq!(v, before);
    }

    #[test]
    fn test_write_converts_to_destination_kind() {
        let mut v = sample();
        write_value(&mut v, &Path::parse("count").unwrap(), "12").unwrap();

        assert_eq!(read(&v, "count").unwrap().as_int(), Some(12));

        let err = write_value(&mut v, &Path::parse("count").unwrap(), "many").unwrap_err();
        assert!(matches!(err, TraversalError::Conversion { .. }));
    }

    #[test]
    fn test_write_auto_grows_sequences() {
        let mut v = Value::record([("Ports", Value::seq([Value::from(80)]))]);

        assert!(read(&v, "ports.3").is_err());
        write_value(&mut v, &Path::parse("ports.3").unwrap(), "8443").unwrap();

        assert_eq!(read(&v, "ports.3").unwrap().as_int(), Some(8443));
        let Value::Seq(items) = read(&v, "ports").unwrap() else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 4);
        assert!(items[1].is_null() && items[2].is_null());
    }

    #[test]
    fn test_write_into_grown_empty_sequence_stores_string() {
        let mut v = Value::record([("Tags", Value::seq([]))]);
        write_value(&mut v, &Path::parse("tags.0").unwrap(), "blue").unwrap();

        assert_eq!(read(&v, "tags.0").unwrap().as_str(), Some("blue"));
    }

    #[test]
    fn test_write_through_map_held_record() {
        let mut v = sample();
        write_value(&mut v, &Path::parse("mapint.7.value").unwrap(), "seven").unwrap();

        assert_eq!(read(&v, "mapint.7.value").unwrap().as_str(), Some("seven"));
    }

    #[test]
    fn test_write_overwrites_nil_final() {
        let mut v = sample();
        write_value(&mut v, &Path::parse("missing").unwrap(), "present").unwrap();

        assert_eq!(read(&v, "missing").unwrap().as_str(), Some("present"));
    }
}
