//! Multi-value (wildcard) path resolution.
//!
//! Expands `{index}` and `{key}` wildcard segments depth-first, left to
//! right, returning every reachable value in order. Concrete segments
//! behave exactly as in single-value resolution. Failure at any branch
//! aborts the entire resolution; partial results are never returned.

use crate::convert::{ConversionError, parse_key};
use crate::error::{Result, TraversalError};
use crate::path::{Path, Segment};
use crate::value::{KeyKind, Value};

/// Resolves a path that may contain wildcard segments, returning all
/// matching values.
///
/// Sequence wildcards expand in position order; map wildcards expand in
/// canonical key order, which is deterministic for a given map. A path
/// with no wildcards yields exactly one value.
///
/// # Examples
///
/// ```
/// use command_gate_core::{Path, Value, resolve_all};
///
/// let obj = Value::record([(
///     "List",
///     Value::seq([
///         Value::str_map([("foo", Value::record([("Value", Value::from("a1"))]))]),
///         Value::str_map([("foo", Value::record([("Value", Value::from("a2"))]))]),
///     ]),
/// )]);
///
/// let path = Path::parse("list.{index}.{key}.value")?;
/// let values = resolve_all(&obj, &path)?;
/// assert_eq!(values.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn resolve_all<'a>(root: &'a Value, path: &Path) -> Result<Vec<&'a Value>> {
    let mut out = Vec::new();
    let mut consumed: Vec<String> = Vec::new();
    collect(root, path.segments(), &mut consumed, &mut out)?;
    Ok(out)
}

fn collect<'a>(
    current: &'a Value,
    segments: &[Segment],
    consumed: &mut Vec<String>,
    out: &mut Vec<&'a Value>,
) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        if current.is_null() {
            return Err(TraversalError::NilFinal {
                path: consumed.join("."),
            });
        }
        out.push(current);
        return Ok(());
    };

    if current.is_null() {
        return Err(TraversalError::NilReference {
            path: consumed.join("."),
            segment: segment.as_str().to_string(),
        });
    }

    match (segment, current) {
        (Segment::AnyIndex, Value::Seq(items)) => {
            for (index, item) in items.iter().enumerate() {
                consumed.push(index.to_string());
                collect(item, rest, consumed, out)?;
                consumed.pop();
            }
            Ok(())
        }
        (Segment::AnyKey, Value::Map { entries, .. }) => {
            for (key, entry) in entries {
                consumed.push(key.clone());
                collect(entry, rest, consumed, out)?;
                consumed.pop();
            }
            Ok(())
        }
        (Segment::Named(name), Value::Record(_)) => {
            let Some(child) = current.field(name) else {
                return Err(TraversalError::FieldNotFound {
                    path: consumed.join("."),
                    segment: name.clone(),
                });
            };
            consumed.push(name.clone());
            let result = collect(child, rest, consumed, out);
            consumed.pop();
            result
        }
        (Segment::Named(name), Value::Seq(items)) => {
            let index = name.parse::<usize>().map_err(|_| TraversalError::Conversion {
                path: consumed.join("."),
                source: ConversionError {
                    input: name.clone(),
                    target: "sequence index".to_string(),
                },
            })?;
            let Some(item) = items.get(index) else {
                return Err(TraversalError::IndexOutOfRange {
                    path: consumed.join("."),
                    index,
                    len: items.len(),
                });
            };
            consumed.push(name.clone());
            let result = collect(item, rest, consumed, out);
            consumed.pop();
            result
        }
        (Segment::Named(name), Value::Map { key_kind, entries }) => {
            let (entry, key, skipped) = lookup_key(name, rest, *key_kind, entries, consumed)?;
            consumed.push(key);
            let result = collect(entry, &rest[skipped..], consumed, out);
            consumed.pop();
            result
        }
        (segment, other) => Err(TraversalError::UnsupportedKind {
            path: consumed.join("."),
            kind: other.kind(),
            segment: segment.as_str().to_string(),
        }),
    }
}

/// Looks up a map entry for a concrete key segment, progressively
/// re-joining following named segments for non-string keys.
///
/// Keys such as `1.5` arrive split across two path segments; joining them
/// back with a dot produces the real key. A candidate that parses but
/// misses keeps extending in case a longer spelling matches, and the miss
/// is reported against the most specific parsed candidate. When no
/// candidate parses at all, the last conversion error is surfaced.
///
/// Returns the matched entry, its canonical key, and the number of extra
/// segments consumed by re-joining.
fn lookup_key<'a>(
    name: &str,
    rest: &[Segment],
    key_kind: KeyKind,
    entries: &'a std::collections::BTreeMap<String, Value>,
    consumed: &[String],
) -> Result<(&'a Value, String, usize)> {
    let mut candidate = name.to_string();
    let mut skipped = 0;
    let mut first_missing: Option<String> = None;
    let mut last_conversion: Option<ConversionError> = None;
    loop {
        match parse_key(&candidate, key_kind) {
            Ok(key) => {
                if let Some(entry) = entries.get(&key) {
                    return Ok((entry, key, skipped));
                }
                if first_missing.is_none() {
                    first_missing = Some(key);
                }
            }
            Err(source) => last_conversion = Some(source),
        }
        // String keys are taken verbatim from one segment; only typed keys
        // can be split across the dot separator.
        if key_kind == KeyKind::Str {
            break;
        }
        match rest.get(skipped) {
            Some(Segment::Named(next)) => {
                candidate.push('.');
                candidate.push_str(next);
                skipped += 1;
            }
            _ => break,
        }
    }
    match (first_missing, last_conversion) {
        (Some(key), _) => Err(TraversalError::KeyNotFound {
            path: consumed.join("."),
            key,
        }),
        (None, Some(source)) => Err(TraversalError::Conversion {
            path: consumed.join("."),
            source,
        }),
        (None, None) => Err(TraversalError::KeyNotFound {
            path: consumed.join("."),
            key: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all<'a>(v: &'a Value, path: &str) -> Result<Vec<&'a Value>> {
        resolve_all(v, &Path::parse(path).unwrap())
    }

    fn strings(values: Vec<&Value>) -> Vec<&str> {
        values.into_iter().filter_map(Value::as_str).collect()
    }

    #[test]
    fn test_index_wildcard_preserves_position_order() {
        let v = Value::record([(
            "Slice",
            Value::seq([
                Value::record([("Value", Value::from("A"))]),
                Value::record([("Value", Value::from("B"))]),
                Value::record([("Value", Value::from("C"))]),
            ]),
        )]);

        let values = read_all(&v, "slice.{index}.value").unwrap();
        assert_eq!(strings(values), ["A", "B", "C"]);
    }

    #[test]
    fn test_key_wildcard_covers_every_entry() {
        let v = Value::record([(
            "MapInt",
            Value::int_map([(7, Value::from("sept")), (42, Value::from("quarante-deux"))]),
        )]);

        let values = read_all(&v, "mapint.{key}").unwrap();
        assert_eq!(values.len(), 2);
        // Stable order for a given map.
        assert_eq!(strings(values), strings(read_all(&v, "mapint.{key}").unwrap()));
    }

    #[test]
    fn test_nested_wildcards_expand_depth_first() {
        let v = Value::record([(
            "List",
            Value::seq([
                Value::str_map([
                    ("foo", Value::record([("Value", Value::from("a1"))])),
                    ("bar", Value::record([("Value", Value::from("b1"))])),
                ]),
                Value::str_map([
                    ("foo", Value::record([("Value", Value::from("a2"))])),
                    ("bar", Value::record([("Value", Value::from("b2"))])),
                ]),
            ]),
        )]);

        let values = read_all(&v, "list.{index}.{key}.value").unwrap();
        let mut got = strings(values);
        got.sort_unstable();
        assert_eq!(got, ["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn test_concrete_segments_behave_as_single_value() {
        let v = Value::record([(
            "Slice",
            Value::seq([Value::record([("Value", Value::from("A"))])]),
        )]);

        assert_eq!(strings(read_all(&v, "slice.0.value").unwrap()), ["A"]);
        assert!(matches!(
            read_all(&v, "slice.9.value"),
            Err(TraversalError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_branch_failure_aborts_whole_resolution() {
        let v = Value::record([(
            "Slice",
            Value::seq([
                Value::record([("Value", Value::from("A"))]),
                Value::record([("Other", Value::from("B"))]),
            ]),
        )]);

        assert!(matches!(
            read_all(&v, "slice.{index}.value"),
            Err(TraversalError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_float_key_rejoins_split_segments() {
        let v = Value::record([(
            "Ratios",
            Value::float_map([(1.5, Value::record([("Value", Value::from("mid"))]))]),
        )]);

        // "1.5" arrives split into segments "1" and "5".
        let values = read_all(&v, "ratios.1.5.value").unwrap();
        assert_eq!(strings(values), ["mid"]);
    }

    #[test]
    fn test_unparseable_key_surfaces_conversion_error() {
        let v = Value::record([("Named", Value::int_map([(12, Value::from("twelve"))]))]);

        assert!(matches!(
            read_all(&v, "named.not.anint"),
            Err(TraversalError::Conversion { .. })
        ));
    }

    #[test]
    fn test_parsed_but_missing_key_surfaces_not_found() {
        let v = Value::record([(
            "MapInt",
            Value::int_map([(7, Value::record([("Value", Value::from("sept"))]))]),
        )]);

        let err = read_all(&v, "mapint.99.value").unwrap_err();
        assert!(matches!(err, TraversalError::KeyNotFound { ref key, .. } if key == "99"));
    }

    #[test]
    fn test_empty_sequence_yields_no_values() {
        let v = Value::record([("Items", Value::seq([]))]);
        assert!(read_all(&v, "items.{index}.name").unwrap().is_empty());
    }
}
