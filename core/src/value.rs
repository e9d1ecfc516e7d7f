//! Dynamic value graph for structural traversal.
//!
//! This module defines the core data model traversed by the path resolvers.
//! Rust has no runtime reflection over arbitrary structs, so the engine
//! operates on an explicit tagged representation instead:
//!
//! - [`Value::Record`] — a struct-like value with ordered, named fields.
//!   Field names are matched case-insensitively, tolerating PascalCase,
//!   snake_case, and lower-flat spellings.
//! - [`Value::Seq`] — a sequence addressed by non-negative integer index.
//! - [`Value::Map`] — a mapping with a declared key kind. Keys are stored by
//!   their canonical string rendering so iteration stays deterministic while
//!   path segments are still converted through the typed key grammar.
//! - [`Value::Null`] — the nil optional/pointer. Traversal treats any
//!   non-null value as already dereferenced and fails on `Null` per the
//!   resolver rules.
//!
//! Values round-trip to JSON through [`Value::to_json`] and ingest transport
//! payloads through [`Value::from_json`].
//!
//! # Example
//!
//! ```
//! use command_gate_core::Value;
//!
//! let server = Value::record([
//!     ("Name", Value::from("web-1")),
//!     ("Cpus", Value::from(4)),
//!     ("Tags", Value::seq([Value::from("prod"), Value::from("edge")])),
//! ]);
//!
//! assert_eq!(server.field("name").and_then(|v| v.as_str()), Some("web-1"));
//! assert_eq!(server.field("cpus").and_then(|v| v.as_int()), Some(4));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The kind of a [`Value`], used in diagnostics and conversion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Seq,
    Record,
    Map,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::Seq => "sequence",
            Kind::Record => "record",
            Kind::Map => "map",
        };
        f.write_str(name)
    }
}

/// Declared key kind of a [`Value::Map`].
///
/// Path segments addressing a map entry are parsed according to this kind
/// before lookup, so `"42"` reaches an `Int`-keyed entry while `"notanint"`
/// fails with a conversion error rather than a not-found error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum KeyKind {
    Str,
    Int,
    Float,
    Bool,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyKind::Str => "string key",
            KeyKind::Int => "int key",
            KeyKind::Float => "float key",
            KeyKind::Bool => "bool key",
        };
        f.write_str(name)
    }
}

/// A dynamically typed value graph.
///
/// See the [module documentation](self) for the modeling conventions.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Nil optional/pointer.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered sequence, addressed by integer index.
    Seq(Vec<Value>),
    /// Struct-like value with ordered named fields.
    Record(Vec<(String, Value)>),
    /// Typed-key mapping. Entries are keyed by the canonical string
    /// rendering of the typed key (e.g. `42`, `1.5`, `true`).
    Map {
        key_kind: KeyKind,
        entries: BTreeMap<String, Value>,
    },
}

impl Value {
    /// Builds a record from ordered `(name, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_gate_core::{Kind, Value};
    ///
    /// let v = Value::record([("Name", Value::from("api"))]);
    /// assert_eq!(v.kind(), Kind::Record);
    /// ```
    pub fn record<N, I>(fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Value)>,
    {
        Value::Record(fields.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    /// Builds a sequence from ordered items.
    pub fn seq<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Seq(items.into_iter().collect())
    }

    /// Builds a string-keyed map.
    pub fn str_map<N, I>(entries: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Value)>,
    {
        Value::Map {
            key_kind: KeyKind::Str,
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Builds an integer-keyed map.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_gate_core::Value;
    ///
    /// let m = Value::int_map([(7, Value::from("sept")), (42, Value::from("quarante-deux"))]);
    /// assert_eq!(m.kind(), command_gate_core::Kind::Map);
    /// ```
    pub fn int_map<I: IntoIterator<Item = (i64, Value)>>(entries: I) -> Self {
        Value::Map {
            key_kind: KeyKind::Int,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Builds a float-keyed map. Keys are stored canonically, so `1.0`
    /// and `1` address the same entry.
    pub fn float_map<I: IntoIterator<Item = (f64, Value)>>(entries: I) -> Self {
        Value::Map {
            key_kind: KeyKind::Float,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Builds a bool-keyed map.
    pub fn bool_map<I: IntoIterator<Item = (bool, Value)>>(entries: I) -> Self {
        Value::Map {
            key_kind: KeyKind::Bool,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Seq(_) => Kind::Seq,
            Value::Record(_) => Kind::Record,
            Value::Map { .. } => Kind::Map,
        }
    }

    /// Whether this value is the nil optional.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrows the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float content, if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Looks up a record field by structural name matching.
    ///
    /// Matching is case-insensitive and ignores `_`/`-` separators, so a
    /// field declared `ProductId` is found by `product_id`, `productid`,
    /// or `PRODUCTID`. Returns `None` for non-record values.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_gate_core::Value;
    ///
    /// let v = Value::record([("ProductId", Value::from(9))]);
    /// assert!(v.field("product_id").is_some());
    /// assert!(v.field("missing").is_none());
    /// ```
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => {
                let folded = fold_name(name);
                fields
                    .iter()
                    .find(|(n, _)| fold_name(n) == folded)
                    .map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Mutable variant of [`field`](Value::field).
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Value::Record(fields) => {
                let folded = fold_name(name);
                fields
                    .iter_mut()
                    .find(|(n, _)| fold_name(n) == folded)
                    .map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Converts a `serde_json::Value` into a value graph.
    ///
    /// JSON objects become [`Value::Record`]s; callers that want map
    /// semantics (typed keys, `{key}` wildcard expansion) construct those
    /// through the map builders instead.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Renders the value graph as JSON. Map keys are emitted in their
    /// canonical string form; non-finite floats degrade to JSON null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Seq(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Map { entries, .. } => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Map { entries, .. } => serializer.collect_map(entries),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Folds a field name for structural matching: ASCII-lowercased with
/// `_` and `-` separators removed.
pub(crate) fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
