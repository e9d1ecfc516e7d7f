//! Dynamic value graphs and path-notation resolution.
//!
//! This crate is the structural substrate of the command-gate workspace.
//! It models nested data (records, sequences, typed-key maps, optionals)
//! as a dynamic [`Value`] graph and addresses locations inside it with a
//! declarative, dot-separated [`Path`] notation:
//!
//! - [`resolve_value`] — read one value at a non-wildcard path.
//! - [`write_value`] — write a string-converted leaf, auto-growing
//!   sequences on out-of-range indices.
//! - [`resolve_all`] — expand `{index}`/`{key}` wildcard segments and
//!   return every reachable value.
//!
//! Traversal failures are reported as [`TraversalError`]s carrying the
//! consumed path prefix; string-to-typed failures as [`ConversionError`]s
//! carrying the source string and target type.
//!
//! # Example
//!
//! ```
//! use command_gate_core::{Path, Value, resolve_all, resolve_value};
//!
//! let server = Value::record([
//!     ("Name", Value::from("web-1")),
//!     (
//!         "Volumes",
//!         Value::seq([
//!             Value::record([("Size", Value::from(20))]),
//!             Value::record([("Size", Value::from(40))]),
//!         ]),
//!     ),
//! ]);
//!
//! let name = resolve_value(&server, &Path::parse("name")?)?;
//! assert_eq!(name.as_str(), Some("web-1"));
//!
//! let sizes = resolve_all(&server, &Path::parse("volumes.{index}.size")?)?;
//! let sizes: Vec<i64> = sizes.iter().filter_map(|v| v.as_int()).collect();
//! assert_eq!(sizes, [20, 40]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod error;
mod path;
mod resolve;
mod value;
mod wildcard;

pub use convert::{ConversionError, parse_key, parse_leaf};
pub use error::{Result, TraversalError};
pub use path::{INDEX_WILDCARD, KEY_WILDCARD, Path, PathError, Segment};
pub use resolve::{resolve_value, write_value};
pub use value::{KeyKind, Kind, Value};
pub use wildcard::resolve_all;
