//! Path notation for addressing values inside nested structures.
//!
//! A path is an ASCII string of dot-separated segments. A segment is either
//! a name (field name, sequence index, or map key — interpretation is
//! decided at resolution time against the concrete value) or one of the
//! reserved wildcard tokens `{index}` (every sequence element) and `{key}`
//! (every map entry).
//!
//! Paths are stateless descriptors: they do not own or reference the data
//! they address.
//!
//! # Example
//!
//! ```
//! use command_gate_core::{Path, Segment};
//!
//! let path = Path::parse("volumes.{index}.size")?;
//! assert_eq!(path.segments().len(), 3);
//! assert_eq!(path.segments()[1], Segment::AnyIndex);
//! assert_eq!(path.to_string(), "volumes.{index}.size");
//! # Ok::<(), command_gate_core::PathError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Reserved token expanding to every element of a sequence.
pub const INDEX_WILDCARD: &str = "{index}";

/// Reserved token expanding to every entry of a map.
pub const KEY_WILDCARD: &str = "{key}";

/// Errors produced when parsing a path string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path contains an empty segment (e.g. `a..b` or a trailing dot).
    #[error("path {path:?} contains an empty segment")]
    EmptySegment { path: String },
}

/// One segment of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A concrete segment: field name, sequence index, or map key.
    Named(String),
    /// The `{index}` wildcard.
    AnyIndex,
    /// The `{key}` wildcard.
    AnyKey,
}

impl Segment {
    /// The textual form of this segment in path notation.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Named(name) => name,
            Segment::AnyIndex => INDEX_WILDCARD,
            Segment::AnyKey => KEY_WILDCARD,
        }
    }

    /// Whether this segment is one of the wildcard tokens.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::AnyIndex | Segment::AnyKey)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, immutable path.
///
/// The empty string parses to the root path, which addresses the root value
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root path (no segments).
    pub fn root() -> Self {
        Path::default()
    }

    /// Parses a path from its dot-separated wire form.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_gate_core::Path;
    ///
    /// assert!(Path::parse("slice.1.value").is_ok());
    /// assert!(Path::parse("").unwrap().is_root());
    /// assert!(Path::parse("a..b").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Ok(Path::root());
        }
        let mut segments = Vec::new();
        for part in raw.split('.') {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: raw.to_string(),
                });
            }
            segments.push(match part {
                INDEX_WILDCARD => Segment::AnyIndex,
                KEY_WILDCARD => Segment::AnyKey,
                name => Segment::Named(name.to_string()),
            });
        }
        Ok(Path { segments })
    }

    /// The ordered segments of this path.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment is a wildcard.
    pub fn has_wildcards(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}
