//! Traversal error types.
//!
//! Every variant carries the path prefix consumed before the failure, so a
//! deep traversal error names where in the graph it happened rather than
//! just what went wrong.

use thiserror::Error;

use crate::convert::ConversionError;
use crate::value::Kind;

/// Errors produced while resolving a path against a value graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraversalError {
    /// No record field matches the segment under structural name matching.
    #[error("field not found: no field matches {segment:?} at \"{path}\"")]
    FieldNotFound { path: String, segment: String },

    /// A concrete sequence index is past the end (read side only; writes
    /// auto-grow instead).
    #[error("index {index} out of range at \"{path}\" (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// The key converted cleanly but no entry carries it.
    #[error("key {key:?} not found at \"{path}\"")]
    KeyNotFound { path: String, key: String },

    /// A nil reference was hit before the final segment.
    #[error("nil reference at \"{path}\" while resolving segment {segment:?}")]
    NilReference { path: String, segment: String },

    /// The fully resolved final value is a nil reference.
    #[error("final value at \"{path}\" is a nil reference")]
    NilFinal { path: String },

    /// The current value's kind cannot be traversed with this segment.
    #[error("cannot traverse {kind} value at \"{path}\" with segment {segment:?}")]
    UnsupportedKind {
        path: String,
        kind: Kind,
        segment: String,
    },

    /// A wildcard segment reached a single-value operation.
    #[error("wildcard segment {segment:?} at \"{path}\" requires multi-value resolution")]
    WildcardSegment { path: String, segment: String },

    /// A segment or leaf string failed typed conversion.
    #[error("conversion failed at \"{path}\": {source}")]
    Conversion {
        path: String,
        #[source]
        source: ConversionError,
    },
}

/// Convenience alias for results with [`TraversalError`].
pub type Result<T> = std::result::Result<T, TraversalError>;
