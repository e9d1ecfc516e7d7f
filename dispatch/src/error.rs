//! Dispatch error types.
//!
//! Stages of the dispatch pipeline fail with their own error kinds;
//! [`CommandError`] is the single value surfaced to the command caller.
//! Stage errors pass through transparently — the pipeline adds no wrapping
//! of its own.

use thiserror::Error;

use command_gate_core::TraversalError;

use crate::rules::RuleError;
use crate::tags::TagViolation;

/// A synthesized carrier failed tag validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parameter validation failed: {message}")]
pub struct ValidationError {
    /// Joined summary of every violation.
    pub message: String,
    /// The individual violations, in carrier field order.
    pub violations: Vec<TagViolation>,
}

/// Errors surfaced by command registration and dispatch.
///
/// Any non-`Ok` result from [`Command::run`](crate::Command::run) means the
/// business operation was not executed.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Structural parameter validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A conditional business rule was violated.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Structural traversal failed outside of rule evaluation.
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    /// A contract the engine relies on was broken by the integrating code.
    /// Fatal for the process configuration, not user-recoverable.
    #[error("programming error: {0}")]
    Programming(String),

    /// No registered command matches the requested key.
    #[error("command not found: {0}")]
    NotFound(String),

    /// A command with the same (namespace, resource, verb) key is already
    /// registered.
    #[error("duplicate command registration: {0}")]
    Duplicate(String),

    /// The execution function failed.
    #[error("execution failed: {0}")]
    Exec(String),
}
