//! Declarative parameter validation, conditional rules, and command
//! dispatch.
//!
//! This crate turns the structural substrate of [`command_gate_core`] into
//! a command pipeline:
//!
//! - [`ParamSpec`] + [`Validator`] — declarative parameter descriptions,
//!   independent of the concrete parameter shape.
//! - [`Carrier`] — a validation schema synthesized at runtime from the
//!   specs and the concrete parameter value, interpreted through the
//!   [`TagValidator`] boundary.
//! - [`ConditionalRule`] + [`Condition`] — gated business constraints over
//!   path-resolved target values, with optional scope restriction.
//! - [`Registry`] + [`Command`] — a concurrency-safe catalogue of named
//!   operations, each run through a fixed validation pipeline before its
//!   execution function.
//!
//! # Example
//!
//! ```
//! use command_gate_core::Value;
//! use command_gate_dispatch::{Client, Command, Ipv4, ParamSpec, Registry};
//!
//! struct Anonymous;
//! impl Client for Anonymous {}
//!
//! let registry = Registry::new();
//! registry.register(
//!     Command::new("gateway", "create")
//!         .with_short_doc("Create a gateway")
//!         .with_param(ParamSpec::required("ip").with_validator(Ipv4))
//!         .with_exec(|_cmd, _client, params| Ok(params)),
//! )?;
//!
//! let params = Value::record([("Ip", Value::from("203.0.113.7"))]);
//! let result = registry.dispatch("gateway", None, "create", &Anonymous, params)?;
//! assert_eq!(result.field("ip").and_then(Value::as_str), Some("203.0.113.7"));
//! # Ok::<(), command_gate_dispatch::CommandError>(())
//! ```

mod carrier;
mod command;
mod error;
mod registry;
mod rules;
mod spec;
mod tags;

pub use carrier::{Carrier, CarrierField};
pub use command::{Client, Command, CommandKey, ExecFn, HookFn};
pub use error::{CommandError, ValidationError};
pub use registry::Registry;
pub use rules::{Condition, ConditionalRule, RuleConstraint, RuleError, Scope, evaluate_rules};
pub use spec::{Email, Ipv4, Matches, Max, Min, OneOf, ParamSpec, Url, Validator};
pub use tags::{StandardTagValidator, TagValidator, TagViolation};
