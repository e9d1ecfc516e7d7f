//! Tag-validator boundary and the standard tag interpreter.
//!
//! The carrier synthesizer produces a tag string per field (e.g.
//! `required,ipv4`) but does not interpret it; interpretation is the
//! [`TagValidator`] boundary. [`StandardTagValidator`] understands the
//! fragments emitted by the shipped validators. Callers wired to a
//! different tag library implement the trait themselves.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use command_gate_core::Value;

use crate::carrier::{Carrier, CarrierField};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex must compile")
});
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("static regex must compile")
});

/// One failed tag constraint on one carrier field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagViolation {
    /// Carrier field name (parameter path).
    pub field: String,
    /// The tag fragment that failed (e.g. `ipv4`, `min=2`).
    pub fragment: String,
    /// Human-readable failure detail.
    pub message: String,
}

/// Interprets carrier tag strings against carrier values.
pub trait TagValidator: Send + Sync {
    /// Returns every violated constraint; an empty vec means the carrier
    /// passed.
    fn validate(&self, carrier: &Carrier) -> Vec<TagViolation>;
}

/// Interpreter for the tag fragments emitted by the shipped validators:
/// `required`, `email`, `ipv4`, `url`, `oneof=`, `min=`, `max=`, and
/// `matches=`.
///
/// Unknown fragments are ignored (with a debug breadcrumb) so carriers
/// built from foreign validator vocabularies do not fail spuriously.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTagValidator;

impl TagValidator for StandardTagValidator {
    fn validate(&self, carrier: &Carrier) -> Vec<TagViolation> {
        let mut violations = Vec::new();
        for field in carrier.fields() {
            for fragment in field.tag.split(',').filter(|f| !f.is_empty()) {
                if let Some(violation) = check_fragment(field, fragment) {
                    violations.push(violation);
                }
            }
        }
        violations
    }
}

fn violation(field: &CarrierField, fragment: &str, message: impl Into<String>) -> TagViolation {
    TagViolation {
        field: field.name.clone(),
        fragment: fragment.to_string(),
        message: message.into(),
    }
}

/// Whether a value counts as provided for `required`. Nil and the empty
/// string are both treated as missing, matching zero-value semantics.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Str(s) => !s.is_empty(),
        _ => true,
    }
}

fn check_fragment(field: &CarrierField, fragment: &str) -> Option<TagViolation> {
    let (name, arg) = match fragment.split_once('=') {
        Some((name, arg)) => (name, Some(arg)),
        None => (fragment, None),
    };
    match name {
        "required" => {
            if field.values.iter().any(is_present) {
                None
            } else {
                Some(violation(field, fragment, "required parameter is missing"))
            }
        }
        "email" => check_strings(field, fragment, |s| EMAIL_RE.is_match(s), "not a valid email address"),
        "ipv4" => check_strings(
            field,
            fragment,
            |s| s.parse::<Ipv4Addr>().is_ok(),
            "not a valid IPv4 address",
        ),
        "url" => check_strings(field, fragment, |s| URL_RE.is_match(s), "not a valid URL"),
        "oneof" => {
            let allowed: Vec<&str> = arg.unwrap_or("").split(' ').filter(|a| !a.is_empty()).collect();
            for value in &field.values {
                let rendered = match value {
                    Value::Str(s) => s.clone(),
                    Value::Int(i) => i.to_string(),
                    _ => continue,
                };
                if !allowed.contains(&rendered.as_str()) {
                    return Some(violation(
                        field,
                        fragment,
                        format!("{rendered:?} is not one of: {}", allowed.join(", ")),
                    ));
                }
            }
            None
        }
        "min" | "max" => {
            let Some(bound) = arg.and_then(|a| a.parse::<i64>().ok()) else {
                return Some(violation(field, fragment, "malformed numeric bound"));
            };
            for value in &field.values {
                let measured = match value {
                    Value::Int(i) => *i,
                    Value::Str(s) => s.chars().count() as i64,
                    _ => continue,
                };
                let ok = if name == "min" { measured >= bound } else { measured <= bound };
                if !ok {
                    return Some(violation(
                        field,
                        fragment,
                        format!("{measured} is out of bounds ({fragment})"),
                    ));
                }
            }
            None
        }
        "matches" => {
            let Some(pattern) = arg else {
                return Some(violation(field, fragment, "missing pattern"));
            };
            let Ok(re) = Regex::new(pattern) else {
                return Some(violation(field, fragment, "invalid pattern"));
            };
            check_strings(field, fragment, |s| re.is_match(s), "does not match the pattern")
        }
        other => {
            debug!(fragment = other, field = %field.name, "unknown tag fragment ignored");
            None
        }
    }
}

fn check_strings(
    field: &CarrierField,
    fragment: &str,
    pred: impl Fn(&str) -> bool,
    detail: &str,
) -> Option<TagViolation> {
    for value in &field.values {
        if let Value::Str(s) = value {
            if !s.is_empty() && !pred(s) {
                return Some(violation(field, fragment, format!("{s:?} {detail}")));
            }
        }
    }
    None
}
