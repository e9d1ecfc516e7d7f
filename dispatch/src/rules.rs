//! Conditional business rules over resolved target values.
//!
//! A [`ConditionalRule`] gates a structural constraint behind an optional
//! boolean [`Condition`] and an optional deployment-scope restriction.
//! Rules are evaluated independently, in declaration order, fail-fast:
//!
//! 1. Scope check — a rule restricted to scopes the caller is not in is
//!    skipped entirely.
//! 2. Condition check — a present-but-false gating expression skips the
//!    rule.
//! 3. Target resolution — the target path (wildcards allowed) is expanded
//!    against the parameter value; zero matches is itself a violation.
//! 4. Constraint check — every resolved value is checked independently;
//!    the first failure aborts the whole evaluation.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use command_gate_core::{Path, TraversalError, Value, resolve_all, resolve_value};

/// A deployment/console scope restricting where a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope(String);

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Scope(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        Scope::new(name)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Boolean gating expression over the parameter value.
///
/// The leaf form tests one field (in path notation, case-folded matching)
/// for equality; `And`/`Or` compose sub-expressions. A field that does not
/// resolve evaluates to not-equal.
///
/// # Examples
///
/// ```
/// use command_gate_core::Value;
/// use command_gate_dispatch::Condition;
///
/// let cond = Condition::or([
///     Condition::equals("type", "block"),
///     Condition::and([
///         Condition::equals("type", "local"),
///         Condition::equals("attached", true),
///     ]),
/// ]);
///
/// let params = Value::record([
///     ("Type", Value::from("local")),
///     ("Attached", Value::from(true)),
/// ]);
/// assert!(cond.evaluate(&params));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field at `field` equals `value`.
    Equals { field: String, value: Value },
    /// Every sub-condition holds.
    And(Vec<Condition>),
    /// At least one sub-condition holds.
    Or(Vec<Condition>),
}

impl Condition {
    /// Leaf equality test.
    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Condition::Equals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Conjunction of sub-conditions.
    pub fn and<I: IntoIterator<Item = Condition>>(conditions: I) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    /// Disjunction of sub-conditions.
    pub fn or<I: IntoIterator<Item = Condition>>(conditions: I) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    /// Evaluates the expression against a parameter value.
    pub fn evaluate(&self, params: &Value) -> bool {
        match self {
            Condition::Equals { field, value } => Path::parse(field)
                .ok()
                .and_then(|path| resolve_value(params, &path).ok())
                .is_some_and(|resolved| resolved == value),
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(params)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.evaluate(params)),
        }
    }
}

/// Structural constraints applied to every resolved target value.
///
/// Numeric bounds apply to int-kinded values only; enumerated membership
/// and pattern matching apply to strings. Values of other kinds pass
/// unchecked. The `editable` flag is carried metadata for documentation
/// surfaces and is not evaluated here.
#[derive(Debug, Clone, Default)]
pub struct RuleConstraint {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub equal: Option<i64>,
    /// Allowed values; entries match literally, or as an anchored regex
    /// when the entry compiles as one.
    pub one_of: Vec<String>,
    pub pattern: Option<Regex>,
    pub editable: bool,
}

impl RuleConstraint {
    pub fn new() -> Self {
        RuleConstraint::default()
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_equal(mut self, equal: i64) -> Self {
        self.equal = Some(equal);
        self
    }

    pub fn with_one_of<S: Into<String>, I: IntoIterator<Item = S>>(mut self, allowed: I) -> Self {
        self.one_of = allowed.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    fn check(&self, value: &Value, target: &str) -> Result<(), RuleError> {
        if let Value::Int(n) = value {
            if let Some(min) = self.min {
                if *n < min {
                    return Err(constraint_error(target, format!("min={min}"), format!("{n} is below the minimum")));
                }
            }
            if let Some(max) = self.max {
                if *n > max {
                    return Err(constraint_error(target, format!("max={max}"), format!("{n} is above the maximum")));
                }
            }
            if let Some(equal) = self.equal {
                if *n != equal {
                    return Err(constraint_error(target, format!("equal={equal}"), format!("{n} differs from the required value")));
                }
            }
        }
        if !self.one_of.is_empty() {
            let rendered = match value {
                Value::Str(s) => Some(s.clone()),
                Value::Int(n) => Some(n.to_string()),
                _ => None,
            };
            if let Some(rendered) = rendered {
                let allowed = self.one_of.iter().any(|entry| {
                    entry == &rendered
                        || (matches!(value, Value::Str(_))
                            && Regex::new(&format!("^(?:{entry})$"))
                                .map(|re| re.is_match(&rendered))
                                .unwrap_or(false))
                });
                if !allowed {
                    return Err(constraint_error(
                        target,
                        format!("oneof={}", self.one_of.join(" ")),
                        format!("{rendered:?} is not an allowed value"),
                    ));
                }
            }
        }
        if let (Some(pattern), Value::Str(s)) = (&self.pattern, value) {
            if !pattern.is_match(s) {
                return Err(constraint_error(
                    target,
                    format!("pattern={}", pattern.as_str()),
                    format!("{s:?} does not match"),
                ));
            }
        }
        Ok(())
    }
}

fn constraint_error(target: &str, constraint: String, detail: String) -> RuleError {
    RuleError::Constraint {
        target: target.to_string(),
        constraint,
        detail,
    }
}

/// One gated business constraint over a resolved target set.
#[derive(Debug, Clone)]
pub struct ConditionalRule {
    /// Gating expression; absent means the rule always applies.
    pub condition: Option<Condition>,
    /// Target path, possibly with wildcards.
    pub target: Path,
    pub constraint: RuleConstraint,
    /// Scopes this rule applies in; empty means every scope.
    pub scopes: Vec<Scope>,
}

impl ConditionalRule {
    pub fn new(target: Path, constraint: RuleConstraint) -> Self {
        ConditionalRule {
            condition: None,
            target,
            constraint,
            scopes: Vec::new(),
        }
    }

    /// Gates the rule behind a condition.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Restricts the rule to the given scopes.
    pub fn in_scopes<S: Into<Scope>, I: IntoIterator<Item = S>>(mut self, scopes: I) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// Business rule violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// The target path resolved to no values.
    #[error("no value found at \"{target}\": field not found")]
    TargetNotFound { target: String },

    /// The target path failed structural resolution.
    #[error("failed to resolve rule target \"{target}\": {source}")]
    Resolve {
        target: String,
        #[source]
        source: TraversalError,
    },

    /// A resolved value violated a constraint.
    #[error("value at \"{target}\" violates {constraint}: {detail}")]
    Constraint {
        target: String,
        constraint: String,
        detail: String,
    },
}

/// Evaluates rules in declaration order against a parameter value.
///
/// `active_scope` is the caller's deployment scope; `None` means the
/// caller has no scope, in which case scope-restricted rules are skipped.
/// The first failing rule aborts evaluation.
pub fn evaluate_rules(
    rules: &[ConditionalRule],
    params: &Value,
    active_scope: Option<&Scope>,
) -> Result<(), RuleError> {
    for rule in rules {
        if !rule.scopes.is_empty() {
            match active_scope {
                Some(scope) if rule.scopes.contains(scope) => {}
                _ => {
                    debug!(rule = %rule.target, "rule skipped: out of scope");
                    continue;
                }
            }
        }
        if let Some(condition) = &rule.condition {
            if !condition.evaluate(params) {
                debug!(rule = %rule.target, "rule skipped: condition is false");
                continue;
            }
        }
        let target = rule.target.to_string();
        let values = match resolve_all(params, &rule.target) {
            Ok(values) => values,
            Err(TraversalError::FieldNotFound { .. }) => {
                return Err(RuleError::TargetNotFound { target });
            }
            Err(source) => return Err(RuleError::Resolve { target, source }),
        };
        if values.is_empty() {
            return Err(RuleError::TargetNotFound { target });
        }
        for value in values {
            rule.constraint.check(value, &target)?;
        }
    }
    Ok(())
}
