//! Declarative parameter specifications and validator capabilities.
//!
//! A [`ParamSpec`] describes one expected parameter — its name in path
//! notation, documentation, requiredness, and the validators that apply —
//! independently of the concrete parameter value's own shape. One spec
//! table can be shared loosely across similar parameter shapes: a name
//! that does not resolve against a given value is skipped, not rejected.
//!
//! A [`Validator`] is a pure metadata capability: it exposes a machine key
//! fragment used to build the carrier tag string, plus human and markdown
//! descriptions for documentation surfaces. Validators never execute
//! checks themselves; the tag string is interpreted behind the
//! [`TagValidator`](crate::TagValidator) boundary.

use std::sync::Arc;

/// A validation capability attached to a [`ParamSpec`].
///
/// Implementations only *describe* a constraint. The key fragment they
/// emit (e.g. `email`, `oneof=json yaml`) is concatenated into the
/// carrier tag string and interpreted by the tag-validator boundary.
pub trait Validator: Send + Sync {
    /// Machine key fragment for the carrier tag string.
    fn key(&self) -> String;

    /// One-line human description.
    fn description(&self) -> String;

    /// Markdown description for generated documentation.
    fn markdown_description(&self) -> String;
}

/// Value must be a well-formed email address.
#[derive(Debug, Clone, Copy)]
pub struct Email;

impl Validator for Email {
    fn key(&self) -> String {
        "email".to_string()
    }

    fn description(&self) -> String {
        "must be a valid email address".to_string()
    }

    fn markdown_description(&self) -> String {
        "Value must be a valid **email** address.".to_string()
    }
}

/// Value must be a dotted-quad IPv4 address.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4;

impl Validator for Ipv4 {
    fn key(&self) -> String {
        "ipv4".to_string()
    }

    fn description(&self) -> String {
        "must be a valid IPv4 address".to_string()
    }

    fn markdown_description(&self) -> String {
        "Value must be a valid **IPv4** address.".to_string()
    }
}

/// Value must be an absolute URL.
#[derive(Debug, Clone, Copy)]
pub struct Url;

impl Validator for Url {
    fn key(&self) -> String {
        "url".to_string()
    }

    fn description(&self) -> String {
        "must be a valid URL".to_string()
    }

    fn markdown_description(&self) -> String {
        "Value must be a valid **URL**.".to_string()
    }
}

/// Value must be one of an enumerated set.
///
/// # Examples
///
/// ```
/// use command_gate_dispatch::{OneOf, Validator};
///
/// let v = OneOf::new(["json", "yaml"]);
/// assert_eq!(v.key(), "oneof=json yaml");
/// ```
#[derive(Debug, Clone)]
pub struct OneOf {
    allowed: Vec<String>,
}

impl OneOf {
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(allowed: I) -> Self {
        OneOf {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for OneOf {
    fn key(&self) -> String {
        format!("oneof={}", self.allowed.join(" "))
    }

    fn description(&self) -> String {
        format!("must be one of: {}", self.allowed.join(", "))
    }

    fn markdown_description(&self) -> String {
        let choices = self
            .allowed
            .iter()
            .map(|a| format!("`{a}`"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Value must be one of: {choices}.")
    }
}

/// Integer values must be at least this large; string values at least
/// this long.
#[derive(Debug, Clone, Copy)]
pub struct Min(pub i64);

impl Validator for Min {
    fn key(&self) -> String {
        format!("min={}", self.0)
    }

    fn description(&self) -> String {
        format!("must be at least {}", self.0)
    }

    fn markdown_description(&self) -> String {
        format!("Value (or length, for strings) must be at least **{}**.", self.0)
    }
}

/// Integer values must be at most this large; string values at most this
/// long.
#[derive(Debug, Clone, Copy)]
pub struct Max(pub i64);

impl Validator for Max {
    fn key(&self) -> String {
        format!("max={}", self.0)
    }

    fn description(&self) -> String {
        format!("must be at most {}", self.0)
    }

    fn markdown_description(&self) -> String {
        format!("Value (or length, for strings) must be at most **{}**.", self.0)
    }
}

/// String values must match a regular expression.
#[derive(Debug, Clone)]
pub struct Matches(pub String);

impl Validator for Matches {
    fn key(&self) -> String {
        format!("matches={}", self.0)
    }

    fn description(&self) -> String {
        format!("must match the pattern {}", self.0)
    }

    fn markdown_description(&self) -> String {
        format!("Value must match the pattern `{}`.", self.0)
    }
}

/// A declarative description of one expected parameter.
///
/// The name is in path notation relative to the parameter value. For
/// list-of-record parameters, nested [`item_specs`](ParamSpec::item_specs)
/// describe the record fields; their names are expanded to
/// `<list>.{index}.<item>` during carrier synthesis.
///
/// # Examples
///
/// ```
/// use command_gate_dispatch::{Ipv4, ParamSpec};
///
/// let spec = ParamSpec::required("ip")
///     .with_description("Public address of the gateway")
///     .with_example("203.0.113.10")
///     .with_validator(Ipv4);
///
/// assert!(spec.required);
/// assert_eq!(spec.validators.len(), 1);
/// ```
#[derive(Clone)]
pub struct ParamSpec {
    /// Parameter name, in path notation.
    pub name: String,
    /// Human description for documentation.
    pub description: String,
    /// Whether the parameter must be present and non-empty.
    pub required: bool,
    /// Example value for documentation.
    pub example: Option<String>,
    /// Ordered validators applied to the parameter.
    pub validators: Vec<Arc<dyn Validator>>,
    /// Nested specs for list-of-record parameters.
    pub item_specs: Vec<ParamSpec>,
}

impl ParamSpec {
    /// Creates a required parameter spec.
    pub fn required(name: &str) -> Self {
        ParamSpec {
            name: name.to_string(),
            description: String::new(),
            required: true,
            example: None,
            validators: Vec::new(),
            item_specs: Vec::new(),
        }
    }

    /// Creates an optional parameter spec.
    pub fn optional(name: &str) -> Self {
        ParamSpec {
            required: false,
            ..ParamSpec::required(name)
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Adds an example value.
    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    /// Appends a validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Appends a nested item spec for a list-of-record parameter.
    pub fn with_item(mut self, item: ParamSpec) -> Self {
        self.item_specs.push(item);
        self
    }
}

impl std::fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field(
                "validators",
                &self.validators.iter().map(|v| v.key()).collect::<Vec<_>>(),
            )
            .field("item_specs", &self.item_specs)
            .finish_non_exhaustive()
    }
}
