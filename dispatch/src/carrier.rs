//! Carrier synthesis: declarative specs to a validatable schema + value bag.
//!
//! Rust cannot fabricate a tagged struct type at runtime, so the carrier is
//! a schema descriptor instead: an ordered list of fields, each pairing a
//! parameter path with the composed tag string, plus the values resolved
//! from the concrete parameter graph. The populated carrier is handed to a
//! [`TagValidator`](crate::TagValidator) for interpretation.
//!
//! A spec whose name does not resolve against the given parameter shape is
//! skipped silently — one spec table is commonly shared across sibling
//! parameter shapes that carry overlapping but not identical fields. Each
//! skip leaves a debug breadcrumb so a typoed spec name is diagnosable.

use tracing::debug;

use command_gate_core::{Path, TraversalError, Value, resolve_all};

use crate::error::ValidationError;
use crate::spec::ParamSpec;
use crate::tags::TagValidator;

/// One synthesized carrier field: a parameter path, its composed tag
/// string, and the values resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierField {
    pub name: String,
    pub tag: String,
    pub values: Vec<Value>,
}

/// A synthesized validation carrier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Carrier {
    fields: Vec<CarrierField>,
}

/// Outcome of resolving one spec name against the parameter graph.
enum Fetch {
    /// The shape does not carry the field; the spec is skipped.
    Absent,
    /// The field is reachable; zero values means present-but-empty, which
    /// lets `required` fail.
    Values(Vec<Value>),
}

impl Carrier {
    /// Synthesizes a carrier for the given specs against a concrete
    /// parameter value.
    ///
    /// Nested item specs are expanded to `<list>.{index}.<item>` paths and
    /// resolved through the wildcard resolver, so every element of a
    /// list-of-record parameter contributes its values to one carrier
    /// field.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_gate_core::Value;
    /// use command_gate_dispatch::{Carrier, Ipv4, ParamSpec};
    ///
    /// let specs = vec![ParamSpec::required("ip").with_validator(Ipv4)];
    /// let params = Value::record([("Ip", Value::from("10.0.0.1"))]);
    ///
    /// let carrier = Carrier::synthesize(&specs, &params);
    /// assert_eq!(carrier.fields().len(), 1);
    /// assert_eq!(carrier.fields()[0].tag, "required,ipv4");
    /// ```
    pub fn synthesize(specs: &[ParamSpec], params: &Value) -> Self {
        let mut fields = Vec::new();
        for spec in specs {
            add_fields(&mut fields, spec, spec.name.clone(), params);
        }
        Carrier { fields }
    }

    /// Builds a carrier directly from fields. Mostly useful to exercise a
    /// [`TagValidator`] implementation.
    pub fn from_fields(fields: Vec<CarrierField>) -> Self {
        Carrier { fields }
    }

    /// The synthesized fields, in spec declaration order.
    pub fn fields(&self) -> &[CarrierField] {
        &self.fields
    }

    /// Validates the carrier through the given tag interpreter, wrapping
    /// any violations into a single [`ValidationError`].
    pub fn validate_with(&self, validator: &dyn TagValidator) -> Result<(), ValidationError> {
        let violations = validator.validate(self);
        if violations.is_empty() {
            return Ok(());
        }
        let message = violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ValidationError { message, violations })
    }
}

fn add_fields(fields: &mut Vec<CarrierField>, spec: &ParamSpec, full_name: String, params: &Value) {
    match fetch(&full_name, params) {
        Fetch::Absent => {
            debug!(param = %full_name, "spec does not resolve against parameter shape; skipped");
        }
        Fetch::Values(values) => {
            fields.push(CarrierField {
                name: full_name.clone(),
                tag: compose_tag(spec),
                values,
            });
        }
    }
    for item in &spec.item_specs {
        let child = format!("{full_name}.{{index}}.{}", item.name);
        add_fields(fields, item, child, params);
    }
}

/// Composes the carrier tag string: `required` first when the spec is
/// required, then every validator key fragment, comma-joined.
fn compose_tag(spec: &ParamSpec) -> String {
    let mut fragments = Vec::with_capacity(spec.validators.len() + 1);
    if spec.required {
        fragments.push("required".to_string());
    }
    fragments.extend(spec.validators.iter().map(|v| v.key()));
    fragments.join(",")
}

fn fetch(name: &str, params: &Value) -> Fetch {
    let Ok(path) = Path::parse(name) else {
        return Fetch::Absent;
    };
    match resolve_all(params, &path) {
        Ok(values) => Fetch::Values(values.into_iter().cloned().collect()),
        // Present but nil: an empty entry so `required` can fail.
        Err(TraversalError::NilFinal { .. } | TraversalError::NilReference { .. }) => {
            Fetch::Values(Vec::new())
        }
        // The shape does not carry the field at all.
        Err(_) => Fetch::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Ipv4, Min};
    use crate::tags::StandardTagValidator;

    #[test]
    fn test_unresolvable_spec_is_skipped() {
        let specs = vec![
            ParamSpec::required("name"),
            ParamSpec::required("not_a_field"),
        ];
        let params = Value::record([("Name", Value::from("web"))]);

        let carrier = Carrier::synthesize(&specs, &params);
        assert_eq!(carrier.fields().len(), 1);
        assert_eq!(carrier.fields()[0].name, "name");
    }

    #[test]
    fn test_nil_field_is_present_but_empty() {
        let specs = vec![ParamSpec::required("name")];
        let params = Value::record([("Name", Value::Null)]);

        let carrier = Carrier::synthesize(&specs, &params);
        assert_eq!(carrier.fields().len(), 1);
        assert!(carrier.fields()[0].values.is_empty());
        assert!(carrier.validate_with(&StandardTagValidator).is_err());
    }

    #[test]
    fn test_item_specs_expand_through_list_elements() {
        let specs = vec![
            ParamSpec::optional("volumes")
                .with_item(ParamSpec::required("size").with_validator(Min(10))),
        ];
        let params = Value::record([(
            "Volumes",
            Value::seq([
                Value::record([("Size", Value::from(20))]),
                Value::record([("Size", Value::from(40))]),
            ]),
        )]);

        let carrier = Carrier::synthesize(&specs, &params);
        let item = carrier
            .fields()
            .iter()
            .find(|f| f.name == "volumes.{index}.size")
            .expect("expanded item field");
        assert_eq!(item.values, vec![Value::from(20), Value::from(40)]);
        assert!(carrier.validate_with(&StandardTagValidator).is_ok());
    }

    #[test]
    fn test_item_constraint_violation_is_reported() {
        let specs = vec![
            ParamSpec::optional("volumes")
                .with_item(ParamSpec::required("size").with_validator(Min(10))),
        ];
        let params = Value::record([(
            "Volumes",
            Value::seq([Value::record([("Size", Value::from(5))])]),
        )]);

        let carrier = Carrier::synthesize(&specs, &params);
        let err = carrier.validate_with(&StandardTagValidator).unwrap_err();
        assert!(err.message.contains("volumes.{index}.size"));
    }

    #[test]
    fn test_validation_failure_names_constraint() {
        let specs = vec![ParamSpec::required("ip").with_validator(Ipv4)];
        let params = Value::record([("Ip", Value::from("not-an-ip"))]);

        let carrier = Carrier::synthesize(&specs, &params);
        let err = carrier.validate_with(&StandardTagValidator).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].fragment, "ipv4");
    }
}
