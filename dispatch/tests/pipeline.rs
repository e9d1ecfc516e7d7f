//! End-to-end dispatch pipeline scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use command_gate_core::{Path, Value, resolve_all, resolve_value, write_value};
use command_gate_dispatch::{
    Client, Command, CommandError, Condition, ConditionalRule, Ipv4, Min, OneOf, ParamSpec,
    Registry, RuleConstraint, Scope,
};

struct ConsoleClient {
    scope: Option<&'static str>,
}

impl Client for ConsoleClient {
    fn current_scope(&self) -> Option<Scope> {
        self.scope.map(Scope::new)
    }
}

fn sample_graph() -> Value {
    Value::record([
        (
            "Slice",
            Value::seq([
                Value::record([("Value", Value::from("A"))]),
                Value::record([("Value", Value::from("B"))]),
            ]),
        ),
        (
            "MapInt",
            Value::int_map([
                (7, Value::record([("Value", Value::from("sept"))])),
                (42, Value::record([("Value", Value::from("quarante-deux"))])),
            ]),
        ),
        (
            "List",
            Value::seq([
                Value::str_map([
                    ("foo", Value::record([("Value", Value::from("a1"))])),
                    ("bar", Value::record([("Value", Value::from("b1"))])),
                ]),
                Value::str_map([
                    ("foo", Value::record([("Value", Value::from("a2"))])),
                    ("bar", Value::record([("Value", Value::from("b2"))])),
                ]),
            ]),
        ),
    ])
}

#[test]
fn read_through_slice_index() {
    let graph = sample_graph();
    let value = resolve_value(&graph, &Path::parse("slice.1.value").unwrap()).unwrap();
    assert_eq!(value.as_str(), Some("B"));
}

#[test]
fn int_keyed_map_distinguishes_conversion_from_not_found() {
    let graph = sample_graph();

    let hit = resolve_value(&graph, &Path::parse("mapint.42.value").unwrap()).unwrap();
    assert_eq!(hit.as_str(), Some("quarante-deux"));

    let conversion = resolve_value(&graph, &Path::parse("mapint.notanint.value").unwrap());
    assert!(conversion.unwrap_err().to_string().contains("convert"));

    let missing = resolve_value(&graph, &Path::parse("mapint.99.value").unwrap());
    assert!(missing.unwrap_err().to_string().contains("not found"));
}

#[test]
fn nested_wildcards_cover_every_entry() {
    let graph = sample_graph();
    let values = resolve_all(&graph, &Path::parse("list.{index}.{key}.value").unwrap()).unwrap();

    let mut got: Vec<&str> = values.iter().filter_map(|v| v.as_str()).collect();
    got.sort_unstable();
    assert_eq!(got, ["a1", "a2", "b1", "b2"]);
}

#[test]
fn write_read_round_trip_is_idempotent() {
    let mut graph = sample_graph();
    let path = Path::parse("slice.0.value").unwrap();
    let before = graph.clone();

    let current = resolve_value(&graph, &path)
        .unwrap()
        .as_str()
        .unwrap()
        .to_string();
    write_value(&mut graph, &path, &current).unwrap();

    assert_eq!(graph, before);
}

#[test]
fn auto_growth_is_write_only() {
    let mut graph = Value::record([("Ports", Value::seq([Value::from(80)]))]);
    let path = Path::parse("ports.4").unwrap();

    assert!(resolve_value(&graph, &path).is_err());
    write_value(&mut graph, &path, "8443").unwrap();
    assert_eq!(resolve_value(&graph, &path).unwrap().as_int(), Some(8443));
}

#[test]
fn invalid_ip_fails_before_execution() {
    let executed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&executed);

    let registry = Registry::new();
    registry
        .register(
            Command::new("gateway", "create")
                .with_param(
                    ParamSpec::required("ip")
                        .with_description("Gateway address")
                        .with_validator(Ipv4),
                )
                .with_exec(move |_, _, params| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(params)
                }),
        )
        .unwrap();

    let client = ConsoleClient { scope: None };
    let bad = Value::record([("Ip", Value::from("not-an-ip"))]);
    let err = registry
        .dispatch("gateway", None, "create", &client, bad)
        .unwrap_err();

    assert!(matches!(err, CommandError::Validation(_)));
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[test]
fn full_pipeline_with_hooks_rules_and_scopes() {
    let registry = Registry::new();
    registry
        .register(
            Command::new("storage", "create")
                .with_resource("volume")
                .with_short_doc("Create a volume")
                .with_param(
                    ParamSpec::required("name").with_validator(Min(2)),
                )
                .with_param(
                    ParamSpec::optional("type").with_validator(OneOf::new(["block", "local"])),
                )
                .with_pre_params_hook(|_, _, mut params| {
                    // Default the type before validation sees it.
                    if params.field("type").is_some_and(Value::is_null) {
                        if let Some(slot) = params.field_mut("type") {
                            *slot = Value::from("block");
                        }
                    }
                    Ok(params)
                })
                .with_rule(
                    ConditionalRule::new(
                        Path::parse("sizes.{index}").unwrap(),
                        RuleConstraint::new().with_min(10).with_max(500),
                    )
                    .when(Condition::equals("type", "block"))
                    .in_scopes(["public"]),
                )
                .with_exec(|_, _, params| {
                    Ok(Value::record([
                        ("Created", Value::from(true)),
                        ("Echo", params),
                    ]))
                }),
        )
        .unwrap();

    let make_params = |sizes: &[i64]| {
        Value::record([
            ("Name", Value::from("data")),
            ("Type", Value::Null),
            ("Sizes", Value::seq(sizes.iter().map(|s| Value::from(*s)))),
        ])
    };

    let public = ConsoleClient {
        scope: Some("public"),
    };
    let internal = ConsoleClient {
        scope: Some("internal"),
    };

    // In scope: the undersized volume violates the rule.
    let err = registry
        .dispatch("storage", Some("volume"), "create", &public, make_params(&[5]))
        .unwrap_err();
    assert!(matches!(err, CommandError::Rule(_)));

    // Out of scope: the same parameters pass.
    let result = registry
        .dispatch("storage", Some("volume"), "create", &internal, make_params(&[5]))
        .unwrap();
    assert_eq!(result.field("created").and_then(Value::as_bool), Some(true));

    // In scope with valid sizes: the hook-defaulted type is visible to
    // the execution function.
    let result = registry
        .dispatch("storage", Some("volume"), "create", &public, make_params(&[20, 40]))
        .unwrap();
    let echoed = result.field("echo").unwrap();
    assert_eq!(echoed.field("type").and_then(Value::as_str), Some("block"));
}

#[test]
fn false_condition_never_checks_constraints() {
    let registry = Registry::new();
    registry
        .register(
            Command::new("storage", "resize")
                .with_rule(
                    ConditionalRule::new(
                        Path::parse("size").unwrap(),
                        RuleConstraint::new().with_min(1000),
                    )
                    .when(Condition::equals("type", "premium")),
                )
                .with_exec(|_, _, params| Ok(params)),
        )
        .unwrap();

    let client = ConsoleClient { scope: None };
    let params = Value::record([
        ("Type", Value::from("standard")),
        ("Size", Value::from(10)),
    ]);

    assert!(
        registry
            .dispatch("storage", None, "resize", &client, params)
            .is_ok()
    );
}

#[test]
fn unknown_command_reports_not_found() {
    let registry = Registry::new();
    let client = ConsoleClient { scope: None };

    let err = registry
        .dispatch("nowhere", None, "noop", &client, Value::Null)
        .unwrap_err();
    assert!(matches!(err, CommandError::NotFound(_)));
}
