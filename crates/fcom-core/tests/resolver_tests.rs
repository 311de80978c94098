//! Target field resolution over processor trees.
//!
//! All tests operate on `serde_json::json!` fixtures parsed into
//! processor nodes; nothing touches I/O.

use fcom_core::model::processor::parse_list;
use fcom_core::model::{ProcessorNode, TargetKey};
use fcom_core::resolver::{collect_override_targets, resolve_processors};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn nodes(value: Value) -> Vec<ProcessorNode> {
    parse_list(value.as_array().expect("fixture must be an array"))
}

fn set(target: &str) -> Value {
    json!({"set": {"source": "x", "targetField": target}})
}

fn targets(processors: &[ProcessorNode]) -> Vec<String> {
    resolve_processors(processors)
        .targets()
        .map(|t| t.as_str().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Branch union
// ---------------------------------------------------------------------------

// S1: both arms of an if setting the same field yield one target
#[test]
fn test_if_branches_setting_same_field_yield_one_target() {
    let processors = nodes(json!([
        {"if": {
            "source": "$.event.Node",
            "operator": "==",
            "value": "core",
            "processors": [set("$.event.A")],
            "else": [set("$.event.A")]
        }}
    ]));

    let targets = collect_override_targets(&processors, "Cisco::Link");
    assert_eq!(targets.len(), 1);
    assert!(targets.contains("Cisco::Link::$.event.A"));
}

// S2: switch with two cases and a default resolves all three targets
#[test]
fn test_switch_cases_and_default_all_resolve() {
    let processors = nodes(json!([
        {"switch": {
            "source": "$.trap.oid",
            "case": [
                {"match": "1.3.6.1", "then": [set("$.event.A")]},
                {"match": "1.3.6.2", "operator": "==", "then": [set("$.event.B")]}
            ],
            "default": [set("$.event.C")]
        }}
    ]));

    assert_eq!(
        targets(&processors),
        vec!["$.event.A", "$.event.B", "$.event.C"]
    );
}

// S3: a case encoded with `processors` instead of `then` is read the same way
#[test]
fn test_switch_case_processors_encoding() {
    let processors = nodes(json!([
        {"switch": {
            "source": "$.trap.oid",
            "case": [{"match": "x", "processors": [set("$.event.A")]}]
        }}
    ]));

    assert_eq!(targets(&processors), vec!["$.event.A"]);
}

// S4: when a case has both, `then` is used and `processors` ignored
#[test]
fn test_switch_case_then_takes_precedence() {
    let processors = nodes(json!([
        {"switch": {
            "source": "$.trap.oid",
            "case": [{
                "match": "x",
                "then": [set("$.event.FromThen")],
                "processors": [set("$.event.FromProcessors")]
            }]
        }}
    ]));

    assert_eq!(targets(&processors), vec!["$.event.FromThen"]);
}

// S5: nested containers are walked to any depth
#[test]
fn test_nested_containers() {
    let processors = nodes(json!([
        {"foreach": {"source": "$.trap.varbinds", "processors": [
            {"if": {"source": "$.foreach.value", "operator": "!=", "value": "",
                    "processors": [
                        {"switch": {"source": "$.foreach.key", "case": [
                            {"match": "ifIndex", "then": [set("$.event.Details.ifIndex")]}
                        ]}}
                    ]}}
        ]}}
    ]));

    let resolution = resolve_processors(&processors);
    assert_eq!(
        resolution.targets().map(TargetKey::as_str).collect::<Vec<_>>(),
        vec!["$.event.Details.ifIndex"]
    );
    assert!(resolution.top_level.is_empty());
    // the outer container is keyed as a whole
    assert_eq!(resolution.by_identity.len(), 1);
    assert!(resolution.by_identity.keys().all(|k| k.starts_with("foreach:")));
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_nodes_never_fail() {
    let processors = nodes(json!([
        null,
        42,
        {"set": "oops"},
        {"if": {"processors": "not-a-list", "else": [7, set("$.event.B")]}},
        {"switch": {"case": [null, {"match": 1}], "default": {"x": 1}}},
        {"set": {"targetField": 12}},
        {"set": {}, "copy": {}}
    ]));

    let resolution = resolve_processors(&processors);
    assert_eq!(
        resolution.targets().map(TargetKey::as_str).collect::<Vec<_>>(),
        vec!["$.event.B"]
    );
    assert!(!resolution.by_identity.is_empty());
}

#[test]
fn test_non_event_targets_are_keyed_by_identity() {
    let processors = nodes(json!([
        set("$.localmem.scratch"),
        set("$.event.Summary")
    ]));

    let resolution = resolve_processors(&processors);
    assert_eq!(resolution.all.len(), 1);
    assert_eq!(resolution.by_identity.len(), 1);
    assert!(resolution.by_identity.keys().next().unwrap().starts_with("set:"));
}

#[test]
fn test_identical_processors_share_one_identity() {
    let processors = nodes(json!([
        {"log": {"type": "info", "source": "a"}},
        {"log": {"source": "a", "type": "info"}}
    ]));

    assert_eq!(resolve_processors(&processors).by_identity.len(), 1);
}
