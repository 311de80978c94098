//! Processor pipeline nodes.
//!
//! A processor is a JSON object with exactly one key drawn from a fixed
//! vocabulary (`{"set": {...}}`, `{"if": {...}}`, ...). Parsing here is a
//! classification, not validation: anything that fails the single-known-key
//! test becomes [`ProcessorNode::Patch`] (a JSON-Patch style operation) or
//! [`ProcessorNode::Opaque`], never an error.
//!
//! Container nodes (`if`, `foreach`, `switch`) keep their raw payload and a
//! parsed view of their child lists. Nodes are immutable once built, so the
//! two always agree.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::model::target::TargetKey;

/// The closed vocabulary of processor operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessorKind {
    Append,
    Convert,
    Copy,
    Date,
    Discard,
    Foreach,
    Grok,
    If,
    Interpolate,
    Kv,
    Length,
    Log,
    Lookup,
    Math,
    Regex,
    Remove,
    Rename,
    Replace,
    Set,
    SetOutputStream,
    Sort,
    Split,
    Strcase,
    Substr,
    Switch,
    Trim,
}

impl ProcessorKind {
    pub const ALL: [ProcessorKind; 26] = [
        ProcessorKind::Append,
        ProcessorKind::Convert,
        ProcessorKind::Copy,
        ProcessorKind::Date,
        ProcessorKind::Discard,
        ProcessorKind::Foreach,
        ProcessorKind::Grok,
        ProcessorKind::If,
        ProcessorKind::Interpolate,
        ProcessorKind::Kv,
        ProcessorKind::Length,
        ProcessorKind::Log,
        ProcessorKind::Lookup,
        ProcessorKind::Math,
        ProcessorKind::Regex,
        ProcessorKind::Remove,
        ProcessorKind::Rename,
        ProcessorKind::Replace,
        ProcessorKind::Set,
        ProcessorKind::SetOutputStream,
        ProcessorKind::Sort,
        ProcessorKind::Split,
        ProcessorKind::Strcase,
        ProcessorKind::Substr,
        ProcessorKind::Switch,
        ProcessorKind::Trim,
    ];

    /// The JSON key this kind is encoded under.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorKind::Append => "append",
            ProcessorKind::Convert => "convert",
            ProcessorKind::Copy => "copy",
            ProcessorKind::Date => "date",
            ProcessorKind::Discard => "discard",
            ProcessorKind::Foreach => "foreach",
            ProcessorKind::Grok => "grok",
            ProcessorKind::If => "if",
            ProcessorKind::Interpolate => "interpolate",
            ProcessorKind::Kv => "kv",
            ProcessorKind::Length => "length",
            ProcessorKind::Log => "log",
            ProcessorKind::Lookup => "lookup",
            ProcessorKind::Math => "math",
            ProcessorKind::Regex => "regex",
            ProcessorKind::Remove => "remove",
            ProcessorKind::Rename => "rename",
            ProcessorKind::Replace => "replace",
            ProcessorKind::Set => "set",
            ProcessorKind::SetOutputStream => "setOutputStream",
            ProcessorKind::Sort => "sort",
            ProcessorKind::Split => "split",
            ProcessorKind::Strcase => "strcase",
            ProcessorKind::Substr => "substr",
            ProcessorKind::Switch => "switch",
            ProcessorKind::Trim => "trim",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == key)
    }

    /// `if`, `foreach` and `switch` hold nested processor lists.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ProcessorKind::If | ProcessorKind::Foreach | ProcessorKind::Switch
        )
    }
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw JSON value as a processor.
///
/// Returns the kind only when `value` is an object with exactly one key and
/// that key is in the vocabulary. Extra keys, arrays and scalars all fail.
pub fn classify(value: &Value) -> Option<ProcessorKind> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.keys().next().and_then(|key| ProcessorKind::from_key(key))
}

pub fn is_processor(value: &Value) -> bool {
    classify(value).is_some()
}

/// A flat, non-container processor step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    kind: ProcessorKind,
    payload: Value,
}

impl Step {
    pub fn kind(&self) -> ProcessorKind {
        self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// `{"if": {..., "processors": [...], "else": [...]}}`
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    payload: Value,
    processors: Vec<ProcessorNode>,
    else_processors: Vec<ProcessorNode>,
}

impl IfNode {
    pub fn processors(&self) -> &[ProcessorNode] {
        &self.processors
    }

    pub fn else_processors(&self) -> &[ProcessorNode] {
        &self.else_processors
    }
}

/// `{"foreach": {..., "processors": [...]}}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForeachNode {
    payload: Value,
    processors: Vec<ProcessorNode>,
}

impl ForeachNode {
    pub fn processors(&self) -> &[ProcessorNode] {
        &self.processors
    }
}

/// Which key a switch case stored its branch under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseBranchKey {
    Then,
    Processors,
    /// Both keys were present; `then` was used.
    Both,
    Missing,
}

/// One `case` entry of a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    match_value: Option<Value>,
    operator: Option<String>,
    then: Vec<ProcessorNode>,
    branch_key: CaseBranchKey,
}

impl SwitchCase {
    fn from_value(value: &Value) -> Self {
        let map = value.as_object();
        let get = |key: &str| map.and_then(|m| m.get(key));

        let then = get("then").and_then(Value::as_array);
        let processors = get("processors").and_then(Value::as_array);
        let (branch, branch_key) = match (then, processors) {
            (Some(then), Some(_)) => (Some(then), CaseBranchKey::Both),
            (Some(then), None) => (Some(then), CaseBranchKey::Then),
            (None, Some(processors)) => (Some(processors), CaseBranchKey::Processors),
            (None, None) => (None, CaseBranchKey::Missing),
        };
        if branch_key == CaseBranchKey::Both {
            tracing::debug!(
                "switch case carries both `then` and `processors`; using `then`"
            );
        }

        SwitchCase {
            match_value: get("match").cloned(),
            operator: get("operator").and_then(Value::as_str).map(str::to_string),
            then: branch.map(|items| parse_list(items)).unwrap_or_default(),
            branch_key,
        }
    }

    pub fn match_value(&self) -> Option<&Value> {
        self.match_value.as_ref()
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn then(&self) -> &[ProcessorNode] {
        &self.then
    }

    pub fn branch_key(&self) -> CaseBranchKey {
        self.branch_key
    }
}

/// `{"switch": {..., "case": [...], "default": [...]}}`
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchNode {
    payload: Value,
    cases: Vec<SwitchCase>,
    default: Vec<ProcessorNode>,
}

impl SwitchNode {
    pub fn cases(&self) -> &[SwitchCase] {
        &self.cases
    }

    pub fn default_processors(&self) -> &[ProcessorNode] {
        &self.default
    }
}

/// Operation names accepted for a JSON-Patch style entry.
pub const PATCH_OPS: [&str; 6] = ["add", "replace", "test", "remove", "move", "copy"];

/// A JSON-Patch style operation found in a processor list.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOp {
    raw: Value,
}

impl PatchOp {
    pub fn op(&self) -> &str {
        self.raw.get("op").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.raw.get("path").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn value(&self) -> Option<&Value> {
        self.raw.get("value")
    }

    /// The event field this patch writes, if its path points under `/event/`.
    pub fn target(&self) -> Option<TargetKey> {
        TargetKey::from_json_pointer(self.path())
    }

    /// The patch value parsed as a processor, when it is one.
    pub fn processor_value(&self) -> Option<ProcessorNode> {
        self.value()
            .filter(|value| is_processor(value))
            .map(|value| ProcessorNode::from_value(value.clone()))
    }

    fn looks_like_patch(value: &Value) -> bool {
        let op = value.get("op").and_then(Value::as_str);
        op.is_some_and(|op| PATCH_OPS.contains(&op))
            && value.get("path").is_some_and(Value::is_string)
    }
}

/// One node of a processor pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorNode {
    Step(Step),
    If(IfNode),
    Foreach(ForeachNode),
    Switch(SwitchNode),
    Patch(PatchOp),
    /// Anything that is neither a processor nor a patch operation.
    Opaque(Value),
}

impl ProcessorNode {
    /// Build a node from raw JSON. Never fails.
    pub fn from_value(value: Value) -> Self {
        let Some(kind) = classify(&value) else {
            if PatchOp::looks_like_patch(&value) {
                return ProcessorNode::Patch(PatchOp { raw: value });
            }
            return ProcessorNode::Opaque(value);
        };

        let payload = match value {
            Value::Object(mut map) => map.remove(kind.as_str()).unwrap_or(Value::Null),
            other => other,
        };

        match kind {
            ProcessorKind::If => ProcessorNode::If(IfNode {
                processors: child_list(&payload, "processors"),
                else_processors: child_list(&payload, "else"),
                payload,
            }),
            ProcessorKind::Foreach => ProcessorNode::Foreach(ForeachNode {
                processors: child_list(&payload, "processors"),
                payload,
            }),
            ProcessorKind::Switch => ProcessorNode::Switch(SwitchNode {
                cases: payload
                    .get("case")
                    .and_then(Value::as_array)
                    .map(|cases| cases.iter().map(SwitchCase::from_value).collect())
                    .unwrap_or_default(),
                default: child_list(&payload, "default"),
                payload,
            }),
            kind => ProcessorNode::Step(Step { kind, payload }),
        }
    }

    /// Reconstruct the JSON this node was parsed from.
    pub fn to_value(&self) -> Value {
        match self {
            ProcessorNode::Step(step) => wrap(step.kind, &step.payload),
            ProcessorNode::If(node) => wrap(ProcessorKind::If, &node.payload),
            ProcessorNode::Foreach(node) => wrap(ProcessorKind::Foreach, &node.payload),
            ProcessorNode::Switch(node) => wrap(ProcessorKind::Switch, &node.payload),
            ProcessorNode::Patch(patch) => patch.raw.clone(),
            ProcessorNode::Opaque(value) => value.clone(),
        }
    }

    pub fn kind(&self) -> Option<ProcessorKind> {
        match self {
            ProcessorNode::Step(step) => Some(step.kind),
            ProcessorNode::If(_) => Some(ProcessorKind::If),
            ProcessorNode::Foreach(_) => Some(ProcessorKind::Foreach),
            ProcessorNode::Switch(_) => Some(ProcessorKind::Switch),
            ProcessorNode::Patch(_) | ProcessorNode::Opaque(_) => None,
        }
    }

    /// Display label: the processor kind, `patch`, or `processor`.
    pub fn kind_label(&self) -> &'static str {
        match self {
            ProcessorNode::Patch(_) => "patch",
            ProcessorNode::Opaque(_) => "processor",
            node => node.kind().map(|k| k.as_str()).unwrap_or("processor"),
        }
    }

    fn payload(&self) -> Option<&Value> {
        match self {
            ProcessorNode::Step(step) => Some(&step.payload),
            ProcessorNode::If(node) => Some(&node.payload),
            ProcessorNode::Foreach(node) => Some(&node.payload),
            ProcessorNode::Switch(node) => Some(&node.payload),
            ProcessorNode::Patch(_) | ProcessorNode::Opaque(_) => None,
        }
    }

    /// The raw `targetField` string of the payload, if non-empty.
    pub fn target_field(&self) -> Option<&str> {
        self.payload()?
            .get("targetField")?
            .as_str()
            .filter(|target| !target.is_empty())
    }

    /// The event field this node writes directly: a `$.event.` target
    /// field, or the `/event/...` path of a patch.
    pub fn event_target(&self) -> Option<TargetKey> {
        match self {
            ProcessorNode::Patch(patch) => patch.target(),
            node => node.target_field().and_then(TargetKey::parse),
        }
    }
}

impl Serialize for ProcessorNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProcessorNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ProcessorNode::from_value)
    }
}

/// Parse a list of raw processors.
pub fn parse_list(items: &[Value]) -> Vec<ProcessorNode> {
    items
        .iter()
        .cloned()
        .map(ProcessorNode::from_value)
        .collect()
}

fn child_list(payload: &Value, key: &str) -> Vec<ProcessorNode> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| parse_list(items))
        .unwrap_or_default()
}

fn wrap(kind: ProcessorKind, payload: &Value) -> Value {
    let mut map = Map::new();
    map.insert(kind.as_str().to_string(), payload.clone());
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vocabulary_round_trips_through_keys() {
        for kind in ProcessorKind::ALL {
            assert_eq!(ProcessorKind::from_key(kind.as_str()), Some(kind));
        }
        assert_eq!(ProcessorKind::from_key("eval"), None);
    }

    #[test]
    fn test_classify_requires_exactly_one_known_key() {
        assert_eq!(
            classify(&json!({"set": {"targetField": "$.event.Severity"}})),
            Some(ProcessorKind::Set)
        );
        assert_eq!(
            classify(&json!({"setOutputStream": {"output": "pulsar"}})),
            Some(ProcessorKind::SetOutputStream)
        );
        assert_eq!(classify(&json!({"set": {}, "copy": {}})), None);
        assert_eq!(classify(&json!({"unknown": {}})), None);
        assert_eq!(classify(&json!([{"set": {}}])), None);
        assert_eq!(classify(&json!("set")), None);
    }

    #[test]
    fn test_patch_operation_is_not_a_processor() {
        let node = ProcessorNode::from_value(json!({
            "op": "add",
            "path": "/event/Severity",
            "value": 5
        }));
        let ProcessorNode::Patch(patch) = &node else {
            panic!("expected patch, got {:?}", node);
        };
        assert_eq!(patch.op(), "add");
        assert_eq!(
            patch.target().map(|t| t.as_str().to_string()),
            Some("$.event.Severity".to_string())
        );
        assert_eq!(node.kind(), None);
        assert_eq!(node.kind_label(), "patch");

        let unknown_op = ProcessorNode::from_value(json!({"op": "merge", "path": "/event/A"}));
        assert!(matches!(unknown_op, ProcessorNode::Opaque(_)));
    }

    #[test]
    fn test_malformed_container_is_tolerated() {
        let node = ProcessorNode::from_value(json!({"if": "not-an-object"}));
        let ProcessorNode::If(inner) = &node else {
            panic!("expected if node");
        };
        assert!(inner.processors().is_empty());
        assert!(inner.else_processors().is_empty());
        assert_eq!(node.to_value(), json!({"if": "not-an-object"}));
    }

    #[test]
    fn test_switch_case_accepts_then_and_processors() {
        let node = ProcessorNode::from_value(json!({"switch": {
            "source": "$.event.Node",
            "case": [
                {"match": "a", "then": [{"set": {"targetField": "$.event.A"}}]},
                {"match": "b", "operator": "==", "processors": [{"set": {"targetField": "$.event.B"}}]},
                {"match": "c",
                 "then": [{"set": {"targetField": "$.event.C1"}}],
                 "processors": [{"set": {"targetField": "$.event.C2"}}]}
            ],
            "default": [{"set": {"targetField": "$.event.D"}}]
        }}));
        let ProcessorNode::Switch(switch) = &node else {
            panic!("expected switch node");
        };
        let keys: Vec<CaseBranchKey> = switch.cases().iter().map(|c| c.branch_key()).collect();
        assert_eq!(
            keys,
            vec![CaseBranchKey::Then, CaseBranchKey::Processors, CaseBranchKey::Both]
        );
        assert_eq!(switch.cases()[1].operator(), Some("=="));
        assert_eq!(switch.cases()[2].then()[0].target_field(), Some("$.event.C1"));
        assert_eq!(switch.default_processors().len(), 1);
    }

    #[test]
    fn test_to_value_preserves_source_shape() {
        let raw = json!({"foreach": {
            "source": "$.trap.varbinds",
            "processors": [{"log": {"type": "info"}}]
        }});
        let node: ProcessorNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn test_event_target_requires_event_prefix() {
        let set = ProcessorNode::from_value(json!({"set": {"targetField": "$.event.Summary"}}));
        let local = ProcessorNode::from_value(json!({"set": {"targetField": "$.localmem.x"}}));
        let empty = ProcessorNode::from_value(json!({"set": {"targetField": ""}}));
        assert_eq!(set.event_target().unwrap().as_str(), "$.event.Summary");
        assert_eq!(local.target_field(), Some("$.localmem.x"));
        assert!(local.event_target().is_none());
        assert!(empty.target_field().is_none());
    }
}
