//! Target field resolution.
//!
//! Walks a processor pipeline depth-first, pre-order, and records every
//! `$.event.` field it can write. Conditional branches are unioned: both
//! arms of an `if`, every `switch` case and the `default` list are assumed
//! reachable. The result is a conservative over-approximation, not a
//! flow-sensitive analysis.
//!
//! Every top-level processor is also given a role for comparison. The
//! first top-level writer of a target represents that target. Every other
//! top-level processor is keyed by the structural identity of its whole
//! value, children included, so an edit anywhere inside a container
//! changes its key.
//!
//! Resolution never fails. Unexpected shapes are treated as opaque,
//! untargeted processors.

use crate::canonical::identity_key;
use crate::model::{OverrideEntry, ProcessorNode, TargetKey};
use std::collections::{BTreeMap, BTreeSet};

/// Everything a processor list writes, plus the top-level processors that
/// are compared by content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetResolution {
    /// First top-level processor per target.
    pub top_level: BTreeMap<TargetKey, ProcessorNode>,
    /// First processor per target anywhere in the tree, in pre-order.
    pub all: BTreeMap<TargetKey, ProcessorNode>,
    /// Top-level processors that represent no target, by identity key:
    /// untargeted steps, containers without a target of their own, and
    /// later writers of a target already claimed.
    pub by_identity: BTreeMap<String, ProcessorNode>,
}

impl TargetResolution {
    pub fn targets(&self) -> impl Iterator<Item = &TargetKey> {
        self.all.keys()
    }

    /// The processor that best represents `target`: a top-level writer if
    /// one exists, otherwise the first nested writer.
    pub fn processor_for(&self, target: &TargetKey) -> Option<&ProcessorNode> {
        self.top_level.get(target).or_else(|| self.all.get(target))
    }

    /// Targets as `objectName::$.event.<path>`.
    pub fn namespaced_targets(&self, object_name: &str) -> BTreeSet<String> {
        self.targets()
            .map(|target| target.namespaced(object_name))
            .collect()
    }
}

/// Resolve the targets of one scope's processor list.
pub fn resolve_processors(processors: &[ProcessorNode]) -> TargetResolution {
    let mut resolution = TargetResolution::default();
    for (index, node) in processors.iter().enumerate() {
        // a patch carrying a processor stands for that processor
        let unwrapped = match node {
            ProcessorNode::Patch(patch) => patch.processor_value(),
            _ => None,
        };
        let node = unwrapped.as_ref().unwrap_or(node);

        let represents = match node.event_target() {
            Some(target) if !resolution.top_level.contains_key(&target) => {
                resolution.top_level.insert(target, node.clone());
                true
            }
            _ => false,
        };
        if !represents {
            let key = identity_key(node.kind_label(), &node.to_value(), index);
            resolution
                .by_identity
                .entry(key)
                .or_insert_with(|| node.clone());
        }

        collect_writers(node, &mut resolution.all);
    }
    resolution
}

/// Namespaced targets of one processor list.
pub fn collect_override_targets(
    processors: &[ProcessorNode],
    object_name: &str,
) -> BTreeSet<String> {
    resolve_processors(processors).namespaced_targets(object_name)
}

/// Namespaced targets across a whole document: processor targets plus
/// direct event overrides of every entry.
pub fn collect_entry_targets(entries: &[OverrideEntry]) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();
    for entry in entries {
        let namespace = entry.namespace();
        targets.extend(collect_override_targets(&entry.processors, namespace));
        targets.extend(
            entry
                .event_overrides()
                .keys()
                .map(|target| target.namespaced(namespace)),
        );
    }
    targets
}

fn collect_writers(node: &ProcessorNode, all: &mut BTreeMap<TargetKey, ProcessorNode>) {
    if let Some(target) = node.event_target() {
        all.entry(target).or_insert_with(|| node.clone());
    }

    match node {
        ProcessorNode::If(inner) => {
            for child in inner.processors().iter().chain(inner.else_processors()) {
                collect_writers(child, all);
            }
        }
        ProcessorNode::Foreach(inner) => {
            for child in inner.processors() {
                collect_writers(child, all);
            }
        }
        ProcessorNode::Switch(inner) => {
            let branches = inner.cases().iter().flat_map(|case| case.then());
            for child in branches.chain(inner.default_processors()) {
                collect_writers(child, all);
            }
        }
        ProcessorNode::Patch(patch) => {
            if let Some(processor) = patch.processor_value() {
                collect_writers(&processor, all);
            }
        }
        ProcessorNode::Step(_) | ProcessorNode::Opaque(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::processor::parse_list;
    use serde_json::{json, Value};

    fn nodes(value: Value) -> Vec<ProcessorNode> {
        parse_list(value.as_array().unwrap())
    }

    fn keys(resolution: &TargetResolution) -> Vec<&str> {
        resolution.targets().map(TargetKey::as_str).collect()
    }

    #[test]
    fn test_top_level_and_nested_targets_are_separated() {
        let processors = nodes(json!([
            {"set": {"source": "a", "targetField": "$.event.Summary"}},
            {"foreach": {"source": "$.trap.varbinds", "processors": [
                {"set": {"source": "b", "targetField": "$.event.Details"}},
                {"set": {"source": "c", "targetField": "$.event.Summary"}}
            ]}}
        ]));
        let resolution = resolve_processors(&processors);

        assert_eq!(keys(&resolution), vec!["$.event.Details", "$.event.Summary"]);
        assert_eq!(resolution.top_level.len(), 1);
        // the top-level writer is kept even though a nested one exists
        let summary = TargetKey::from_event_field("Summary");
        assert_eq!(
            resolution.processor_for(&summary).unwrap().to_value(),
            json!({"set": {"source": "a", "targetField": "$.event.Summary"}})
        );
        let details = TargetKey::from_event_field("Details");
        assert!(resolution.processor_for(&details).is_some());
    }

    #[test]
    fn test_first_writer_wins_in_preorder() {
        let processors = nodes(json!([
            {"if": {"processors": [{"set": {"source": 1, "targetField": "$.event.A"}}],
                    "else": [{"set": {"source": 2, "targetField": "$.event.A"}}]}}
        ]));
        let resolution = resolve_processors(&processors);
        let a = TargetKey::from_event_field("A");
        assert_eq!(
            resolution.all[&a].to_value(),
            json!({"set": {"source": 1, "targetField": "$.event.A"}})
        );
        assert!(resolution.top_level.is_empty());
    }

    #[test]
    fn test_untargeted_processors_and_containers() {
        let processors = nodes(json!([
            {"log": {"type": "info", "source": "hello"}},
            {"set": {"source": "x", "targetField": "$.localmem.tmp"}},
            {"if": {"source": "$.event.Node", "operator": "==", "value": "a",
                    "processors": [{"set": {"source": "x", "targetField": "$.event.A"}}]}},
            "not a processor"
        ]));
        let resolution = resolve_processors(&processors);

        let kinds: Vec<&str> = resolution
            .by_identity
            .keys()
            .map(|k| k.split(':').next().unwrap())
            .collect();
        assert_eq!(kinds, vec!["if", "log", "processor", "set"]);
        assert_eq!(keys(&resolution), vec!["$.event.A"]);
    }

    #[test]
    fn test_later_top_level_writer_is_keyed_by_identity() {
        let processors = nodes(json!([
            {"set": {"source": "a", "targetField": "$.event.Summary"}},
            {"set": {"source": "b", "targetField": "$.event.Summary"}}
        ]));
        let resolution = resolve_processors(&processors);

        assert_eq!(resolution.top_level.len(), 1);
        assert_eq!(resolution.by_identity.len(), 1);
        assert_eq!(
            resolution.by_identity.values().next().unwrap().to_value(),
            json!({"set": {"source": "b", "targetField": "$.event.Summary"}})
        );
    }

    #[test]
    fn test_patch_targets_and_processor_values() {
        let processors = nodes(json!([
            {"op": "add", "path": "/event/Severity", "value": 4},
            {"op": "add", "path": "/processors/-",
             "value": {"set": {"source": "x", "targetField": "$.event.Summary"}}},
            {"op": "remove", "path": "/processors/0"}
        ]));
        let resolution = resolve_processors(&processors);

        assert_eq!(keys(&resolution), vec!["$.event.Severity", "$.event.Summary"]);
        assert_eq!(resolution.top_level.len(), 2);
        assert_eq!(resolution.by_identity.len(), 1);
        assert!(resolution.by_identity.keys().all(|k| k.starts_with("patch:")));
    }

    #[test]
    fn test_collect_entry_targets_namespaces_per_object() {
        let entries: Vec<OverrideEntry> = serde_json::from_value(json!([
            {"@objectName": "Cisco::Link", "event": {"Severity": 5},
             "processors": [{"set": {"source": "x", "targetField": "$.event.Summary"}}]},
            {"processors": [{"set": {"source": "y", "targetField": "$.event.Summary"}}]}
        ]))
        .unwrap();

        let targets: Vec<String> = collect_entry_targets(&entries).into_iter().collect();
        assert_eq!(
            targets,
            vec![
                "Cisco::Link::$.event.Severity",
                "Cisco::Link::$.event.Summary",
                "__global__::$.event.Summary",
            ]
        );
    }
}
