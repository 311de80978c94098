//! Conversion of JSON-Patch style override entries into processors.
//!
//! Some override files list `{op, path, value}` operations where the
//! processor pipeline is expected. `add` and `replace` operations can be
//! expressed as processors; the rest are reported back unconverted.

use crate::canonical::canonical_json;
use crate::model::processor::PatchOp;
use crate::model::{OverrideEntry, ProcessorNode};
use serde_json::{json, Value};

/// Result of converting a processor list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchConversion {
    pub processors: Vec<ProcessorNode>,
    /// Canonical JSON of every operation that could not be converted
    pub skipped: Vec<String>,
}

/// Rewrite patch operations as processors.
///
/// - an `add`/`replace` whose value is a processor yields that processor
/// - an `add`/`replace` on `/event/<path>` yields
///   `{"set": {"source": value, "targetField": "$.event.<path>"}}`
/// - processors already in the list are kept unchanged
/// - everything else is skipped
pub fn convert_patch_ops(nodes: &[ProcessorNode]) -> PatchConversion {
    let mut conversion = PatchConversion::default();
    for node in nodes {
        match node {
            ProcessorNode::Patch(patch) => match convert_patch(patch) {
                Some(processor) => conversion.processors.push(processor),
                None => conversion.skipped.push(skipped_text(node)),
            },
            ProcessorNode::Opaque(_) => conversion.skipped.push(skipped_text(node)),
            processor => conversion.processors.push(processor.clone()),
        }
    }
    if !conversion.skipped.is_empty() {
        tracing::debug!(
            skipped = conversion.skipped.len(),
            "patch operations left unconverted"
        );
    }
    conversion
}

/// Convert an entry's patch operations in place of its processors and
/// mark the result as a `v2` override.
pub fn convert_entry_patch_ops(entry: &OverrideEntry) -> (OverrideEntry, Vec<String>) {
    let conversion = convert_patch_ops(&entry.processors);
    let mut converted = entry.clone();
    converted.processors = conversion.processors;
    converted
        .extra
        .insert("version".to_string(), Value::String("v2".to_string()));
    (converted, conversion.skipped)
}

fn convert_patch(patch: &PatchOp) -> Option<ProcessorNode> {
    if !matches!(patch.op(), "add" | "replace") {
        return None;
    }
    if let Some(processor) = patch.processor_value() {
        return Some(processor);
    }
    let target = patch.target()?;
    let source = patch.value().cloned().unwrap_or(Value::Null);
    Some(ProcessorNode::from_value(json!({
        "set": {"source": source, "targetField": target.as_str()}
    })))
}

fn skipped_text(node: &ProcessorNode) -> String {
    let value = node.to_value();
    canonical_json(&value).unwrap_or_else(|_| value.to_string())
}
