//! Canonical JSON rendering and structural identity keys.
//!
//! Processors without a target field have no semantic address, so the diff
//! engine compares them by structure. Two processors are the same when
//! their canonical JSON is the same; key order in the source document does
//! not matter.
//!
//! ## Determinism Guarantees
//!
//! - Object keys are sorted recursively before rendering, even when
//!   `serde_json` is built with `preserve_order` somewhere in the graph
//! - Array order is significant
//! - Same input → same identity key

use crate::errors::Result;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Return a copy of `value` with every object's keys in sorted order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Render `value` as compact JSON with sorted keys.
///
/// # Errors
///
/// Returns `FcomError::Serialization` if JSON serialization fails.
pub fn canonical_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&canonicalize(value))?)
}

/// Structural equality that ignores object key order.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (canonical_json(a), canonical_json(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Identity key for a processor compared by content: `<kind>:<sha256 of canonical JSON>`.
///
/// Falls back to `<kind>:<index>` when the value cannot be rendered, so a
/// key is always produced.
pub fn identity_key(kind: &str, value: &Value, index: usize) -> String {
    match canonical_json(value) {
        Ok(canonical) if !canonical.is_empty() => {
            format!("{}:{}", kind, hash_string(&canonical))
        }
        _ => format!("{}:{}", kind, index),
    }
}

/// Hash a string using SHA256.
fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
