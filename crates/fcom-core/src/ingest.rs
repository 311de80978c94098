//! Override document ingestion with boundary logging.
//!
//! Turns rule text read from the rules repository into typed override
//! entries, and renders entries back into rule text for write-back.
//!
//! ## Logging Ownership
//!
//! `parse_override_document` owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use crate::errors::{ExError, FcomError, Result};
use crate::model::OverrideEntry;
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const OP_PARSE: &str = "parse_override_document";

/// Root shape of an override document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Array,
    Object,
}

/// A parsed override file.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideDocument {
    pub entries: Vec<OverrideEntry>,
    pub format: DocumentFormat,
}

impl OverrideDocument {
    /// Render the entries back into rule text in the document's format.
    ///
    /// An object document with more than one entry is written as an array.
    ///
    /// # Errors
    ///
    /// Returns `FcomError::Serialization` if an entry cannot be serialized.
    pub fn to_rule_text(&self) -> Result<String> {
        let value = match (self.format, self.entries.as_slice()) {
            (DocumentFormat::Object, []) => Value::Object(Map::new()),
            (DocumentFormat::Object, [entry]) => serde_json::to_value(entry)?,
            _ => serde_json::to_value(&self.entries)?,
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Pull the override text out of a rules API read response.
///
/// Looks for `content.data[0].RuleText`, then `data[0].RuleText`, then
/// `RuleText`, and falls back to the whole response. Non-string values are
/// serialized as JSON; `null` becomes `"[]"`.
pub fn extract_rule_text(response: &Value) -> String {
    let rule_text = ["/content/data/0/RuleText", "/data/0/RuleText", "/RuleText"]
        .iter()
        .filter_map(|pointer| response.pointer(pointer))
        .find(|value| !value.is_null())
        .unwrap_or(response);

    match rule_text {
        Value::String(text) => text.clone(),
        Value::Null => "[]".to_string(),
        other => other.to_string(),
    }
}

/// Parse override rule text into entries.
///
/// Blank text and `{}` yield an empty object document. A JSON array yields
/// one entry per element; any other JSON object is a single entry.
///
/// # Errors
///
/// - `InvalidOverrideDocument`: the text is not JSON, or its root is
///   neither an array nor an object
/// - `InvalidOverrideEntry`: an element cannot be read as an override;
///   the error carries the element index
pub fn parse_override_document(text: &str) -> std::result::Result<OverrideDocument, ExError> {
    log_op_start!(OP_PARSE, bytes = text.len());
    let start = std::time::Instant::now();

    let result = parse_override_document_impl(text).map_err(|e| {
        log_op_error!(
            OP_PARSE,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        OP_PARSE,
        duration_ms = start.elapsed().as_millis() as u64,
        entries = result.entries.len()
    );
    Ok(result)
}

fn parse_override_document_impl(text: &str) -> std::result::Result<OverrideDocument, ExError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(OverrideDocument {
            entries: Vec::new(),
            format: DocumentFormat::Object,
        });
    }

    let root: Value = serde_json::from_str(trimmed).map_err(|e| {
        ExError::from(FcomError::InvalidDocument {
            reason: format!("not valid JSON: {}", e),
        })
        .with_op(OP_PARSE)
    })?;

    let (elements, format) = match root {
        Value::Array(items) => (items, DocumentFormat::Array),
        Value::Object(map) if map.is_empty() => (Vec::new(), DocumentFormat::Object),
        Value::Object(map) => (vec![Value::Object(map)], DocumentFormat::Object),
        _ => {
            return Err(ExError::from(FcomError::InvalidDocument {
                reason: "override file must be a JSON array or object at the root".to_string(),
            })
            .with_op(OP_PARSE));
        }
    };

    let entries = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value::<OverrideEntry>(element).map_err(|e| {
                ExError::from(FcomError::InvalidEntry {
                    index,
                    reason: e.to_string(),
                })
                .with_op(OP_PARSE)
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::debug!(entries = entries.len(), ?format, "parsed override document");
    Ok(OverrideDocument { entries, format })
}

/// True for an object whose `_type` is `override`, ignoring case.
pub fn is_override_entry(value: &Value) -> bool {
    value
        .get("_type")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.eq_ignore_ascii_case("override"))
}

/// A payload is valid for write-back when every element is an override.
pub fn is_valid_override_payload(payload: &Value) -> bool {
    match payload {
        Value::Array(items) => items.iter().all(is_override_entry),
        other => is_override_entry(other),
    }
}

/// Fill in the fields the rules repository requires on write-back.
///
/// Missing `name`, `description`, `domain` and `method` get defaults
/// derived from `object_name`. `@objectName` and `_type` are always set.
pub fn normalize_override_entry(
    entry: &OverrideEntry,
    object_name: &str,
    method: &str,
) -> OverrideEntry {
    let mut normalized = entry.clone();
    normalized.object_name = Some(object_name.to_string());
    if normalized.method().is_empty() {
        let method = if method.is_empty() { "trap" } else { method };
        normalized.method = Some(method.to_string());
    }

    let defaults = [
        ("name", format!("{} Override", object_name)),
        ("description", format!("Overrides for {}", object_name)),
        ("domain", "fault".to_string()),
    ];
    for (key, default) in defaults {
        let present = normalized
            .extra
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|value| !value.is_empty());
        if !present {
            normalized.extra.insert(key.to_string(), Value::String(default));
        }
    }
    normalized
        .extra
        .insert("_type".to_string(), Value::String("override".to_string()));
    normalized
}
