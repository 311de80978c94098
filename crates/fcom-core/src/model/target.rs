use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every event field address.
pub const EVENT_PREFIX: &str = "$.event.";

/// An event field address, `$.event.<dotted.path>`.
///
/// Target keys are only meaningful inside one scope; callers namespace
/// them with the object name before comparing across scopes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetKey(String);

impl TargetKey {
    /// Accept a `targetField` string if it addresses an event field.
    pub fn parse(target_field: &str) -> Option<Self> {
        match target_field.strip_prefix(EVENT_PREFIX) {
            Some(rest) if !rest.is_empty() => Some(TargetKey(target_field.to_string())),
            _ => None,
        }
    }

    /// The target written by a direct `event` map entry.
    pub fn from_event_field(field: &str) -> Self {
        TargetKey(format!("{}{}", EVENT_PREFIX, field))
    }

    /// Translate a JSON pointer under `/event/` into a target key.
    ///
    /// A leading `#` is ignored and `~1` / `~0` escapes are decoded, so
    /// `#/event/a~1b/c` becomes `$.event.a/b.c`.
    pub fn from_json_pointer(pointer: &str) -> Option<Self> {
        let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
        let rest = pointer.strip_prefix("/event/")?;
        let parts: Vec<String> = rest
            .split('/')
            .map(|part| part.replace("~1", "/").replace("~0", "~"))
            .collect();
        if parts.iter().any(String::is_empty) {
            return None;
        }
        Some(TargetKey::from_event_field(&parts.join(".")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dotted path after `$.event.`.
    pub fn field_name(&self) -> &str {
        self.0.strip_prefix(EVENT_PREFIX).unwrap_or(&self.0)
    }

    /// `objectName::$.event.<path>`, the form used when counting targets
    /// across a document.
    pub fn namespaced(&self, object_name: &str) -> String {
        format!("{}::{}", object_name, self.0)
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_non_event_targets() {
        assert!(TargetKey::parse("$.event.Severity").is_some());
        assert!(TargetKey::parse("$.event.").is_none());
        assert!(TargetKey::parse("$.localmem.Severity").is_none());
        assert!(TargetKey::parse("Severity").is_none());
    }

    #[test]
    fn test_from_json_pointer() {
        let key = TargetKey::from_json_pointer("/event/Details/Port").unwrap();
        assert_eq!(key.as_str(), "$.event.Details.Port");
        assert_eq!(key.field_name(), "Details.Port");

        let escaped = TargetKey::from_json_pointer("#/event/a~1b/c~0d").unwrap();
        assert_eq!(escaped.as_str(), "$.event.a/b.c~d");

        assert!(TargetKey::from_json_pointer("/processors/0").is_none());
        assert!(TargetKey::from_json_pointer("/event/").is_none());
    }

    #[test]
    fn test_namespaced() {
        let key = TargetKey::from_event_field("Summary");
        assert_eq!(key.namespaced("Cisco::Link"), "Cisco::Link::$.event.Summary");
    }
}
