use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::model::processor::{parse_list, ProcessorNode};
use crate::model::target::TargetKey;

/// Sentinel object name for overrides that apply to every object.
pub const GLOBAL_OBJECT_NAME: &str = "__global__";

/// Older spelling of `@objectName`, read only when `@objectName` is absent.
const LEGACY_OBJECT_NAME_KEY: &str = "objectName";

/// Processing phase an override attaches to.
///
/// Parsing ignores case: `"PRE"` and `"Post"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Pre,
    #[default]
    Post,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Pre => "pre",
            Scope::Post => "post",
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pre") {
            Ok(Scope::Pre)
        } else if s.eq_ignore_ascii_case("post") {
            Ok(Scope::Post)
        } else {
            Err(format!("unknown scope `{}`, expected `pre` or `post`", s))
        }
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One override: direct event field overrides plus a processor pipeline,
/// attached to an object, method and phase.
///
/// Keys this type does not model (`name`, `description`, `version`, ...)
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(
        rename = "@objectName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub object_name: Option<String>,

    #[serde(default, deserialize_with = "scope_or_default")]
    pub scope: Scope,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "processor_list")]
    pub processors: Vec<ProcessorNode>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OverrideEntry {
    /// The object name, with the global sentinel and empty names mapped
    /// to `None`. A legacy `objectName` key (kept in `extra`) is used only
    /// when `@objectName` is absent.
    pub fn object_name(&self) -> Option<&str> {
        self.object_name
            .as_deref()
            .or_else(|| {
                self.extra
                    .get(LEGACY_OBJECT_NAME_KEY)
                    .and_then(Value::as_str)
            })
            .filter(|name| !name.is_empty() && *name != GLOBAL_OBJECT_NAME)
    }

    /// The object name used to namespace targets; `__global__` when unset.
    pub fn namespace(&self) -> &str {
        self.object_name().unwrap_or(GLOBAL_OBJECT_NAME)
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or_default()
    }

    pub fn scope_key(&self) -> ScopeKey {
        ScopeKey {
            method: self.method().to_string(),
            scope: self.scope,
            object_name: self.object_name().map(str::to_string),
        }
    }

    /// Direct event overrides keyed by target. Empty field names are skipped.
    pub fn event_overrides(&self) -> BTreeMap<TargetKey, &Value> {
        self.event
            .iter()
            .flat_map(|event| event.iter())
            .filter(|(field, _)| !field.is_empty())
            .map(|(field, value)| (TargetKey::from_event_field(field), value))
            .collect()
    }
}

/// Composite identity used to match overrides across two snapshots.
///
/// Ordering is by method, then scope, then object name, with the global
/// scope sorting before named objects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub method: String,
    pub scope: Scope,
    pub object_name: Option<String>,
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.method,
            self.scope,
            self.object_name.as_deref().unwrap_or(GLOBAL_OBJECT_NAME)
        )
    }
}

fn scope_or_default<'de, D>(deserializer: D) -> Result<Scope, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scope>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// A `processors` value that is not an array is treated as an empty pipeline.
fn processor_list<'de, D>(deserializer: D) -> Result<Vec<ProcessorNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => parse_list(&items),
        _ => Vec::new(),
    })
}
