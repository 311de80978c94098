//! Staged diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Sections are ordered by scope key; field changes by target.
//! The output carries no presentation-specific fields.

use crate::model::{ProcessorNode, Scope, ScopeKey, TargetKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened to a field or processor between base and staged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Added,
    Updated,
    Removed,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Added => "added",
            ChangeAction::Updated => "updated",
            ChangeAction::Removed => "removed",
        }
    }

    /// The action seen from the other side of the diff.
    pub fn inverse(&self) -> ChangeAction {
        match self {
            ChangeAction::Added => ChangeAction::Removed,
            ChangeAction::Updated => ChangeAction::Updated,
            ChangeAction::Removed => ChangeAction::Added,
        }
    }
}

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrigin {
    /// A direct `event` map override on either side
    Event,
    /// A processor `targetField`
    Processor,
}

/// A change to one event field in one scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub target: TargetKey,
    pub action: ChangeAction,
    /// Base side value: the literal override or the writing processor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Staged side value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    pub origin: FieldOrigin,
}

/// A top-level processor, compared by content, that exists on one side only.
///
/// Covers untargeted steps, containers without a target of their own, and
/// writers that do not represent their target. Never `Updated`: these are
/// matched by content, so an edit shows up as a removal plus an addition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorChange {
    pub action: ChangeAction,
    pub processor: ProcessorNode,
}

/// All changes for one scope key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StagedDiffSection {
    pub scope_key: ScopeKey,
    /// `"<objectName> (Object <scope>)"` or `"Global <SCOPE>"`
    pub title: String,
    pub object_name: Option<String>,
    pub scope: Scope,
    pub method: String,
    pub field_changes: Vec<FieldChange>,
    pub processor_changes: Vec<ProcessorChange>,
}

impl StagedDiffSection {
    pub fn change_count(&self) -> usize {
        self.field_changes.len() + self.processor_changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }
}

/// The full diff between a base and a staged snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StagedDiff {
    /// Non-empty sections in scope key order
    pub sections: Vec<StagedDiffSection>,
    /// Field changes plus processor changes across all sections
    pub total_changes: usize,
    /// Distinct object names with at least one change, in section order
    pub edited_objects: Vec<String>,
}

impl StagedDiff {
    pub fn is_empty(&self) -> bool {
        self.total_changes == 0
    }
}
