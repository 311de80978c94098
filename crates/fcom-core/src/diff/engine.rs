//! Staged diff computation engine.
//!
//! The core entry point is [`compute_staged_diff`], which accepts the base
//! (committed) and staged (edited) override snapshots and produces a
//! [`StagedDiff`].

use crate::base_values::BaseValueSource;
use crate::canonical::{identity_key, same_value};
use crate::diff::model::{
    ChangeAction, FieldChange, FieldOrigin, ProcessorChange, StagedDiff, StagedDiffSection,
};
use crate::index::{index_overrides, ScopeIndex};
use crate::model::{OverrideEntry, ProcessorNode, Scope, ScopeKey, TargetKey};
use crate::resolver::{resolve_processors, TargetResolution};
use crate::{log_op_end, log_op_start, log_scope_diff};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One snapshot's view of a single scope.
struct ScopeSide<'a> {
    entry: Option<&'a OverrideEntry>,
    events: BTreeMap<TargetKey, &'a Value>,
    resolution: TargetResolution,
    /// Processors compared by content rather than through a field.
    identities: BTreeMap<String, ProcessorNode>,
}

impl<'a> ScopeSide<'a> {
    fn new(entry: Option<&'a OverrideEntry>) -> Self {
        let Some(entry) = entry else {
            return Self {
                entry: None,
                events: BTreeMap::new(),
                resolution: TargetResolution::default(),
                identities: BTreeMap::new(),
            };
        };

        let events = entry.event_overrides();
        let resolution = resolve_processors(&entry.processors);
        let mut identities = resolution.by_identity.clone();
        // a writer hidden behind a direct event value is still compared
        for (target, processor) in &resolution.top_level {
            if events.contains_key(target) {
                let key = identity_key(processor.kind_label(), &processor.to_value(), 0);
                identities.entry(key).or_insert_with(|| processor.clone());
            }
        }

        Self {
            entry: Some(entry),
            events,
            resolution,
            identities,
        }
    }

    fn has_event(&self, target: &TargetKey) -> bool {
        self.events.contains_key(target)
    }

    /// Direct event override, then top-level writer, then nested writer.
    fn value(&self, target: &TargetKey) -> Option<Value> {
        match self.events.get(target) {
            Some(value) => Some((*value).clone()),
            None => self
                .resolution
                .processor_for(target)
                .map(|processor| processor.to_value()),
        }
    }

    fn targets(&self) -> impl Iterator<Item = &TargetKey> {
        self.resolution.targets().chain(self.events.keys())
    }
}

/// Section title: `"<objectName> (Object <scope>)"` or `"Global <SCOPE>"`.
pub fn section_title(object_name: Option<&str>, scope: Scope) -> String {
    match object_name {
        Some(name) => format!("{} (Object {})", name, scope),
        None => format!("Global {}", scope.as_str().to_uppercase()),
    }
}

/// Classify the change to one target.
fn classify_field(
    target: &TargetKey,
    base: &ScopeSide<'_>,
    staged: &ScopeSide<'_>,
    object_name: Option<&str>,
    base_values: &dyn BaseValueSource,
) -> Option<FieldChange> {
    let origin = if base.has_event(target) || staged.has_event(target) {
        FieldOrigin::Event
    } else {
        FieldOrigin::Processor
    };
    let before = base.value(target);
    let after = staged.value(target);

    let action = match (&before, &after) {
        (Some(before), Some(after)) if same_value(before, after) => return None,
        (Some(_), Some(_)) => ChangeAction::Updated,
        (Some(_), None) => ChangeAction::Removed,
        (None, Some(_)) => {
            // an event override replacing an existing object value is an update
            let replaces_base = origin == FieldOrigin::Event
                && object_name
                    .and_then(|name| base_values.base_value(name, target))
                    .is_some();
            if replaces_base {
                ChangeAction::Updated
            } else {
                ChangeAction::Added
            }
        }
        (None, None) => return None,
    };

    Some(FieldChange {
        target: target.clone(),
        action,
        before,
        after,
        origin,
    })
}

/// Compare the processors that no field represents by identity key.
fn processor_changes(base: &ScopeSide<'_>, staged: &ScopeSide<'_>) -> Vec<ProcessorChange> {
    let keys: BTreeSet<&String> = base
        .identities
        .keys()
        .chain(staged.identities.keys())
        .collect();

    keys.into_iter()
        .filter_map(|key| {
            match (base.identities.get(key), staged.identities.get(key)) {
                (Some(processor), None) => Some(ProcessorChange {
                    action: ChangeAction::Removed,
                    processor: processor.clone(),
                }),
                (None, Some(processor)) => Some(ProcessorChange {
                    action: ChangeAction::Added,
                    processor: processor.clone(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Diff a single scope. Returns `None` when nothing changed.
fn diff_scope(
    key: &ScopeKey,
    base: &ScopeIndex,
    staged: &ScopeIndex,
    base_values: &dyn BaseValueSource,
) -> Option<StagedDiffSection> {
    let base_side = ScopeSide::new(base.get(key));
    let staged_side = ScopeSide::new(staged.get(key));

    let entry = staged_side.entry.or(base_side.entry)?;
    let object_name = entry.object_name();
    let scope = entry.scope;

    let targets: BTreeSet<&TargetKey> = base_side.targets().chain(staged_side.targets()).collect();
    let field_changes: Vec<FieldChange> = targets
        .into_iter()
        .filter_map(|target| {
            classify_field(target, &base_side, &staged_side, object_name, base_values)
        })
        .collect();
    let processor_changes = processor_changes(&base_side, &staged_side);

    if field_changes.is_empty() && processor_changes.is_empty() {
        return None;
    }
    log_scope_diff!(
        "compute_staged_diff",
        scope_key = key,
        object_name = entry.namespace(),
        field_changes = field_changes.len(),
        processor_changes = processor_changes.len()
    );

    Some(StagedDiffSection {
        scope_key: key.clone(),
        title: section_title(object_name, scope),
        object_name: object_name.map(str::to_string),
        scope,
        method: entry.method().to_string(),
        field_changes,
        processor_changes,
    })
}

/// Compute the staged diff between two override snapshots.
///
/// Scopes are matched by scope key. Within a scope, fields are matched by
/// event target and compared by value. Every top-level processor that does
/// not represent a target is matched by the structural identity of its
/// whole value, so an edit inside a container always surfaces. `base_values`
/// is consulted only for event overrides added to a named object.
///
/// The result is independent of input order apart from the last-write-wins
/// rule for duplicate scope keys within one snapshot.
pub fn compute_staged_diff(
    base: &[OverrideEntry],
    staged: &[OverrideEntry],
    base_values: &dyn BaseValueSource,
) -> StagedDiff {
    log_op_start!(
        "compute_staged_diff",
        base_entries = base.len(),
        staged_entries = staged.len()
    );
    let start = std::time::Instant::now();

    let base_index = index_overrides(base);
    let staged_index = index_overrides(staged);
    let diff = compute_indexed_diff(&base_index, &staged_index, base_values);

    log_op_end!(
        "compute_staged_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        sections = diff.sections.len(),
        total_changes = diff.total_changes
    );
    diff
}

/// [`compute_staged_diff`] over snapshots that are already indexed.
pub fn compute_indexed_diff(
    base: &ScopeIndex,
    staged: &ScopeIndex,
    base_values: &dyn BaseValueSource,
) -> StagedDiff {
    let keys: BTreeSet<&ScopeKey> = base.keys().chain(staged.keys()).collect();

    let sections: Vec<StagedDiffSection> = keys
        .into_iter()
        .filter_map(|key| diff_scope(key, base, staged, base_values))
        .collect();

    let total_changes = sections.iter().map(StagedDiffSection::change_count).sum();

    let mut edited_objects: Vec<String> = Vec::new();
    for name in sections.iter().filter_map(|s| s.object_name.as_ref()) {
        if !edited_objects.contains(name) {
            edited_objects.push(name.clone());
        }
    }

    StagedDiff {
        sections,
        total_changes,
        edited_objects,
    }
}
