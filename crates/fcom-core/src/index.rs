//! Override indexing by scope key.

use crate::model::{OverrideEntry, ScopeKey};
use std::collections::BTreeMap;

/// One snapshot's overrides keyed by scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeIndex {
    pub entries: BTreeMap<ScopeKey, OverrideEntry>,
    /// Scope keys that appeared more than once, once per overwritten entry,
    /// in input order.
    pub duplicates: Vec<ScopeKey>,
}

impl ScopeIndex {
    pub fn get(&self, key: &ScopeKey) -> Option<&OverrideEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ScopeKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index a flat list of overrides by scope key.
///
/// When two entries share a key the later one wins. Every overwrite is
/// recorded in [`ScopeIndex::duplicates`] and logged.
pub fn index_overrides(entries: &[OverrideEntry]) -> ScopeIndex {
    let mut index = ScopeIndex::default();
    for entry in entries {
        let key = entry.scope_key();
        if index.entries.insert(key.clone(), entry.clone()).is_some() {
            tracing::warn!(
                scope_key = %key,
                "duplicate override scope; keeping the later entry"
            );
            index.duplicates.push(key);
        }
    }
    index
}
