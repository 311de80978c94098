//! Base object value lookup
//!
//! This module defines the `BaseValueSource` trait, which answers whether an
//! object already carries a value for an event field independently of any
//! override. The staged diff engine uses it to tell an override that
//! replaces an existing value (`updated`) from one that introduces a new
//! value (`added`).

use crate::model::TargetKey;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Lookup of an object's value for an event field, before overrides.
///
/// Implementations must be side-effect free. `None` is a normal answer
/// and means the object has no base value for that field.
///
/// This source is injected into `compute_staged_diff()` so the engine can
/// be used with no external collaborator at all (see [`NoBaseValues`]).
pub trait BaseValueSource {
    /// Look up the base value of `target` for `object_name`
    ///
    /// # Arguments
    /// * `object_name` - Object the override is attached to
    /// * `target` - Event field address
    fn base_value(&self, object_name: &str, target: &TargetKey) -> Option<Value>;
}

/// Source with no base values; every event override is a fresh addition.
///
/// # Example
/// ```
/// use fcom_core::base_values::{BaseValueSource, NoBaseValues};
/// use fcom_core::model::TargetKey;
///
/// let target = TargetKey::from_event_field("Severity");
/// assert_eq!(NoBaseValues.base_value("Cisco::Link", &target), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBaseValues;

impl BaseValueSource for NoBaseValues {
    fn base_value(&self, _object_name: &str, _target: &TargetKey) -> Option<Value> {
        None
    }
}

/// In-memory base values keyed by object name and target
///
/// # Example
/// ```
/// use fcom_core::base_values::{BaseValueSource, StaticBaseValues};
/// use fcom_core::model::TargetKey;
/// use serde_json::json;
///
/// let severity = TargetKey::from_event_field("Severity");
/// let source = StaticBaseValues::new().with_value("Cisco::Link", severity.clone(), json!(3));
///
/// assert_eq!(source.base_value("Cisco::Link", &severity), Some(json!(3)));
/// assert_eq!(source.base_value("Juniper::Port", &severity), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticBaseValues {
    values: HashMap<(String, TargetKey), Value>,
}

impl StaticBaseValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for `object_name` / `target`
    pub fn with_value(
        mut self,
        object_name: impl Into<String>,
        target: TargetKey,
        value: Value,
    ) -> Self {
        self.insert(object_name, target, value);
        self
    }

    pub fn insert(&mut self, object_name: impl Into<String>, target: TargetKey, value: Value) {
        self.values.insert((object_name.into(), target), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BaseValueSource for StaticBaseValues {
    fn base_value(&self, object_name: &str, target: &TargetKey) -> Option<Value> {
        self.values
            .get(&(object_name.to_string(), target.clone()))
            .cloned()
    }
}

/// Caches another source's answers per `(object, target)` pair
///
/// Absent values are cached too, so an expensive source is asked at most
/// once per pair for the lifetime of the wrapper.
#[derive(Debug, Default)]
pub struct MemoizedBaseValues<S> {
    inner: S,
    cache: RefCell<HashMap<(String, TargetKey), Option<Value>>>,
}

impl<S: BaseValueSource> MemoizedBaseValues<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct pairs looked up so far
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: BaseValueSource> BaseValueSource for MemoizedBaseValues<S> {
    fn base_value(&self, object_name: &str, target: &TargetKey) -> Option<Value> {
        let key = (object_name.to_string(), target.clone());
        if let Some(hit) = self.cache.borrow().get(&key) {
            return hit.clone();
        }
        let value = self.inner.base_value(object_name, target);
        self.cache.borrow_mut().insert(key, value.clone());
        value
    }
}

impl<F> BaseValueSource for F
where
    F: Fn(&str, &TargetKey) -> Option<Value>,
{
    fn base_value(&self, object_name: &str, target: &TargetKey) -> Option<Value> {
        self(object_name, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_static_values() {
        let mut source = StaticBaseValues::new();
        assert!(source.is_empty());
        source.insert("A", TargetKey::from_event_field("Severity"), json!(5));
        assert_eq!(source.len(), 1);
        assert_eq!(
            source.base_value("A", &TargetKey::from_event_field("Severity")),
            Some(json!(5))
        );
        assert_eq!(
            source.base_value("A", &TargetKey::from_event_field("Summary")),
            None
        );
    }

    #[test]
    fn test_closure_source() {
        let source = |object: &str, target: &TargetKey| {
            (object == "A" && target.field_name() == "Node").then(|| json!("router-1"))
        };
        assert_eq!(
            source.base_value("A", &TargetKey::from_event_field("Node")),
            Some(json!("router-1"))
        );
        assert_eq!(source.base_value("B", &TargetKey::from_event_field("Node")), None);
    }

    #[test]
    fn test_memoized_asks_inner_once_per_pair() {
        let calls = Cell::new(0);
        let counting = |_: &str, target: &TargetKey| {
            calls.set(calls.get() + 1);
            (target.field_name() == "Severity").then(|| json!(1))
        };
        let memo = MemoizedBaseValues::new(counting);
        let severity = TargetKey::from_event_field("Severity");
        let summary = TargetKey::from_event_field("Summary");

        assert_eq!(memo.base_value("A", &severity), Some(json!(1)));
        assert_eq!(memo.base_value("A", &severity), Some(json!(1)));
        assert_eq!(memo.base_value("A", &summary), None);
        assert_eq!(memo.base_value("A", &summary), None);

        assert_eq!(calls.get(), 2);
        assert_eq!(memo.cached_len(), 2);
    }
}
