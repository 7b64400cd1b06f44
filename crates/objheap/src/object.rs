//! Plain objects: a string-keyed own-property table plus a prototype slot.
//!
//! The property table holds *own* entries only — anything reachable through
//! the prototype slot is inherited and never surfaces in the operations
//! here. `BTreeMap` keeps enumeration deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Opaque handle referencing a cell in the object heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u32);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// A plain object.
///
/// Keys within the table are unique; values are arbitrary [`Value`]s.
/// Lifecycle is entirely the caller's: nothing here retains references
/// beyond a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainObject {
    /// Prototype cell; `None` terminates the chain.
    pub prototype: Option<ObjectHandle>,
    /// Own properties, enumerated in sorted key order.
    pub properties: BTreeMap<String, Value>,
}

impl PlainObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plain object with the given prototype.
    pub fn with_prototype(proto: Option<ObjectHandle>) -> Self {
        Self {
            prototype: proto,
            properties: BTreeMap::new(),
        }
    }

    /// Does this object have an own property `key`? Inherited entries do
    /// not count.
    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Own-property lookup. `None` is the absent-marker, distinct from a
    /// present property whose value is `Value::Undefined`.
    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Insert or overwrite an own property.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Remove an own property. Returns whether an entry was actually
    /// removed; deleting an absent key is a no-op.
    pub fn delete_own(&mut self, key: &str) -> bool {
        self.properties.remove(key).is_some()
    }

    /// Call `f` once for every own entry, in sorted key order. Inherited
    /// entries are never visited.
    pub fn for_each_own(&self, mut f: impl FnMut(&str, &Value)) {
        for (key, value) in &self.properties {
            f(key, value);
        }
    }

    /// Own keys in sorted order.
    pub fn own_keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Own values, ordered by key.
    pub fn own_values(&self) -> Vec<Value> {
        self.properties.values().cloned().collect()
    }

    /// Own `(key, value)` pairs, ordered by key.
    pub fn own_entries(&self) -> Vec<(String, Value)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of own properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_val(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn defaults() {
        let obj = PlainObject::new();
        assert_eq!(obj.prototype, None);
        assert!(obj.is_empty());
        assert_eq!(obj.len(), 0);
    }

    #[test]
    fn with_prototype_sets_slot() {
        let obj = PlainObject::with_prototype(Some(ObjectHandle(7)));
        assert_eq!(obj.prototype, Some(ObjectHandle(7)));
        assert!(obj.is_empty());
    }

    #[test]
    fn set_then_has_and_get() {
        let mut obj = PlainObject::new();
        obj.set("a", int_val(1));
        assert!(obj.has_own("a"));
        assert_eq!(obj.get_own("a"), Some(&int_val(1)));
        assert!(!obj.has_own("b"));
        assert_eq!(obj.get_own("b"), None);
    }

    #[test]
    fn absent_differs_from_stored_undefined() {
        let mut obj = PlainObject::new();
        obj.set("u", Value::Undefined);
        assert!(obj.has_own("u"));
        assert_eq!(obj.get_own("u"), Some(&Value::Undefined));
        assert_eq!(obj.get_own("missing"), None);
    }

    #[test]
    fn set_overwrites() {
        let mut obj = PlainObject::new();
        obj.set("k", int_val(1));
        obj.set("k", int_val(2));
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get_own("k"), Some(&int_val(2)));
    }

    #[test]
    fn delete_own_reports_presence() {
        let mut obj = PlainObject::new();
        obj.set("k", int_val(1));
        assert!(obj.delete_own("k"));
        assert!(!obj.has_own("k"));
        assert!(!obj.delete_own("k"));
    }

    #[test]
    fn for_each_own_visits_every_entry_once_sorted() {
        let mut obj = PlainObject::new();
        obj.set("b", int_val(2));
        obj.set("a", int_val(1));
        obj.set("c", int_val(3));
        let mut seen = Vec::new();
        obj.for_each_own(|k, v| seen.push((k.to_string(), v.clone())));
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), int_val(1)),
                ("b".to_string(), int_val(2)),
                ("c".to_string(), int_val(3)),
            ]
        );
    }

    #[test]
    fn enumeration_helpers_agree() {
        let mut obj = PlainObject::new();
        obj.set("y", int_val(2));
        obj.set("x", int_val(1));
        assert_eq!(obj.own_keys(), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(obj.own_values(), vec![int_val(1), int_val(2)]);
        assert_eq!(
            obj.own_entries(),
            vec![("x".to_string(), int_val(1)), ("y".to_string(), int_val(2))]
        );
    }

    #[test]
    fn handle_display() {
        assert_eq!(ObjectHandle(5).to_string(), "object#5");
    }
}
