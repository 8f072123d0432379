//! Compound value types: arrays and objects
//!
//! Both are shared handles. Cloning a handle aliases the same storage, so a
//! `delete` through one handle is observed through all of them, and strict
//! equality compares identity.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Value;

/// A shared, mutable array.
#[derive(Debug, Clone, Default)]
pub struct ArrayRef(Arc<RwLock<Vec<Value>>>);

impl ArrayRef {
    /// Wrap a vector.
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Borrow the elements.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.0.read()
    }

    /// Borrow the elements mutably.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.0.write()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Copy the elements out.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Whether both handles share storage.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A shared, mutable object with insertion-ordered keys.
#[derive(Debug, Clone, Default)]
pub struct ObjectRef(Arc<RwLock<IndexMap<String, Value>>>);

impl ObjectRef {
    /// Wrap a map.
    pub fn new(fields: IndexMap<String, Value>) -> Self {
        Self(Arc::new(RwLock::new(fields)))
    }

    /// Borrow the fields.
    pub fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Value>> {
        self.0.read()
    }

    /// Borrow the fields mutably.
    pub fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Value>> {
        self.0.write()
    }

    /// Get a field by name.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Set a field, keeping its position if it already exists.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.0.write().insert(key.into(), value);
    }

    /// Remove a field, returning the previous value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.write().shift_remove(key)
    }

    /// Whether the object has an own field named `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Whether both handles share storage.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_handles_alias() {
        let a = ObjectRef::default();
        let b = a.clone();
        a.insert("x", Value::Number(1.0));
        assert_eq!(b.get("x"), Some(Value::Number(1.0)));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_object_remove_keeps_order() {
        let obj = ObjectRef::default();
        obj.insert("a", Value::Number(1.0));
        obj.insert("b", Value::Number(2.0));
        obj.insert("c", Value::Number(3.0));
        assert_eq!(obj.remove("b"), Some(Value::Number(2.0)));
        assert_eq!(obj.keys(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_array_get_out_of_range() {
        let arr = ArrayRef::new(vec![Value::Bool(true)]);
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.get(0), Some(Value::Bool(true)));
        assert_eq!(arr.get(1), None);
    }

    #[test]
    fn test_distinct_arrays_not_ptr_eq() {
        let a = ArrayRef::new(vec![]);
        let b = ArrayRef::new(vec![]);
        assert!(!a.ptr_eq(&b));
        assert!(a.is_empty());
    }
}
