//! The managed object heap and the own-property utilities over it.
//!
//! Cells (plain objects and arrays) live in an append-only arena and are
//! addressed by copyable [`ObjectHandle`]s. The indirection is what makes
//! the copy operations *shallow*: [`ObjectHeap::extend`] and
//! [`ObjectHeap::clone_shallow`] copy `Value`s, and a value referencing a
//! nested cell copies as a handle, so both owners observe the same nested
//! cell afterwards.
//!
//! Own-property operations (`contains`, `get_own`, `for_each_own`,
//! `extend`, `clone_shallow`) never consult the prototype slot. The
//! chain-walking pair (`has_property`, `get_property`) is the contrast:
//! it sees inherited entries too, with cycle and depth guards.
//!
//! Key absence is never an error — `get_own` signals it with `None` and
//! `get_property` with `Value::Undefined`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::object::{ObjectHandle, PlainObject};
use crate::value::Value;

/// Maximum prototype chain depth before lookup gives up.
const MAX_PROTOTYPE_CHAIN_DEPTH: u32 = 1024;

/// Errors from heap operations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ObjectError {
    /// Handle does not reference a live cell in this heap.
    #[error("{0} not found in heap")]
    ObjectNotFound(ObjectHandle),
    /// The cell exists but is an array where a plain object is required.
    #[error("{0} is not a plain object")]
    NotAPlainObject(ObjectHandle),
    /// The cell exists but is a plain object where an array is required.
    #[error("{0} is not an array")]
    NotAnArray(ObjectHandle),
    /// The prototype chain loops back on itself.
    #[error("prototype chain cycle detected")]
    PrototypeCycleDetected,
    /// The prototype chain exceeds the supported depth.
    #[error("prototype chain depth {depth} exceeds max {max}")]
    PrototypeChainTooDeep { depth: u32, max: u32 },
}

// ---------------------------------------------------------------------------
// HeapCell — plain object or array
// ---------------------------------------------------------------------------

/// One arena slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeapCell {
    Plain(PlainObject),
    Array(Vec<Value>),
}

impl HeapCell {
    pub fn as_plain(&self) -> Option<&PlainObject> {
        match self {
            Self::Plain(o) => Some(o),
            Self::Array(_) => None,
        }
    }

    pub fn as_plain_mut(&mut self) -> Option<&mut PlainObject> {
        match self {
            Self::Plain(o) => Some(o),
            Self::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(elements) => Some(elements),
            Self::Plain(_) => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(elements) => Some(elements),
            Self::Plain(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectHeap — the arena
// ---------------------------------------------------------------------------

/// The object heap: arena of cells.
///
/// Handles are plain indices; allocation never invalidates an existing
/// handle. A handle minted by a different heap is out of range here and
/// yields [`ObjectError::ObjectNotFound`], not a panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHeap {
    cells: Vec<HeapCell>,
}

impl ObjectHeap {
    /// Create a new empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty plain object with no prototype.
    pub fn alloc(&mut self) -> ObjectHandle {
        self.alloc_with_prototype(None)
    }

    /// Allocate an empty plain object with the given prototype.
    pub fn alloc_with_prototype(&mut self, proto: Option<ObjectHandle>) -> ObjectHandle {
        let handle = ObjectHandle(self.cells.len() as u32);
        self.cells
            .push(HeapCell::Plain(PlainObject::with_prototype(proto)));
        handle
    }

    /// Allocate an array cell.
    pub fn alloc_array(&mut self, elements: Vec<Value>) -> ObjectHandle {
        let handle = ObjectHandle(self.cells.len() as u32);
        self.cells.push(HeapCell::Array(elements));
        handle
    }

    /// Get a reference to a cell.
    pub fn cell(&self, handle: ObjectHandle) -> Result<&HeapCell, ObjectError> {
        self.cells
            .get(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound(handle))
    }

    /// Get a mutable reference to a cell.
    pub fn cell_mut(&mut self, handle: ObjectHandle) -> Result<&mut HeapCell, ObjectError> {
        self.cells
            .get_mut(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound(handle))
    }

    /// Get the plain object behind `handle`.
    pub fn object(&self, handle: ObjectHandle) -> Result<&PlainObject, ObjectError> {
        self.cell(handle)?
            .as_plain()
            .ok_or(ObjectError::NotAPlainObject(handle))
    }

    /// Get the plain object behind `handle`, mutably.
    pub fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut PlainObject, ObjectError> {
        self.cell_mut(handle)?
            .as_plain_mut()
            .ok_or(ObjectError::NotAPlainObject(handle))
    }

    /// Get the array behind `handle`.
    pub fn array(&self, handle: ObjectHandle) -> Result<&Vec<Value>, ObjectError> {
        self.cell(handle)?
            .as_array()
            .ok_or(ObjectError::NotAnArray(handle))
    }

    /// Get the array behind `handle`, mutably.
    pub fn array_mut(&mut self, handle: ObjectHandle) -> Result<&mut Vec<Value>, ObjectError> {
        self.cell_mut(handle)?
            .as_array_mut()
            .ok_or(ObjectError::NotAnArray(handle))
    }

    /// Number of cells allocated.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Is the heap empty?
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // -- Own-property utilities ---------------------------------------------

    /// Does the object have an own property `key`? Inherited entries never
    /// count; see [`ObjectHeap::has_property`] for the chain-aware check.
    pub fn contains(&self, handle: ObjectHandle, key: &str) -> Result<bool, ObjectError> {
        Ok(self.object(handle)?.has_own(key))
    }

    /// Own-property lookup. `Ok(None)` means `key` is not an own entry;
    /// a stored `Value::Undefined` comes back as `Ok(Some(Undefined))`.
    pub fn get_own(&self, handle: ObjectHandle, key: &str) -> Result<Option<Value>, ObjectError> {
        Ok(self.object(handle)?.get_own(key).cloned())
    }

    /// Insert or overwrite an own property.
    pub fn set(
        &mut self,
        handle: ObjectHandle,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), ObjectError> {
        self.object_mut(handle)?.set(key, value);
        Ok(())
    }

    /// Remove an own property. `Ok(false)` when the key was absent.
    pub fn delete_own(&mut self, handle: ObjectHandle, key: &str) -> Result<bool, ObjectError> {
        Ok(self.object_mut(handle)?.delete_own(key))
    }

    /// Call `f` once for every own entry of the object, in sorted key
    /// order. Inherited entries are never visited. The shared borrow on
    /// the heap means the mapping cannot be mutated mid-enumeration.
    pub fn for_each_own(
        &self,
        handle: ObjectHandle,
        f: impl FnMut(&str, &Value),
    ) -> Result<(), ObjectError> {
        self.object(handle)?.for_each_own(f);
        Ok(())
    }

    /// Own keys of the object, in sorted order.
    pub fn own_keys(&self, handle: ObjectHandle) -> Result<Vec<String>, ObjectError> {
        Ok(self.object(handle)?.own_keys())
    }

    /// Copy every own entry of `source` into `target`, overwriting on key
    /// collision. `target` is mutated in place and its handle returned for
    /// chaining. Values copy shallowly: nested objects and arrays end up
    /// shared between `source` and `target`. `source` itself is untouched,
    /// and `extend(h, h)` is a well-defined no-op.
    pub fn extend(
        &mut self,
        target: ObjectHandle,
        source: ObjectHandle,
    ) -> Result<ObjectHandle, ObjectError> {
        // Validate target up front so the error names the right cell even
        // when the source is also bad.
        self.object(target)?;
        let entries = self.object(source)?.own_entries();
        let target_obj = self.object_mut(target)?;
        for (key, value) in entries {
            target_obj.set(key, value);
        }
        Ok(target)
    }

    /// Shallow clone: a fresh prototype-less object holding the same own
    /// entries as `handle`. Nested cells are shared with the original, not
    /// duplicated; the clone is a distinct cell.
    pub fn clone_shallow(&mut self, handle: ObjectHandle) -> Result<ObjectHandle, ObjectError> {
        // Validate before allocating so a bad handle leaks no empty cell.
        self.object(handle)?;
        let clone = self.alloc();
        self.extend(clone, handle)
    }

    // -- Prototype-chain lookup ---------------------------------------------

    /// Property lookup through the prototype chain: the nearest own entry
    /// wins. A miss past the end of the chain is `Value::Undefined`, not
    /// an error.
    pub fn get_property(&self, handle: ObjectHandle, key: &str) -> Result<Value, ObjectError> {
        let mut current = Some(handle);
        let mut depth: u32 = 0;
        let mut visited = BTreeSet::new();

        while let Some(h) = current {
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(ObjectError::PrototypeChainTooDeep {
                    depth,
                    max: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            if !visited.insert(h) {
                return Err(ObjectError::PrototypeCycleDetected);
            }

            let obj = self.object(h)?;
            if let Some(value) = obj.get_own(key) {
                return Ok(value.clone());
            }
            current = obj.prototype;
            depth += 1;
        }

        Ok(Value::Undefined)
    }

    /// Does the object have `key`, own or inherited?
    pub fn has_property(&self, handle: ObjectHandle, key: &str) -> Result<bool, ObjectError> {
        let mut current = Some(handle);
        let mut depth: u32 = 0;
        let mut visited = BTreeSet::new();

        while let Some(h) = current {
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(ObjectError::PrototypeChainTooDeep {
                    depth,
                    max: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            if !visited.insert(h) {
                return Err(ObjectError::PrototypeCycleDetected);
            }

            let obj = self.object(h)?;
            if obj.has_own(key) {
                return Ok(true);
            }
            current = obj.prototype;
            depth += 1;
        }

        Ok(false)
    }
}
