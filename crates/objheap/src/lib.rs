#![forbid(unsafe_code)]

//! Managed dynamic object model with own-property utilities.
//!
//! Objects are string-keyed property tables living in an arena heap and
//! addressed by copyable handles, so copying a value that refers to a
//! nested object copies the handle — the shallow-sharing semantics the
//! utility operations here are built around:
//!
//! - **Own-property checks and lookup** — [`ObjectHeap::contains`],
//!   [`ObjectHeap::get_own`] (absence is `None`, never an error)
//! - **Own-entry enumeration** — [`ObjectHeap::for_each_own`], each own
//!   entry exactly once, inherited entries skipped
//! - **Shallow copy and clone** — [`ObjectHeap::extend`],
//!   [`ObjectHeap::clone_shallow`]
//! - **Runtime classification** — [`Value::is_non_null_object`]
//! - **Prototype-chain lookup** — [`ObjectHeap::get_property`],
//!   [`ObjectHeap::has_property`], the own/inherited contrast

pub mod heap;
pub mod object;
pub mod value;

pub use heap::{HeapCell, ObjectError, ObjectHeap};
pub use object::{ObjectHandle, PlainObject};
pub use value::{FunctionId, Value};
