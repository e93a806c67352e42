// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identity-preserving deep copy.
//!
//! A [`CopyContext`] maps each source reference cell (by address) to the
//! cell allocated for it in the copy. The mapping is recorded before the
//! pointee is copied, so a cycle reaching the same source cell again gets
//! the destination cell back instead of recursing. Two source references
//! sharing a cell end up sharing one destination cell.
//!
//! Per-kind rules:
//!
//! | Kind | Copy |
//! |------|------|
//! | primitive, text | by value |
//! | array, sequence | element-wise, same length (and capacity) |
//! | mapping | keys and values copied into a new mapping |
//! | record | public fields copied, private fields zeroed |
//! | reference | through the context (null stays null) |
//! | dynamic | contents copied, same container type |
//! | channel | new empty channel, same capacity |
//! | callable | shared |
//! | opaque | [`Error::UnsupportedKind`](crate::Error::UnsupportedKind) |

use crate::error::Result;
use crate::instantiate::{unsupported, zero_value};
use crate::value::{Channel, Data, Mapping, Pointer, Sequence, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-copy table of source cell -> destination cell.
#[derive(Debug, Default)]
pub struct CopyContext {
    // The source pointer is held so its address cannot be reused mid-copy.
    visited: HashMap<usize, (Pointer, Pointer)>,
}

impl CopyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct reference cells copied so far.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Copy `src`, sharing cells already copied through this context.
    ///
    /// Copying several values through the same context preserves aliasing
    /// between them as well.
    pub fn copy(&mut self, src: &Value) -> Result<Value> {
        let data = match src.data() {
            Data::Invalid => return Ok(Value::invalid()),
            Data::Bool(_)
            | Data::Int(_)
            | Data::Uint(_)
            | Data::Float(_)
            | Data::Complex(_)
            | Data::Text(_) => src.data().clone(),
            Data::Array(items) => Data::Array(self.copy_all(items.iter())?),
            Data::Sequence(None) => Data::Sequence(None),
            Data::Sequence(Some(seq)) => Data::Sequence(Some(Sequence::with_capacity(
                self.copy_all(seq.iter())?,
                seq.capacity(),
            ))),
            Data::Mapping(None) => Data::Mapping(None),
            Data::Mapping(Some(map)) => {
                let mut copied = Mapping::new();
                for (key, value) in map.iter() {
                    copied.insert(self.copy(key)?, self.copy(value)?);
                }
                Data::Mapping(Some(copied))
            }
            Data::Record(fields) => {
                let mut copied = Vec::with_capacity(fields.len());
                for (desc, field) in src.ty().fields().iter().zip(fields) {
                    if desc.is_public() {
                        copied.push(self.copy(field)?);
                    } else {
                        copied.push(zero_value(&desc.type_desc));
                    }
                }
                Data::Record(copied)
            }
            Data::Reference(None) => Data::Reference(None),
            Data::Reference(Some(pointer)) => Data::Reference(Some(self.copy_pointer(pointer)?)),
            Data::Dynamic(None) => Data::Dynamic(None),
            Data::Dynamic(Some(inner)) => Data::Dynamic(Some(Box::new(self.copy(inner)?))),
            Data::Channel(None) => Data::Channel(None),
            Data::Channel(Some(ch)) => Data::Channel(Some(Channel::new(ch.capacity()))),
            Data::Callable(f) => Data::Callable(f.clone()),
            Data::Opaque(_) => return Err(unsupported(src.ty())),
        };
        Ok(Value::from_parts(Arc::clone(src.ty()), data).into_addressable())
    }

    fn copy_all<'a>(&mut self, items: impl Iterator<Item = &'a Value>) -> Result<Vec<Value>> {
        items.map(|item| self.copy(item)).collect()
    }

    fn copy_pointer(&mut self, src: &Pointer) -> Result<Pointer> {
        if let Some((_, dst)) = self.visited.get(&src.addr()) {
            return Ok(dst.clone());
        }

        // Registered before the pointee is copied: cycles resolve to `dst`.
        let dst = Pointer::new(Value::invalid());
        self.visited
            .insert(src.addr(), (src.clone(), dst.clone()));

        let pointee = {
            let guard = src.read();
            self.copy(&guard)?
        };
        *dst.write() = pointee;
        Ok(dst)
    }
}

/// Deep copy of a value graph.
///
/// # Example
///
/// ```rust
/// use typereg::{deep_copy, RecordBuilder, PrimitiveKind, Value};
///
/// let node = RecordBuilder::new("Node")
///     .namespace("acme/list")
///     .field("n", PrimitiveKind::Int)
///     .self_field("next")
///     .build();
///
/// // n.next = &n
/// let head = Value::pointer_to(Value::record(&node, vec![Value::int(1), Value::null(&node)]));
/// let cell = head.as_pointer().unwrap().clone();
/// cell.write().set_field("next", head.clone()).unwrap();
///
/// let copy = deep_copy(&head).unwrap();
/// let copied_cell = copy.as_pointer().unwrap();
/// let next = copied_cell.read().field("next").unwrap().as_pointer().unwrap().clone();
/// assert!(next.ptr_eq(copied_cell));
/// assert!(!next.ptr_eq(&cell));
/// ```
pub fn deep_copy(src: &Value) -> Result<Value> {
    CopyContext::new().copy(src)
}
