// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Zero, fresh and materialized instances of a type.
//!
//! - [`make_zero`]: the kind's zero value, nothing allocated
//!   (null references, null sequences and mappings).
//! - [`make_fresh`]: like `make_zero`, except the outermost reference,
//!   channel, sequence or mapping is allocated. Fresh references are never
//!   null.
//! - [`make`]: a fresh value whose record fields are materialized
//!   recursively (references allocated, sequences and mappings created).
//!
//! `make` skips a reference field whose pointee is the enclosing record
//! (or a reference to it), leaving it null. Longer cycles (`A -> B -> A`)
//! are not detected and recurse without bound.

use crate::descriptor::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use crate::error::{Error, Result};
use crate::value::{Channel, Complex, Data, Mapping, Pointer, Sequence, Value};
use std::sync::Arc;

/// Zero value of a type.
///
/// Fails only when `desc` itself is opaque or invalid; opaque slots nested
/// inside records and arrays are zeroed to a null handle.
pub fn make_zero(desc: &Arc<TypeDescriptor>) -> Result<Value> {
    if matches!(desc.kind, TypeKind::Invalid | TypeKind::Opaque) {
        return Err(unsupported(desc));
    }
    Ok(zero_value(desc))
}

pub(crate) fn zero_value(desc: &Arc<TypeDescriptor>) -> Value {
    Value::from_parts(Arc::clone(desc), zero_data(desc)).into_addressable()
}

fn zero_data(desc: &TypeDescriptor) -> Data {
    match &desc.kind {
        TypeKind::Invalid => Data::Invalid,
        TypeKind::Opaque => Data::Opaque(0),
        TypeKind::Primitive(p) => zero_primitive(*p),
        TypeKind::Array(a) => {
            Data::Array((0..a.length).map(|_| zero_value(&a.element_type)).collect())
        }
        TypeKind::Record(r) => {
            Data::Record(r.fields().iter().map(|f| zero_value(&f.type_desc)).collect())
        }
        TypeKind::Sequence(_) => Data::Sequence(None),
        TypeKind::Mapping(_) => Data::Mapping(None),
        TypeKind::Reference(_) => Data::Reference(None),
        TypeKind::Dynamic(_) => Data::Dynamic(None),
        TypeKind::Channel(_) => Data::Channel(None),
        TypeKind::Callable(_) => Data::Callable(None),
    }
}

fn zero_primitive(kind: PrimitiveKind) -> Data {
    match kind {
        PrimitiveKind::Bool => Data::Bool(false),
        PrimitiveKind::String => Data::Text(String::new()),
        k if k.is_float() => Data::Float(0.0),
        k if k.is_complex() => Data::Complex(Complex::default()),
        k if k.is_unsigned() => Data::Uint(0),
        _ => Data::Int(0),
    }
}

pub(crate) fn unsupported(desc: &TypeDescriptor) -> Error {
    let tag = desc.kind.tag();
    log::debug!("[instantiate] unsupported kind {} ({})", tag, desc);
    Error::UnsupportedKind(tag.to_string())
}

/// Fresh value of a type.
///
/// References point at a new zero value, channels are created with
/// `capacity` slots (0 is unbuffered), sequences get `capacity` zero
/// elements and mappings are empty. Other kinds are their zero value.
pub fn make_fresh(desc: &Arc<TypeDescriptor>, capacity: usize) -> Result<Value> {
    let data = match &desc.kind {
        TypeKind::Reference(target) => Data::Reference(Some(Pointer::new(zero_value(target)))),
        TypeKind::Channel(_) => Data::Channel(Some(Channel::new(capacity))),
        TypeKind::Sequence(s) => {
            let items = (0..capacity).map(|_| zero_value(&s.element_type)).collect();
            Data::Sequence(Some(Sequence::with_capacity(items, capacity)))
        }
        TypeKind::Mapping(_) => Data::Mapping(Some(Mapping::new())),
        _ => return make_zero(desc),
    };
    Ok(Value::from_parts(Arc::clone(desc), data).into_addressable())
}

/// Fresh value with its record fields materialized.
///
/// # Example
///
/// ```rust
/// use typereg::{make, PrimitiveKind, RecordBuilder, TypeDescriptor};
///
/// let inner = RecordBuilder::new("Inner").field("n", PrimitiveKind::Int).build();
/// let outer = RecordBuilder::new("Outer")
///     .reference_field("inner", &inner)
///     .sequence_field("tags", PrimitiveKind::String)
///     .self_field("next")
///     .build();
///
/// let value = make(&outer).unwrap();
/// assert!(!value.field("inner").unwrap().is_null());
/// assert!(!value.field("tags").unwrap().is_null());
/// assert!(value.field("next").unwrap().is_null());
/// ```
pub fn make(desc: &Arc<TypeDescriptor>) -> Result<Value> {
    let mut value = make_fresh(desc, 0)?;
    materialize(&mut value)?;
    Ok(value)
}

fn materialize(value: &mut Value) -> Result<()> {
    let ty = Arc::clone(value.ty());
    match value.data_mut() {
        Data::Record(slots) => {
            for (field, slot) in ty.fields().iter().zip(slots.iter_mut()) {
                if field.is_public() {
                    materialize_field(&ty, field, slot)?;
                }
            }
        }
        Data::Reference(Some(pointer)) => materialize(&mut pointer.write())?,
        _ => {}
    }
    Ok(())
}

fn materialize_field(
    record: &TypeDescriptor,
    field: &FieldDescriptor,
    slot: &mut Value,
) -> Result<()> {
    match &field.type_desc.kind {
        TypeKind::Reference(target) => {
            if refers_back(record, target) {
                log::debug!(
                    "[instantiate] {}.{} refers back to {}, left null",
                    record,
                    field.name,
                    record
                );
                return Ok(());
            }
            let mut fresh = make_fresh(&field.type_desc, 0)?;
            materialize(&mut fresh)?;
            *slot = fresh;
        }
        TypeKind::Sequence(_) | TypeKind::Mapping(_) => {
            *slot = make_fresh(&field.type_desc, 0)?;
        }
        TypeKind::Record(_) => materialize(slot)?,
        _ => {}
    }
    Ok(())
}

/// `ty` is `record` or a reference to it.
fn refers_back(record: &TypeDescriptor, ty: &TypeDescriptor) -> bool {
    *ty == *record || matches!(&ty.kind, TypeKind::Reference(inner) if **inner == *record)
}

/// Check whether a record (or a reference to one) has a field of its own
/// type or a reference to it.
pub fn is_self_referential(desc: &TypeDescriptor) -> bool {
    let record = match &desc.kind {
        TypeKind::Reference(target) => target.as_ref(),
        _ => desc,
    };
    record.is_record()
        && record
            .fields()
            .iter()
            .any(|f| refers_back(record, &f.type_desc))
}
