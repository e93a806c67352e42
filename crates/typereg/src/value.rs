// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime values.
//!
//! A [`Value`] bundles a [`TypeDescriptor`] with its data. Cloning a value
//! is a shallow copy: references, channels and callables keep pointing at
//! the same storage (use [`deep_copy`](crate::deep_copy) to detach a graph).
//!
//! Reference cells are `Arc<RwLock<Value>>`; two references alias when they
//! share the same allocation, and [`Pointer::addr`] is that allocation's
//! identity.

use crate::descriptor::{PrimitiveKind, TypeDescriptor, TypeKind};
use crate::error::{Error, Result};
use crate::name::canonical_name;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Complex number (both `complex64` and `complex128` are stored widened).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// Shared, mutable reference cell.
#[derive(Clone)]
pub struct Pointer(Arc<RwLock<Value>>);

impl Pointer {
    /// Allocate a new cell holding `value`.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(RwLock::new(value.into_addressable())))
    }

    /// Shared access to the pointee.
    ///
    /// The lock may be taken recursively, so walking a cyclic graph from a
    /// single thread never deadlocks on its own reads.
    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.0.read_recursive()
    }

    /// Exclusive access to the pointee.
    pub fn write(&self) -> RwLockWriteGuard<'_, Value> {
        self.0.write()
    }

    /// Check if both pointers refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the cell.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

// The pointee may point back here.
impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({:#x})", self.addr())
    }
}

struct ChannelInner {
    sender: Sender<Value>,
    receiver: Receiver<Value>,
    capacity: usize,
}

/// Bidirectional channel of values.
///
/// A capacity of zero is a rendezvous channel: `try_send` only succeeds
/// while a receiver is blocked on the other end.
#[derive(Clone)]
pub struct Channel(Arc<ChannelInner>);

impl Channel {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self(Arc::new(ChannelInner {
            sender,
            receiver,
            capacity,
        }))
    }

    /// Buffer capacity.
    pub fn capacity(&self) -> usize {
        self.0.capacity
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        self.0.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.receiver.is_empty()
    }

    /// Enqueue without blocking; returns the value back if the buffer is full.
    pub fn try_send(&self, value: Value) -> core::result::Result<(), Value> {
        self.0.sender.try_send(value).map_err(|e| match e {
            TrySendError::Full(v) | TrySendError::Disconnected(v) => v,
        })
    }

    /// Dequeue without blocking.
    pub fn try_recv(&self) -> Option<Value> {
        match self.0.receiver.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

/// Native function body of a callable value.
pub type NativeFn = dyn Fn(&[Value]) -> Vec<Value> + Send + Sync;

/// Callable value: shared code, never duplicated.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl Callable {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    /// Fully-qualified function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Vec<Value> {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// Growable sequence with an explicit capacity.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    items: Vec<Value>,
    capacity: usize,
}

impl Sequence {
    pub fn new(items: Vec<Value>) -> Self {
        let capacity = items.len();
        Self { items, capacity }
    }

    /// Sequence of `items` with at least `capacity` reserved.
    pub fn with_capacity(items: Vec<Value>, capacity: usize) -> Self {
        let capacity = capacity.max(items.len());
        Self { items, capacity }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.max(self.items.len())
    }

    pub fn push(&mut self, value: Value) {
        if self.items.len() == self.capacity {
            self.capacity = (self.capacity * 2).max(1);
        }
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

/// Mapping key.
///
/// Keys compare by content; references, channels and callables compare by
/// identity. Floats compare by bit pattern so that hashing stays
/// consistent with equality.
#[derive(Debug, Clone)]
pub struct MapKey(pub Value);

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        key_eq(&self.0, &other.0)
    }
}

impl Eq for MapKey {}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        key_hash(&self.0, state);
    }
}

fn key_eq(a: &Value, b: &Value) -> bool {
    if a.ty != b.ty {
        return false;
    }
    match (&a.data, &b.data) {
        (Data::Invalid, Data::Invalid) => true,
        (Data::Bool(x), Data::Bool(y)) => x == y,
        (Data::Int(x), Data::Int(y)) => x == y,
        (Data::Uint(x), Data::Uint(y)) => x == y,
        (Data::Float(x), Data::Float(y)) => x.to_bits() == y.to_bits(),
        (Data::Complex(x), Data::Complex(y)) => {
            x.re.to_bits() == y.re.to_bits() && x.im.to_bits() == y.im.to_bits()
        }
        (Data::Text(x), Data::Text(y)) => x == y,
        (Data::Array(x), Data::Array(y)) | (Data::Record(x), Data::Record(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| key_eq(l, r))
        }
        (Data::Sequence(x), Data::Sequence(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| key_eq(l, r))
            }
            _ => false,
        },
        (Data::Mapping(x), Data::Mapping(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => {
                x.len() == y.len()
                    && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| key_eq(v, w)))
            }
            _ => false,
        },
        (Data::Reference(x), Data::Reference(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => x.ptr_eq(y),
            _ => false,
        },
        (Data::Dynamic(x), Data::Dynamic(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => key_eq(x, y),
            _ => false,
        },
        (Data::Channel(x), Data::Channel(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => x.ptr_eq(y),
            _ => false,
        },
        (Data::Callable(x), Data::Callable(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => x.ptr_eq(y),
            _ => false,
        },
        (Data::Opaque(x), Data::Opaque(y)) => x == y,
        _ => false,
    }
}

fn key_hash<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(&value.data).hash(state);
    match &value.data {
        Data::Invalid => {}
        Data::Bool(v) => v.hash(state),
        Data::Int(v) => v.hash(state),
        Data::Uint(v) => v.hash(state),
        Data::Float(v) => v.to_bits().hash(state),
        Data::Complex(c) => {
            c.re.to_bits().hash(state);
            c.im.to_bits().hash(state);
        }
        Data::Text(s) => s.hash(state),
        Data::Array(items) | Data::Record(items) => {
            for item in items {
                key_hash(item, state);
            }
        }
        Data::Sequence(seq) => seq.as_ref().map(Sequence::len).hash(state),
        Data::Mapping(map) => map.as_ref().map(Mapping::len).hash(state),
        Data::Reference(ptr) => ptr.as_ref().map(Pointer::addr).hash(state),
        Data::Dynamic(inner) => {
            if let Some(inner) = inner {
                key_hash(inner, state);
            }
        }
        Data::Channel(ch) => ch.as_ref().map(Channel::addr).hash(state),
        Data::Callable(f) => f.as_ref().map(Callable::addr).hash(state),
        Data::Opaque(v) => v.hash(state),
    }
}

/// Associative mapping.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: HashMap<MapKey, Value>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(MapKey(key), value)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(&MapKey(key.clone()))
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(&MapKey(key.clone()))
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries.remove(&MapKey(key.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (&k.0, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
}

/// Value storage, one variant per kind.
#[derive(Debug, Clone)]
pub enum Data {
    Invalid,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex),
    Text(String),
    Array(Vec<Value>),
    /// `None` is the null sequence.
    Sequence(Option<Sequence>),
    /// `None` is the null mapping.
    Mapping(Option<Mapping>),
    /// Field values, in descriptor order.
    Record(Vec<Value>),
    Reference(Option<Pointer>),
    Dynamic(Option<Box<Value>>),
    Channel(Option<Channel>),
    Callable(Option<Callable>),
    /// Raw memory handle.
    Opaque(u64),
}

/// A typed runtime value.
#[derive(Debug, Clone)]
pub struct Value {
    ty: Arc<TypeDescriptor>,
    data: Data,
    addressable: bool,
}

macro_rules! primitive_ctor {
    ($($(#[$doc:meta])* $fn:ident($arg:ty) => $kind:ident, $variant:ident $(as $cast:ty)?;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn(v: $arg) -> Self {
                Self::from_parts(
                    TypeDescriptor::primitive(PrimitiveKind::$kind),
                    Data::$variant(v $(as $cast)?),
                )
            }
        )*
    };
}

impl Value {
    /// Assemble a value from a descriptor and matching data.
    ///
    /// The data is not checked against the descriptor.
    pub fn from_parts(ty: Arc<TypeDescriptor>, data: Data) -> Self {
        Self {
            ty,
            data,
            addressable: false,
        }
    }

    /// The absent value.
    pub fn invalid() -> Self {
        Self::from_parts(TypeDescriptor::invalid(), Data::Invalid)
    }

    primitive_ctor! {
        bool(bool) => Bool, Bool;
        int(i64) => Int, Int;
        i8(i8) => I8, Int as i64;
        i16(i16) => I16, Int as i64;
        i32(i32) => I32, Int as i64;
        i64(i64) => I64, Int;
        uint(u64) => Uint, Uint;
        u8(u8) => U8, Uint as u64;
        u16(u16) => U16, Uint as u64;
        u32(u32) => U32, Uint as u64;
        u64(u64) => U64, Uint;
        f32(f32) => F32, Float as f64;
        f64(f64) => F64, Float;
    }

    /// `complex128` value.
    pub fn complex(re: f64, im: f64) -> Self {
        Self::from_parts(
            TypeDescriptor::primitive(PrimitiveKind::C128),
            Data::Complex(Complex::new(re, im)),
        )
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::from_parts(
            TypeDescriptor::primitive(PrimitiveKind::String),
            Data::Text(s.into()),
        )
    }

    /// `[len(items)]element`
    pub fn array(element: &Arc<TypeDescriptor>, items: Vec<Value>) -> Self {
        Self::from_parts(
            TypeDescriptor::array(element, items.len()),
            Data::Array(items),
        )
    }

    /// `[]element`
    pub fn sequence(element: &Arc<TypeDescriptor>, items: Vec<Value>) -> Self {
        Self::from_parts(
            TypeDescriptor::sequence(element),
            Data::Sequence(Some(Sequence::new(items))),
        )
    }

    /// `map[key]value`
    pub fn mapping<I>(key: &Arc<TypeDescriptor>, value: &Arc<TypeDescriptor>, entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut mapping = Mapping::new();
        for (k, v) in entries {
            mapping.insert(k, v);
        }
        Self::from_parts(
            TypeDescriptor::mapping(key, value),
            Data::Mapping(Some(mapping)),
        )
    }

    /// Record value with fields in descriptor order.
    pub fn record(ty: &Arc<TypeDescriptor>, fields: Vec<Value>) -> Self {
        Self::from_parts(Arc::clone(ty), Data::Record(fields))
    }

    /// Reference to a new cell holding `value`.
    pub fn pointer_to(value: Value) -> Self {
        let ty = TypeDescriptor::reference(&value.ty);
        Self::from_parts(ty, Data::Reference(Some(Pointer::new(value))))
    }

    /// Reference sharing an existing cell.
    pub fn reference(ty: &Arc<TypeDescriptor>, pointer: Pointer) -> Self {
        Self::from_parts(Arc::clone(ty), Data::Reference(Some(pointer)))
    }

    /// Null reference to `target`.
    pub fn null(target: &Arc<TypeDescriptor>) -> Self {
        Self::from_parts(TypeDescriptor::reference(target), Data::Reference(None))
    }

    /// `interface {}` holding `inner` (or nothing).
    pub fn dynamic(inner: Option<Value>) -> Self {
        Self::from_parts(TypeDescriptor::dynamic(), Data::Dynamic(inner.map(Box::new)))
    }

    /// Named callable.
    pub fn callable<F>(
        name: &str,
        params: Vec<Arc<TypeDescriptor>>,
        results: Vec<Arc<TypeDescriptor>>,
        func: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::from_parts(
            TypeDescriptor::callable(params, results),
            Data::Callable(Some(Callable::new(name, func))),
        )
    }

    /// `chan element` with the given buffer capacity.
    pub fn channel(element: &Arc<TypeDescriptor>, capacity: usize) -> Self {
        Self::from_parts(
            TypeDescriptor::channel(element, crate::descriptor::ChannelDir::Both),
            Data::Channel(Some(Channel::new(capacity))),
        )
    }

    /// Type descriptor.
    pub fn ty(&self) -> &Arc<TypeDescriptor> {
        &self.ty
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Raw mutable access to the data; the caller keeps it consistent
    /// with the descriptor.
    pub fn data_mut(&mut self) -> &mut Data {
        &mut self.data
    }

    /// Check if this is not the absent value.
    pub fn is_valid(&self) -> bool {
        !matches!(self.data, Data::Invalid)
    }

    /// Check if the value is a storage location of its own.
    pub fn is_addressable(&self) -> bool {
        self.addressable
    }

    pub(crate) fn into_addressable(mut self) -> Self {
        self.addressable = true;
        self
    }

    /// Check for a null reference, sequence, mapping, channel, callable or
    /// empty dynamic container.
    pub fn is_null(&self) -> bool {
        matches!(
            self.data,
            Data::Sequence(None)
                | Data::Mapping(None)
                | Data::Reference(None)
                | Data::Dynamic(None)
                | Data::Channel(None)
                | Data::Callable(None)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            Data::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self.data {
            Data::Uint(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.data {
            Data::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&Pointer> {
        match &self.data {
            Data::Reference(Some(p)) => Some(p),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.data {
            Data::Sequence(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match &mut self.data {
            Data::Sequence(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match &self.data {
            Data::Mapping(Some(m)) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match &mut self.data {
            Data::Mapping(Some(m)) => Some(m),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&Channel> {
        match &self.data {
            Data::Channel(Some(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match &self.data {
            Data::Callable(Some(c)) => Some(c),
            _ => None,
        }
    }

    /// Value held by a dynamic container.
    pub fn as_dynamic(&self) -> Option<&Value> {
        match &self.data {
            Data::Dynamic(Some(inner)) => Some(inner),
            _ => None,
        }
    }

    /// Array, sequence or record element by position.
    pub fn index(&self, i: usize) -> Option<&Value> {
        match &self.data {
            Data::Array(items) | Data::Record(items) => items.get(i),
            Data::Sequence(Some(seq)) => seq.get(i),
            _ => None,
        }
    }

    pub fn index_mut(&mut self, i: usize) -> Option<&mut Value> {
        match &mut self.data {
            Data::Array(items) | Data::Record(items) => items.get_mut(i),
            Data::Sequence(Some(seq)) => seq.get_mut(i),
            _ => None,
        }
    }

    /// Record field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let index = self.ty.field_index(name)?;
        match &self.data {
            Data::Record(fields) => fields.get(index),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.ty.field_index(name)?;
        match &mut self.data {
            Data::Record(fields) => fields.get_mut(index),
            _ => None,
        }
    }

    /// Assign `value` into the named record field (type-checked).
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        self.field_mut(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?
            .set(value)
    }

    /// Assign `value` into this storage location.
    ///
    /// The value must have the same type, except that a dynamic container
    /// accepts a value of any type and wraps it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typereg::{PrimitiveKind, TypeDescriptor, Value};
    ///
    /// let mut slot = Value::int(0);
    /// slot.set(Value::int(42)).unwrap();
    /// assert_eq!(slot.as_int(), Some(42));
    /// assert!(slot.set(Value::text("no")).is_err());
    /// ```
    pub fn set(&mut self, value: Value) -> Result<()> {
        if self.ty == value.ty {
            self.data = value.data;
            return Ok(());
        }
        if matches!(self.ty.kind, TypeKind::Dynamic(_)) && value.is_valid() {
            self.data = Data::Dynamic(Some(Box::new(value)));
            return Ok(());
        }
        Err(Error::TypeMismatch {
            expected: canonical_name(&self.ty),
            got: canonical_name(&value.ty),
        })
    }

    /// Structural equality that follows references.
    ///
    /// Reference pairs already under comparison are assumed equal, so cyclic
    /// graphs terminate. Channels and callables compare by identity.
    pub fn deep_eq(&self, other: &Value) -> bool {
        deep_eq(self, other, &mut HashSet::new())
    }
}

fn deep_eq(a: &Value, b: &Value, visited: &mut HashSet<(usize, usize)>) -> bool {
    if a.ty != b.ty {
        return false;
    }
    match (&a.data, &b.data) {
        (Data::Array(x), Data::Array(y)) | (Data::Record(x), Data::Record(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_eq(l, r, visited))
        }
        (Data::Sequence(Some(x)), Data::Sequence(Some(y))) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(l, r)| deep_eq(l, r, visited))
        }
        (Data::Mapping(Some(x)), Data::Mapping(Some(y))) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| deep_eq(v, w, visited)))
        }
        (Data::Reference(Some(x)), Data::Reference(Some(y))) => {
            if x.ptr_eq(y) || !visited.insert((x.addr(), y.addr())) {
                return true;
            }
            let (l, r) = (x.read(), y.read());
            deep_eq(&l, &r, visited)
        }
        (Data::Dynamic(Some(x)), Data::Dynamic(Some(y))) => deep_eq(x, y, visited),
        _ => key_eq(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_checks_type() {
        let mut v = Value::u8(1);
        assert!(v.set(Value::u8(9)).is_ok());
        assert_eq!(v.as_uint(), Some(9));

        let err = v.set(Value::u16(9)).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "uint8".into(),
                got: "uint16".into()
            }
        );
    }

    #[test]
    fn test_dynamic_accepts_any() {
        let mut holder = Value::dynamic(None);
        assert!(holder.is_null());
        holder.set(Value::text("inside")).unwrap();
        assert_eq!(holder.as_dynamic().and_then(Value::as_str), Some("inside"));
    }

    #[test]
    fn test_sequence_capacity_grows() {
        let mut seq = Sequence::with_capacity(Vec::new(), 2);
        assert_eq!(seq.capacity(), 2);
        seq.push(Value::int(1));
        seq.push(Value::int(2));
        seq.push(Value::int(3));
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.capacity(), 4);
    }

    #[test]
    fn test_map_keys() {
        let float = TypeDescriptor::primitive(PrimitiveKind::F64);
        let mut map = Value::mapping(&float, &float, [(Value::f64(0.0), Value::f64(1.0))]);
        let m = map.as_mapping_mut().unwrap();
        m.insert(Value::f64(-0.0), Value::f64(2.0));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&Value::f64(0.0)).and_then(Value::as_float), Some(1.0));

        let int = TypeDescriptor::primitive(PrimitiveKind::Int);
        let a = Value::pointer_to(Value::int(1));
        let b = Value::pointer_to(Value::int(1));
        let ptr_ty = TypeDescriptor::reference(&int);
        let mut by_ref = Value::mapping(&ptr_ty, &int, [(a.clone(), Value::int(10))]);
        let m = by_ref.as_mapping_mut().unwrap();
        m.insert(b.clone(), Value::int(20));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&a).and_then(Value::as_int), Some(10));
        assert_eq!(m.get(&b).and_then(Value::as_int), Some(20));
    }

    #[test]
    fn test_pointer_identity() {
        let a = Value::pointer_to(Value::int(1));
        let alias = a.clone();
        let other = Value::pointer_to(Value::int(1));
        let (pa, palias, pother) = (
            a.as_pointer().unwrap(),
            alias.as_pointer().unwrap(),
            other.as_pointer().unwrap(),
        );
        assert!(pa.ptr_eq(palias));
        assert!(!pa.ptr_eq(pother));
        assert!(a.deep_eq(&other));

        pother.write().set(Value::int(2)).unwrap();
        assert!(!a.deep_eq(&other));
        assert!(format!("{:?}", pa).starts_with("Pointer(0x"));
    }

    #[test]
    fn test_channel_buffer() {
        let bool_ty = TypeDescriptor::primitive(PrimitiveKind::Bool);
        let ch = Value::channel(&bool_ty, 1);
        let ch = ch.as_channel().unwrap();
        assert_eq!(ch.capacity(), 1);
        assert!(ch.try_send(Value::bool(true)).is_ok());
        assert!(ch.try_send(Value::bool(false)).is_err());
        assert_eq!(ch.len(), 1);
        assert_eq!(ch.try_recv().and_then(|v| v.as_bool()), Some(true));
        assert!(ch.is_empty());

        let rendezvous = Channel::new(0);
        assert!(rendezvous.try_send(Value::bool(true)).is_err());
    }

    #[test]
    fn test_callable_call() {
        let int = TypeDescriptor::primitive(PrimitiveKind::Int);
        let params = vec![Arc::clone(&int)];
        let double = Value::callable("acme.double", params, vec![int], |args| {
            vec![Value::int(args[0].as_int().unwrap_or(0) * 2)]
        });
        let f = double.as_callable().unwrap();
        assert_eq!(f.call(&[Value::int(21)])[0].as_int(), Some(42));
        assert!(f.ptr_eq(double.clone().as_callable().unwrap()));
    }
}
