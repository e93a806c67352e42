// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.
//!
//! A [`TypeDescriptor`] is the uniform description of a type's shape: a
//! [`TypeKind`] tag with its element/key/field descriptors, a declared name
//! (empty for anonymous types) and an owning namespace (empty for builtin
//! and anonymous types).
//!
//! Descriptors are immutable and always shared through `Arc`. Records are
//! the one exception to "fully built at creation": a record may be declared
//! first and have its fields defined once afterwards, which is how
//! self-referential and mutually-referential records are expressed.
//!
//! Two descriptors are the same type when they are structurally identical:
//! named types compare by kind, namespace and name; anonymous types compare
//! their element and field descriptors recursively.

mod builder;

pub use builder::RecordBuilder;

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    /// Native-width signed integer.
    Int,
    I8,
    I16,
    I32,
    I64,
    /// Native-width unsigned integer.
    Uint,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    C64,
    C128,
    String,
}

impl PrimitiveKind {
    /// All primitive kinds, in builtin registration order.
    pub const ALL: [PrimitiveKind; 16] = [
        Self::Bool,
        Self::Int,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::Uint,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::C64,
        Self::C128,
        Self::String,
    ];

    /// Builtin type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::Uint => "uint",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::C64 => "complex64",
            Self::C128 => "complex128",
            Self::String => "string",
        }
    }

    /// Width in bits (None for bool and string).
    pub fn bits(self) -> Option<u32> {
        match self {
            Self::Bool | Self::String => None,
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 | Self::F32 => Some(32),
            Self::Int | Self::Uint | Self::I64 | Self::U64 | Self::F64 | Self::C64 => Some(64),
            Self::C128 => Some(128),
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::Int | Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, Self::Uint | Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Self::C64 | Self::C128)
    }
}

/// Field visibility.
///
/// Private fields are never written by the copy engine or the instantiator
/// and make everything below them read-only for the settability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Type of the absent value.
    Invalid,
    /// Boolean, integer, float, complex or text.
    Primitive(PrimitiveKind),
    /// Array (fixed length).
    Array(ArrayDescriptor),
    /// Sequence (dynamic length).
    Sequence(SequenceDescriptor),
    /// Associative mapping.
    Mapping(MappingDescriptor),
    /// Record with ordered named fields.
    Record(RecordDescriptor),
    /// Reference to a value of the target type.
    Reference(Arc<TypeDescriptor>),
    /// Polymorphic container holding a value of any concrete type.
    Dynamic(DynamicDescriptor),
    /// Bidirectional (or directed) channel.
    Channel(ChannelDescriptor),
    /// Callable value.
    Callable(CallableDescriptor),
    /// Raw memory handle, never instantiated nor copied.
    Opaque,
}

impl TypeKind {
    /// Short kind name used in diagnostics and errors.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Primitive(p) => p.name(),
            Self::Array(_) => "array",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Record(_) => "record",
            Self::Reference(_) => "reference",
            Self::Dynamic(_) => "dynamic",
            Self::Channel(_) => "channel",
            Self::Callable(_) => "callable",
            Self::Opaque => "opaque",
        }
    }
}

/// A complete type descriptor.
pub struct TypeDescriptor {
    /// Declared name (empty for anonymous types).
    pub name: String,
    /// Owning namespace, e.g. `github.com/acme/model` (empty for builtins).
    pub namespace: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create an anonymous type descriptor.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            name: String::new(),
            namespace: String::new(),
            kind,
        }
    }

    /// Create a named type descriptor.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
        }
    }

    /// Descriptor of the absent value (shared).
    pub fn invalid() -> Arc<Self> {
        static INVALID: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        Arc::clone(INVALID.get_or_init(|| Arc::new(Self::new(TypeKind::Invalid))))
    }

    /// Builtin primitive type, named after its kind.
    pub fn primitive(kind: PrimitiveKind) -> Arc<Self> {
        Arc::new(Self::named("", kind.name(), TypeKind::Primitive(kind)))
    }

    /// `[length]element`
    pub fn array(element: &Arc<Self>, length: usize) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Array(ArrayDescriptor::new(
            Arc::clone(element),
            length,
        ))))
    }

    /// `[]element`
    pub fn sequence(element: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Sequence(SequenceDescriptor::new(
            Arc::clone(element),
        ))))
    }

    /// `map[key]value`
    pub fn mapping(key: &Arc<Self>, value: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Mapping(MappingDescriptor::new(
            Arc::clone(key),
            Arc::clone(value),
        ))))
    }

    /// `*target`
    pub fn reference(target: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Reference(Arc::clone(target))))
    }

    /// Anonymous record with the given fields.
    pub fn record(fields: Vec<FieldDescriptor>) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Record(RecordDescriptor::defined(fields))))
    }

    /// Named record whose fields are supplied later with [`define_fields`].
    ///
    /// [`define_fields`]: TypeDescriptor::define_fields
    pub fn declare_record(namespace: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::named(
            namespace,
            name,
            TypeKind::Record(RecordDescriptor::declared()),
        ))
    }

    /// `interface {}`
    pub fn dynamic() -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Dynamic(DynamicDescriptor::default())))
    }

    /// `chan element`
    pub fn channel(element: &Arc<Self>, dir: ChannelDir) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Channel(ChannelDescriptor::new(
            Arc::clone(element),
            dir,
        ))))
    }

    /// `func(params) results`
    pub fn callable(params: Vec<Arc<Self>>, results: Vec<Arc<Self>>) -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Callable(CallableDescriptor::new(
            params, results,
        ))))
    }

    /// Raw memory handle.
    pub fn opaque() -> Arc<Self> {
        Arc::new(Self::new(TypeKind::Opaque))
    }

    /// Check if this type has a declared name.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// Check if this is a record type.
    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record(_))
    }

    /// Check if this is a reference type.
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, TypeKind::Reference(_))
    }

    /// Record fields (empty for non-records and undefined records).
    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            TypeKind::Record(record) => record.fields(),
            _ => &[],
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    /// Define the fields of a declared record.
    ///
    /// Returns `false` if this is not a record or its fields are already
    /// defined; the descriptor is left untouched in that case.
    pub fn define_fields(&self, fields: Vec<FieldDescriptor>) -> bool {
        match &self.kind {
            TypeKind::Record(record) => record.fields.set(fields).is_ok(),
            _ => false,
        }
    }

    /// Element descriptor of arrays, sequences, channels and references
    /// (the value type for mappings).
    pub fn element(&self) -> Option<&Arc<TypeDescriptor>> {
        match &self.kind {
            TypeKind::Array(a) => Some(&a.element_type),
            TypeKind::Sequence(s) => Some(&s.element_type),
            TypeKind::Mapping(m) => Some(&m.value_type),
            TypeKind::Reference(target) => Some(target),
            TypeKind::Channel(c) => Some(&c.element_type),
            _ => None,
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        if self.is_named() || other.is_named() {
            return self.name == other.name
                && self.namespace == other.namespace
                && std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind);
        }
        self.kind == other.kind
    }
}

impl Eq for TypeDescriptor {}

// Debug goes through Display: record fields may point back at the record.
impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self)
    }
}

/// Field descriptor for record members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Field visibility.
    pub visibility: Visibility,
}

impl FieldDescriptor {
    /// Create a new public field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
            visibility: Visibility::Public,
        }
    }

    /// Mark as private.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Record type descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordDescriptor {
    fields: OnceLock<Vec<FieldDescriptor>>,
}

impl RecordDescriptor {
    /// Record with fields known up front.
    pub fn defined(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields: OnceLock::from(fields),
        }
    }

    /// Record whose fields are defined later.
    pub fn declared() -> Self {
        Self::default()
    }

    /// Ordered fields (empty until defined).
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.fields.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_defined(&self) -> bool {
        self.fields.get().is_some()
    }
}

/// Sequence type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl SequenceDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>) -> Self {
        Self { element_type }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Mapping type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDescriptor {
    pub key_type: Arc<TypeDescriptor>,
    pub value_type: Arc<TypeDescriptor>,
}

impl MappingDescriptor {
    pub fn new(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        Self {
            key_type,
            value_type,
        }
    }
}

/// Polymorphic container descriptor.
///
/// The method set only contributes to the structural name; any concrete
/// value can be stored in a dynamic container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicDescriptor {
    pub methods: Vec<String>,
}

impl DynamicDescriptor {
    pub fn with_methods(methods: Vec<String>) -> Self {
        Self { methods }
    }
}

/// Channel type descriptor.
///
/// Buffer capacity is a property of each channel value, not of its type.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescriptor {
    pub element_type: Arc<TypeDescriptor>,
    pub dir: ChannelDir,
}

impl ChannelDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>, dir: ChannelDir) -> Self {
        Self { element_type, dir }
    }
}

/// Callable type descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallableDescriptor {
    pub params: Vec<Arc<TypeDescriptor>>,
    pub results: Vec<Arc<TypeDescriptor>>,
}

impl CallableDescriptor {
    pub fn new(params: Vec<Arc<TypeDescriptor>>, results: Vec<Arc<TypeDescriptor>>) -> Self {
        Self { params, results }
    }
}
