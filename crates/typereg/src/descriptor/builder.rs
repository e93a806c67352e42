// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for record descriptors.
//!
//! This is the per-type registration function a type's owner writes by hand:
//!
//! ```rust
//! use typereg::{PrimitiveKind, RecordBuilder};
//!
//! let node = RecordBuilder::new("Node")
//!     .namespace("github.com/acme/list")
//!     .field("value", PrimitiveKind::I64)
//!     .self_field("next")
//!     .build();
//!
//! assert_eq!(node.fields().len(), 2);
//! ```

use crate::descriptor::{FieldDescriptor, PrimitiveKind, TypeDescriptor, Visibility};
use std::sync::Arc;

#[derive(Debug)]
enum PendingField {
    Ready(FieldDescriptor),
    /// Reference back to the record under construction.
    SelfRef {
        name: String,
        visibility: Visibility,
    },
}

/// Builder for creating record descriptors.
#[derive(Debug)]
pub struct RecordBuilder {
    name: String,
    namespace: String,
    fields: Vec<PendingField>,
}

impl RecordBuilder {
    /// Create a new builder for a named record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            fields: Vec::new(),
        }
    }

    /// Create a builder for an anonymous record (`struct { ... }`).
    pub fn anonymous() -> Self {
        Self::new("")
    }

    /// Set the owning namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, TypeDescriptor::primitive(kind))
    }

    /// Add a private primitive field.
    pub fn private_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.private_field_with_type(name, TypeDescriptor::primitive(kind))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields
            .push(PendingField::Ready(FieldDescriptor::new(name, type_desc)));
        self
    }

    /// Add a private field with a type descriptor.
    pub fn private_field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(PendingField::Ready(
            FieldDescriptor::new(name, type_desc).private(),
        ));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add a sequence field.
    pub fn sequence_field(self, name: impl Into<String>, element_kind: PrimitiveKind) -> Self {
        let element_type = TypeDescriptor::primitive(element_kind);
        self.field_with_type(name, TypeDescriptor::sequence(&element_type))
    }

    /// Add an array field.
    pub fn array_field(
        self,
        name: impl Into<String>,
        element_kind: PrimitiveKind,
        length: usize,
    ) -> Self {
        let element_type = TypeDescriptor::primitive(element_kind);
        self.field_with_type(name, TypeDescriptor::array(&element_type, length))
    }

    /// Add a mapping field.
    pub fn mapping_field(
        self,
        name: impl Into<String>,
        key_kind: PrimitiveKind,
        value_kind: PrimitiveKind,
    ) -> Self {
        let key = TypeDescriptor::primitive(key_kind);
        let value = TypeDescriptor::primitive(value_kind);
        self.field_with_type(name, TypeDescriptor::mapping(&key, &value))
    }

    /// Add a reference field pointing at `target`.
    pub fn reference_field(self, name: impl Into<String>, target: &Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, TypeDescriptor::reference(target))
    }

    /// Add an `interface {}` field.
    pub fn dynamic_field(self, name: impl Into<String>) -> Self {
        self.field_with_type(name, TypeDescriptor::dynamic())
    }

    /// Add a field referencing the record being built.
    ///
    /// Only meaningful for named records; anonymous records cannot refer to
    /// themselves and drop such fields at build time.
    pub fn self_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(PendingField::SelfRef {
            name: name.into(),
            visibility: Visibility::Public,
        });
        self
    }

    /// Add a private field referencing the record being built.
    pub fn private_self_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(PendingField::SelfRef {
            name: name.into(),
            visibility: Visibility::Private,
        });
        self
    }

    /// Build the record descriptor.
    pub fn build(self) -> Arc<TypeDescriptor> {
        let record = TypeDescriptor::declare_record(self.namespace, self.name);
        let anonymous = !record.is_named();
        let mut fields = Vec::with_capacity(self.fields.len());

        for pending in self.fields {
            match pending {
                PendingField::Ready(field) => fields.push(field),
                PendingField::SelfRef { name, .. } if anonymous => {
                    log::warn!(
                        "[builder] anonymous record cannot refer to itself, field '{}' dropped",
                        name
                    );
                }
                PendingField::SelfRef { name, visibility } => {
                    let mut field = FieldDescriptor::new(name, TypeDescriptor::reference(&record));
                    field.visibility = visibility;
                    fields.push(field);
                }
            }
        }

        record.define_fields(fields);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeKind;

    #[test]
    fn test_builder_fields_in_order() {
        let desc = RecordBuilder::new("Reading")
            .namespace("acme/sensors")
            .field("id", PrimitiveKind::U32)
            .string_field("location")
            .sequence_field("samples", PrimitiveKind::F64)
            .array_field("calib", PrimitiveKind::F32, 3)
            .mapping_field("tags", PrimitiveKind::String, PrimitiveKind::String)
            .private_field("secret", PrimitiveKind::U64)
            .build();

        let names: Vec<_> = desc.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["id", "location", "samples", "calib", "tags", "secret"]
        );
        assert!(matches!(
            desc.fields()[3].type_desc.kind,
            TypeKind::Array(ref a) if a.length == 3
        ));
        assert!(!desc.fields()[5].is_public());
        assert_eq!(desc.namespace, "acme/sensors");
    }

    #[test]
    fn test_self_field_points_back() {
        let node = RecordBuilder::new("Node")
            .namespace("acme/list")
            .self_field("next")
            .private_self_field("prev")
            .build();

        let next = &node.fields()[0];
        match &next.type_desc.kind {
            TypeKind::Reference(target) => assert!(Arc::ptr_eq(target, &node)),
            other => panic!("expected reference, got {:?}", other),
        }
        assert!(!node.fields()[1].is_public());
    }

    #[test]
    fn test_anonymous_drops_self_field() {
        let desc = RecordBuilder::anonymous()
            .field("a", PrimitiveKind::Int)
            .self_field("me")
            .build();
        assert_eq!(desc.fields().len(), 1);
        assert!(!desc.is_named());
    }
}
