// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Settability probe.
//!
//! A leaf is writable when it is reached through a storage location
//! (an addressable root, a reference pointee or a sequence element) and no
//! private field lies on the path to it. Mapping values and dynamic
//! contents are copies and never writable in place; mapping keys are not
//! visited.

use crate::value::{Data, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
struct Access {
    addressable: bool,
    read_only: bool,
}

impl Access {
    fn settable(self) -> bool {
        self.addressable && !self.read_only
    }

    fn through_storage(self) -> Self {
        Self {
            addressable: true,
            ..self
        }
    }

    fn detached(self) -> Self {
        Self {
            addressable: false,
            ..self
        }
    }
}

#[derive(Default)]
struct Probe {
    seen: HashSet<usize>,
}

impl Probe {
    fn visit(&mut self, value: &Value, access: Access) -> bool {
        match value.data() {
            Data::Array(items) => items.iter().any(|v| self.visit(v, access)),
            Data::Sequence(Some(seq)) => {
                let access = access.through_storage();
                seq.iter().any(|v| self.visit(v, access))
            }
            Data::Mapping(Some(map)) => {
                let access = access.detached();
                map.values().any(|v| self.visit(v, access))
            }
            Data::Dynamic(Some(inner)) => self.visit(inner, access.detached()),
            Data::Reference(Some(pointer)) => {
                if !self.seen.insert(pointer.addr()) {
                    return false;
                }
                let pointee = pointer.read();
                self.visit(&pointee, access.through_storage())
            }
            Data::Record(fields) => value
                .ty()
                .fields()
                .iter()
                .zip(fields)
                .any(|(desc, field)| {
                    let access = Access {
                        read_only: access.read_only || !desc.is_public(),
                        ..access
                    };
                    self.visit(field, access)
                }),
            Data::Sequence(None)
            | Data::Mapping(None)
            | Data::Dynamic(None)
            | Data::Reference(None)
            | Data::Invalid => false,
            _ => access.settable(),
        }
    }
}

/// Check whether any leaf reachable from `value` can be written.
///
/// Returns `false` for values whose every field is private, such as an
/// error value.
///
/// # Example
///
/// ```rust
/// use typereg::{any_settable, builtins::error_value, make, RecordBuilder};
///
/// let user = RecordBuilder::new("User").string_field("name").build();
/// assert!(any_settable(&make(&user).unwrap()));
/// assert!(!any_settable(&error_value("boom")));
/// ```
pub fn any_settable(value: &Value) -> bool {
    let root = Access {
        addressable: value.is_addressable(),
        read_only: false,
    };
    Probe::default().visit(value, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PrimitiveKind, RecordBuilder, TypeDescriptor};
    use crate::instantiate::make_fresh;

    #[test]
    fn test_literals_are_not_settable() {
        assert!(!any_settable(&Value::int(1)));
        let int = TypeDescriptor::primitive(PrimitiveKind::Int);
        assert!(any_settable(&make_fresh(&int, 0).unwrap()));
    }

    #[test]
    fn test_pointee_is_settable() {
        let rec = RecordBuilder::new("TestInterface")
            .namespace("acme/probe")
            .string_field("Name")
            .dynamic_field("Int")
            .build();
        let fields = vec![Value::text("foo"), Value::dynamic(None)];
        let v = Value::pointer_to(Value::record(&rec, fields));
        assert!(any_settable(&v));
    }

    #[test]
    fn test_private_path_is_read_only() {
        let inner = RecordBuilder::new("Inner").string_field("visible").build();
        let outer = RecordBuilder::new("Outer")
            .private_field_with_type("hidden", TypeDescriptor::reference(&inner))
            .build();
        let v = Value::pointer_to(Value::record(
            &outer,
            vec![Value::pointer_to(Value::record(&inner, vec![Value::text("x")]))],
        ));
        assert!(!any_settable(&v));
    }

    #[test]
    fn test_mapping_values_are_copies() {
        let s = TypeDescriptor::primitive(PrimitiveKind::String);
        let map = Value::mapping(&s, &s, [(Value::text("k"), Value::text("v"))]);
        assert!(!any_settable(&Value::pointer_to(map)));

        let seq = Value::sequence(&s, vec![Value::text("a")]);
        assert!(any_settable(&seq));
    }

    #[test]
    fn test_cycle_terminates() {
        let node = RecordBuilder::new("Node")
            .private_self_field("next")
            .build();
        let head = Value::pointer_to(Value::record(&node, vec![Value::null(&node)]));
        head.as_pointer()
            .unwrap()
            .write()
            .set_field("next", head.clone())
            .unwrap();
        assert!(!any_settable(&head));
    }
}
