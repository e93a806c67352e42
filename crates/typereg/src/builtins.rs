// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builtin type set.
//!
//! Registered by [`TypeRegistry::with_builtins`](crate::TypeRegistry::with_builtins):
//! every primitive and a reference to it, `[]uint8`, `[]string`,
//! `struct {}`, `time.Time`, `*time.Time`, `time.Duration`, and the error
//! representation `*errors.errorString` with its aliases `error`,
//! `errors.errorString` and `os.errorString`.

use crate::descriptor::{PrimitiveKind, RecordBuilder, TypeDescriptor, TypeKind};
use crate::registry::TypeRegistry;
use crate::value::Value;
use std::sync::{Arc, OnceLock};

/// Names under which the error representation is also reachable.
pub const ERROR_ALIASES: [&str; 3] = ["os.errorString", "error", "errors.errorString"];

/// `errors.errorString { s string }` (private field).
pub fn error_string_type() -> Arc<TypeDescriptor> {
    static TYPE: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
    Arc::clone(TYPE.get_or_init(|| {
        RecordBuilder::new("errorString")
            .namespace("errors")
            .private_field("s", PrimitiveKind::String)
            .build()
    }))
}

/// `*errors.errorString`, the type of error values.
pub fn error_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::reference(&error_string_type())
}

/// Error value carrying `message`.
///
/// The message lives in a private field: the value has nothing settable.
pub fn error_value(message: &str) -> Value {
    Value::pointer_to(Value::record(
        &error_string_type(),
        vec![Value::text(message)],
    ))
}

/// `time.Time { wall uint64; ext int64; loc *time.Location }`.
pub fn time_type() -> Arc<TypeDescriptor> {
    let location = RecordBuilder::new("Location")
        .namespace("time")
        .private_field("name", PrimitiveKind::String)
        .build();
    RecordBuilder::new("Time")
        .namespace("time")
        .private_field("wall", PrimitiveKind::U64)
        .private_field("ext", PrimitiveKind::I64)
        .private_field_with_type("loc", TypeDescriptor::reference(&location))
        .build()
}

/// `time.Duration` (an `int64` count of nanoseconds).
pub fn duration_type() -> Arc<TypeDescriptor> {
    Arc::new(TypeDescriptor::named(
        "time",
        "Duration",
        TypeKind::Primitive(PrimitiveKind::I64),
    ))
}

/// Register the builtin set; returns how many names were new.
pub fn register_builtins(registry: &TypeRegistry) -> usize {
    let mut added = 0;
    let mut insert = |desc: &Arc<TypeDescriptor>| {
        if registry.insert(desc) {
            added += 1;
        }
    };

    let error = error_type();
    insert(&error);

    for kind in PrimitiveKind::ALL {
        let prim = TypeDescriptor::primitive(kind);
        insert(&prim);
        insert(&TypeDescriptor::reference(&prim));
    }

    insert(&TypeDescriptor::sequence(&TypeDescriptor::primitive(
        PrimitiveKind::U8,
    )));
    let time = time_type();
    insert(&time);
    insert(&TypeDescriptor::reference(&time));
    insert(&duration_type());
    insert(&TypeDescriptor::sequence(&TypeDescriptor::primitive(
        PrimitiveKind::String,
    )));
    insert(&TypeDescriptor::record(Vec::new()));

    for alias in ERROR_ALIASES {
        if registry.insert_named(alias, &error) {
            added += 1;
        }
    }

    log::debug!("[builtins] registered {} builtin types", added);
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::canonical_name;

    #[test]
    fn test_builtin_names() {
        let registry = TypeRegistry::new();
        let added = register_builtins(&registry);
        assert_eq!(added, registry.len());

        for name in [
            "*errors.errorString",
            "error",
            "errors.errorString",
            "os.errorString",
            "bool",
            "*bool",
            "int",
            "*uint8",
            "float64",
            "string",
            "*string",
            "[]uint8",
            "[]string",
            "struct {}",
            "time.Time",
            "*time.Time",
            "time.Duration",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }

        assert_eq!(register_builtins(&registry), 0);
    }

    #[test]
    fn test_error_value() {
        let err = error_value("foo");
        assert_eq!(canonical_name(err.ty()), "*errors.errorString");
        let message = err
            .as_pointer()
            .unwrap()
            .read()
            .field("s")
            .and_then(|s| s.as_str().map(str::to_string));
        assert_eq!(message.as_deref(), Some("foo"));
    }
}
