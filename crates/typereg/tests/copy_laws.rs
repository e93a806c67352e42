// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity
#![allow(clippy::similar_names)] // Test variable naming
#![allow(clippy::cast_possible_wrap)] // Test conversions

//! Deep-copy laws: cycles, aliasing, independence, mapping isolation.

use std::sync::Arc;
use typereg::{
    any_settable, builtins::error_value, deep_copy, make, PrimitiveKind, RecordBuilder,
    TypeDescriptor, Value,
};

/// `type CopyTextStruct struct { Name string; Val float32; Ref *CopyTextStruct; dummy complex64 }`
fn copy_text_struct() -> Arc<TypeDescriptor> {
    RecordBuilder::new("CopyTextStruct")
        .namespace("github.com/acme/copytest")
        .string_field("Name")
        .field("Val", PrimitiveKind::F32)
        .self_field("Ref")
        .private_field("dummy", PrimitiveKind::C64)
        .build()
}

fn self_referencing(desc: &Arc<TypeDescriptor>, name: &str) -> Value {
    let record = Value::record(
        desc,
        vec![
            Value::text(name),
            Value::f32(2.2),
            Value::null(desc),
            Value::from_parts(
                TypeDescriptor::primitive(PrimitiveKind::C64),
                typereg::Data::Complex(typereg::Complex::new(0.0, 0.0)),
            ),
        ],
    );
    let ptr = Value::pointer_to(record);
    let cell = ptr.as_pointer().unwrap().clone();
    cell.write().set_field("Ref", ptr.clone()).unwrap();
    ptr
}

#[test]
fn cyclic_record_copy_points_to_itself() {
    let desc = copy_text_struct();
    let src = self_referencing(&desc, "foo");

    let copy = deep_copy(&src).unwrap();
    assert!(copy.deep_eq(&src));

    let copied_cell = copy.as_pointer().unwrap();
    let inner_ref = copied_cell
        .read()
        .field("Ref")
        .unwrap()
        .as_pointer()
        .unwrap()
        .clone();
    assert!(inner_ref.ptr_eq(copied_cell));
    assert!(!inner_ref.ptr_eq(src.as_pointer().unwrap()));
}

#[test]
fn record_copy_is_detached() {
    let desc = copy_text_struct();
    let mut src = Value::record(
        &desc,
        vec![
            Value::text("foo"),
            Value::f32(2.2),
            Value::null(&desc),
            Value::from_parts(
                TypeDescriptor::primitive(PrimitiveKind::C64),
                typereg::Data::Complex(typereg::Complex::new(1.0, 1.0)),
            ),
        ],
    );
    let copy = deep_copy(&src).unwrap();
    src.set_field("Name", Value::text("bla")).unwrap();

    assert_eq!(copy.field("Name").and_then(|v| v.as_str()), Some("foo"));
    assert_eq!(copy.field("Val").and_then(|v| v.as_float()), Some(2.2f32 as f64));
    assert!(copy.field("Ref").unwrap().is_null());
}

#[test]
fn shared_references_stay_shared() {
    let leaf = RecordBuilder::new("Leaf")
        .namespace("github.com/acme/copytest")
        .field("n", PrimitiveKind::Int)
        .build();
    let pair = RecordBuilder::new("Pair")
        .namespace("github.com/acme/copytest")
        .reference_field("a", &leaf)
        .reference_field("b", &leaf)
        .build();

    let shared = Value::pointer_to(Value::record(&leaf, vec![Value::int(1)]));
    let src = Value::record(&pair, vec![shared.clone(), shared.clone()]);

    let copy = deep_copy(&src).unwrap();
    let a = copy.field("a").unwrap().as_pointer().unwrap();
    let b = copy.field("b").unwrap().as_pointer().unwrap();
    assert!(a.ptr_eq(b));
    assert!(!a.ptr_eq(shared.as_pointer().unwrap()));

    a.write().set_field("n", Value::int(99)).unwrap();
    assert_eq!(b.read().field("n").and_then(|v| v.as_int()), Some(99));
    assert_eq!(
        shared.as_pointer().unwrap().read().field("n").and_then(|v| v.as_int()),
        Some(1)
    );
}

#[test]
fn sequence_copy_is_independent() {
    let int = TypeDescriptor::primitive(PrimitiveKind::Int);
    let mut src = Value::sequence(&int, vec![Value::int(1), Value::int(2), Value::int(3)]);
    let copy = deep_copy(&src).unwrap();

    *src.index_mut(0).unwrap() = Value::int(0);

    let got: Vec<_> = copy
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_int())
        .collect();
    assert_eq!(got, [1, 2, 3]);
    assert_eq!(copy.as_sequence().unwrap().capacity(), 3);
}

#[test]
fn array_copy_is_independent() {
    let int = TypeDescriptor::primitive(PrimitiveKind::Int);
    let cell = TypeDescriptor::reference(&int);
    let src = Value::array(
        &cell,
        vec![
            Value::pointer_to(Value::int(1)),
            Value::pointer_to(Value::int(2)),
            Value::pointer_to(Value::int(3)),
        ],
    );

    let copy = deep_copy(&src).unwrap();
    assert_eq!(typereg::canonical_name(copy.ty()), "[3]*int");
    assert!(copy.deep_eq(&src));

    for i in 0..3 {
        let ptr = src.index(i).and_then(|v| v.as_pointer()).unwrap();
        ptr.write().set(Value::int(-1)).unwrap();
    }

    let got: Vec<i64> = (0..3)
        .map(|i| {
            let ptr = copy.index(i).and_then(|v| v.as_pointer()).unwrap();
            ptr.read().as_int().unwrap()
        })
        .collect();
    assert_eq!(got, [1, 2, 3]);
    assert!(copy.index(3).is_none());

    for i in 0..3 {
        let dst = copy.index(i).and_then(|v| v.as_pointer()).unwrap();
        for j in 0..3 {
            let other = src.index(j).and_then(|v| v.as_pointer()).unwrap();
            assert!(!dst.ptr_eq(other), "copy[{}] shares source[{}]", i, j);
        }
    }
}

#[test]
fn randomized_copies_are_independent() {
    let mut rng = fastrand::Rng::with_seed(0x7e9e_5eed);
    let int = TypeDescriptor::primitive(PrimitiveKind::Int);
    let cell = TypeDescriptor::reference(&int);

    for _ in 0..64 {
        let len = rng.usize(1..32);
        let numbers: Vec<i64> = (0..len).map(|_| rng.i64(-1000..1000)).collect();
        let pointers: Vec<Value> = numbers
            .iter()
            .map(|&n| Value::pointer_to(Value::int(n)))
            .collect();
        let mut src = Value::sequence(&cell, pointers);

        let copy = deep_copy(&src).unwrap();

        for _ in 0..len {
            let i = rng.usize(..len);
            let seq = src.as_sequence_mut().unwrap();
            if rng.bool() {
                seq.get(i)
                    .and_then(|v| v.as_pointer())
                    .unwrap()
                    .write()
                    .set(Value::int(rng.i64(..)))
                    .unwrap();
            } else {
                *seq.get_mut(i).unwrap() = Value::pointer_to(Value::int(rng.i64(..)));
            }
        }

        let got: Vec<i64> = copy
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_pointer().unwrap().read().as_int().unwrap())
            .collect();
        assert_eq!(got, numbers);
    }
}

#[test]
fn mapping_copy_is_independent() {
    let s = TypeDescriptor::primitive(PrimitiveKind::String);
    let entries = [("foo", "bar"), ("test1", "test2"), ("bla", "bla")]
        .map(|(k, v)| (Value::text(k), Value::text(v)));
    let mut src = Value::mapping(&s, &s, entries);

    let copy = deep_copy(&src).unwrap();
    assert!(copy.deep_eq(&src));

    src.as_mapping_mut()
        .unwrap()
        .insert(Value::text("foo"), Value::text("catoto"));

    let m = copy.as_mapping().unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(&Value::text("foo")).and_then(|v| v.as_str()), Some("bar"));
    assert_eq!(m.get(&Value::text("test1")).and_then(|v| v.as_str()), Some("test2"));
    assert!(!copy.deep_eq(&src));
}

#[test]
fn dynamic_container_copies_contents() {
    let desc = copy_text_struct();
    let target = self_referencing(&desc, "foo");
    let src = Value::dynamic(Some(target.clone()));

    let copy = deep_copy(&src).unwrap();
    assert_eq!(copy.ty(), src.ty());
    assert!(copy.deep_eq(&src));

    target
        .as_pointer()
        .unwrap()
        .write()
        .set_field("Name", Value::text("new name"))
        .unwrap();

    let inner = copy.as_dynamic().unwrap().as_pointer().unwrap().read();
    assert_eq!(inner.field("Name").and_then(|v| v.as_str()), Some("foo"));
}

#[test]
fn empty_dynamic_field_survives() {
    let rec = RecordBuilder::new("TestInterface")
        .namespace("github.com/acme/copytest")
        .string_field("Name")
        .dynamic_field("Int")
        .build();
    let fields = vec![Value::text("foo"), Value::dynamic(None)];
    let src = Value::pointer_to(Value::record(&rec, fields));
    let copy = deep_copy(&src).unwrap();
    assert!(copy.deep_eq(&src));
}

#[test]
fn copy_can_move_to_another_thread() {
    let desc = copy_text_struct();
    let src = self_referencing(&desc, "worker");
    let copy = deep_copy(&src).unwrap();

    let name = std::thread::spawn(move || {
        let cell = copy.as_pointer().unwrap();
        let guard = cell.read();
        guard.field("Name").and_then(|v| v.as_str()).map(str::to_string)
    })
    .join()
    .unwrap();
    assert_eq!(name.as_deref(), Some("worker"));
}

#[test]
fn settability_of_made_and_error_values() {
    let rec = RecordBuilder::new("TestInterface")
        .namespace("github.com/acme/copytest")
        .string_field("Name")
        .dynamic_field("Int")
        .build();
    assert!(any_settable(&make(&rec).unwrap()));
    assert!(any_settable(&make(&TypeDescriptor::reference(&rec)).unwrap()));
    assert!(!any_settable(&error_value("foo")));
}

#[test]
fn make_on_self_referential_record_terminates() {
    let recursive = RecordBuilder::new("Recursive1")
        .namespace("github.com/acme/copytest")
        .self_field("ptr")
        .build();
    let v = make(&recursive).unwrap();
    assert!(v.field("ptr").unwrap().is_null());
}
