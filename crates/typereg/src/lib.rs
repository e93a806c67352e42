// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typereg - runtime type metadata
//!
//! Given only a name, locate a registered type description, build a
//! correctly initialized value of it, and deep-copy any value graph while
//! preserving shared references and cycles.
//!
//! ## Quick Start
//!
//! ```rust
//! use typereg::{deep_copy, PrimitiveKind, RecordBuilder, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::with_builtins();
//!
//! let node = RecordBuilder::new("Node")
//!     .namespace("github.com/acme/list")
//!     .field("value", PrimitiveKind::I64)
//!     .self_field("next")
//!     .build();
//! registry.insert(&node);
//!
//! let mut head = registry.make("github.com/acme/list.Node").unwrap();
//! head.set_field("value", Value::i64(7)).unwrap();
//!
//! let copy = deep_copy(&head).unwrap();
//! assert!(copy.deep_eq(&head));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------+
//! |  TypeRegistry        name -> TypeDescriptor (first wins)    |
//! +-----------------------------+------------------------------+
//! |  Instantiator               |  DeepCopyEngine              |
//! |  make_zero / make_fresh /   |  CopyContext keyed by        |
//! |  make (self-ref guard)      |  reference identity          |
//! +-----------------------------+------------------------------+
//! |  NameResolver: canonical_name, structural Display          |
//! +------------------------------------------------------------+
//! |  TypeDescriptor / Value model                              |
//! +------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeDescriptor`] | Shape of a type: kind, declared name, namespace |
//! | [`RecordBuilder`] | Hand-written registration of a record type |
//! | [`TypeRegistry`] | Canonical name -> descriptor map |
//! | [`Value`] | Typed runtime value |
//! | [`CopyContext`] | Source cell -> destination cell table of one copy |
//!
//! ## Logging
//!
//! Events go through the `log` facade with `[registry]`, `[instantiate]`
//! and `[builtins]` prefixes; no logger is installed by the library.

// Clippy: No blanket suppressions. Fix issues properly or use inline #[allow] with justification.

/// Builtin type set registered at startup.
pub mod builtins;
/// Naming constants and registry configuration.
pub mod config;
/// Identity-preserving deep copy.
pub mod copy;
/// Type descriptor model and record builder.
pub mod descriptor;
/// Crate error type.
pub mod error;
/// Zero, fresh and materialized instances.
pub mod instantiate;
/// Canonical names and structural strings.
pub mod name;
/// Name -> descriptor registry.
pub mod registry;
/// Settability probe.
pub mod settable;
/// Runtime value model.
pub mod value;

pub use config::RegistryConfig;
pub use copy::{deep_copy, CopyContext};
pub use descriptor::{
    ArrayDescriptor, CallableDescriptor, ChannelDescriptor, ChannelDir, DynamicDescriptor,
    FieldDescriptor, MappingDescriptor, PrimitiveKind, RecordBuilder, RecordDescriptor,
    SequenceDescriptor, TypeDescriptor, TypeKind, Visibility,
};
pub use error::{Error, Result};
pub use instantiate::{is_self_referential, make, make_fresh, make_zero};
pub use name::{canonical_name, is_equal_name, value_name};
pub use registry::TypeRegistry;
pub use settable::any_settable;
pub use value::{Callable, Channel, Complex, Data, Mapping, Pointer, Sequence, Value};
