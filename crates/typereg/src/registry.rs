// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name -> descriptor registry.
//!
//! The registry is the entry point for name-based instantiation: a type's
//! owner registers it once (usually at startup), and any collaborator can
//! later build values of it knowing only its canonical name.
//!
//! # Invariants
//!
//! - First registration wins: inserting an already-present name is a
//!   silent no-op (`false` is returned, nothing is replaced).
//! - Entries are never removed.
//!
//! Insertion takes `&self` and is atomic per name, so registration may
//! happen from several threads at once.
//!
//! # Example
//!
//! ```rust
//! use typereg::{canonical_name, RecordBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::with_builtins();
//! let user = RecordBuilder::new("User")
//!     .namespace("github.com/acme/model")
//!     .string_field("name")
//!     .build();
//!
//! assert!(registry.insert(&user));
//! assert!(!registry.insert(&user));
//!
//! let found = registry.lookup("github.com/acme/model.User").unwrap();
//! assert_eq!(canonical_name(&found), "github.com/acme/model.User");
//!
//! let value = registry.make("github.com/acme/model.User").unwrap();
//! assert_eq!(value.field("name").and_then(|v| v.as_str()), Some(""));
//! ```

use crate::builtins::register_builtins;
use crate::config::RegistryConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::instantiate;
use crate::name::canonical_name;
use crate::value::Value;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::io;
use std::sync::Arc;

/// Registry of type descriptors keyed by name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry built from `config`.
    pub fn with_config(config: &RegistryConfig) -> Self {
        let registry = Self {
            types: DashMap::with_capacity(config.capacity),
        };
        if config.builtins {
            register_builtins(&registry);
        }
        registry
    }

    /// Registry pre-populated with the builtin types.
    pub fn with_builtins() -> Self {
        Self::with_config(&RegistryConfig::default().with_builtins(true))
    }

    /// Register a descriptor under its canonical name.
    ///
    /// Returns `false` if the name was already taken.
    pub fn insert(&self, desc: &Arc<TypeDescriptor>) -> bool {
        self.insert_named(&canonical_name(desc), desc)
    }

    /// Register the type of an example value.
    pub fn insert_value(&self, value: &Value) -> bool {
        self.insert(value.ty())
    }

    /// Register a descriptor under an explicit name (an alias).
    pub fn insert_named(&self, name: &str, desc: &Arc<TypeDescriptor>) -> bool {
        match self.types.entry(name.to_string()) {
            Entry::Occupied(_) => {
                log::trace!("[registry] '{}' already registered, ignored", name);
                false
            }
            Entry::Vacant(slot) => {
                log::debug!("[registry] registered '{}' -> {}", name, desc);
                slot.insert(Arc::clone(desc));
                true
            }
        }
    }

    /// Register the type of an example value under an explicit name.
    pub fn insert_named_value(&self, name: &str, value: &Value) -> bool {
        self.insert_named(name, value.ty())
    }

    /// Descriptor registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.types
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Descriptor registered under `name`, for callers that already
    /// guarantee its presence.
    ///
    /// # Panics
    ///
    /// Panics with `type not found: <name>` if the name is absent.
    pub fn require(&self, name: &str) -> Arc<TypeDescriptor> {
        match self.lookup(name) {
            Ok(desc) => desc,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Snapshot of all entries, sorted by name.
    pub fn entries(&self) -> Vec<(String, Arc<TypeDescriptor>)> {
        let mut entries: Vec<_> = self
            .types
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Write one `name<TAB>type` line per entry.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for (name, desc) in self.entries() {
            writeln!(out, "{}\t{}", name, desc)?;
        }
        Ok(())
    }

    /// Zero value of the named type.
    pub fn make_zero(&self, name: &str) -> Result<Value> {
        instantiate::make_zero(&self.lookup(name)?)
    }

    /// Fresh value of the named type (see [`instantiate::make_fresh`]).
    pub fn make_fresh(&self, name: &str, capacity: usize) -> Result<Value> {
        instantiate::make_fresh(&self.lookup(name)?, capacity)
    }

    /// Materialized value of the named type (see [`instantiate::make`]).
    pub fn make(&self, name: &str) -> Result<Value> {
        instantiate::make(&self.lookup(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PrimitiveKind, RecordBuilder};

    #[test]
    fn test_first_registration_wins() {
        let registry = TypeRegistry::new();
        let first = Arc::new(TypeDescriptor::named(
            "acme",
            "Id",
            crate::descriptor::TypeKind::Primitive(PrimitiveKind::U64),
        ));
        let second = Arc::new(TypeDescriptor::named(
            "acme",
            "Id",
            crate::descriptor::TypeKind::Primitive(PrimitiveKind::String),
        ));
        assert!(registry.insert(&first));
        assert!(!registry.insert(&second));
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.require("acme.Id"), &first));
    }

    #[test]
    fn test_lookup_missing() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.lookup("acme.Nope").unwrap_err(),
            Error::NotFound("acme.Nope".into())
        );
        assert!(matches!(
            registry.make("acme.Nope"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    #[should_panic(expected = "type not found: acme.Nope")]
    fn test_require_panics() {
        TypeRegistry::new().require("acme.Nope");
    }

    #[test]
    fn test_alias_bypasses_resolver() {
        let registry = TypeRegistry::new();
        let rec = RecordBuilder::new("Thing").namespace("acme").build();
        assert!(registry.insert_named("thing", &rec));
        assert!(registry.contains("thing"));
        assert!(!registry.contains("acme.Thing"));
    }

    #[test]
    fn test_dump_sorted() {
        let registry = TypeRegistry::new();
        registry.insert_value(&Value::text(""));
        registry.insert_value(&Value::bool(false));
        let int = TypeDescriptor::primitive(PrimitiveKind::Int);
        registry.insert(&TypeDescriptor::sequence(&int));

        let mut out = Vec::new();
        registry.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "[]int\t[]int\nbool\tbool\nstring\tstring\n");
    }

    #[test]
    fn test_make_by_name() {
        let registry = TypeRegistry::new();
        let int = TypeDescriptor::primitive(PrimitiveKind::Int);
        registry.insert(&TypeDescriptor::sequence(&int));
        let v = registry.make_fresh("[]int", 3).unwrap();
        assert_eq!(v.as_sequence().map(|s| s.len()), Some(3));
        assert!(registry.make_zero("[]int").unwrap().is_null());
    }
}
