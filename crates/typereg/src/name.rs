// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical type names.
//!
//! Every descriptor has two textual forms:
//!
//! - the **structural string** (`Display`), which spells composite types out
//!   and abbreviates named types to `lastsegment.Name`
//!   (`[]model.User`, `map[string]*model.User`)
//! - the **canonical name** ([`canonical_name`]), the registry key. Named
//!   types use their full namespace (`github.com/acme/model.User`);
//!   anonymous composites take the structural string and re-expand the
//!   abbreviated namespace of their innermost named element
//!   (`[]github.com/acme/model.User`).
//!
//! Both are pure functions of the descriptor.

use crate::config::{NAMESPACE_SEPARATOR, QUALIFIER};
use crate::descriptor::{ChannelDir, TypeDescriptor, TypeKind};
use crate::value::{Data, Value};
use std::fmt;

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_named() {
            let short = short_namespace(&self.namespace);
            if short.is_empty() {
                return f.write_str(&self.name);
            }
            return write!(f, "{}{}{}", short, QUALIFIER, self.name);
        }

        match &self.kind {
            TypeKind::Invalid => f.write_str("invalid"),
            TypeKind::Primitive(p) => f.write_str(p.name()),
            TypeKind::Array(a) => write!(f, "[{}]{}", a.length, a.element_type),
            TypeKind::Sequence(s) => write!(f, "[]{}", s.element_type),
            TypeKind::Mapping(m) => write!(f, "map[{}]{}", m.key_type, m.value_type),
            TypeKind::Reference(target) => write!(f, "*{}", target),
            TypeKind::Record(r) => {
                let fields = r.fields();
                if fields.is_empty() {
                    return f.write_str("struct {}");
                }
                f.write_str("struct { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, field.type_desc)?;
                }
                f.write_str(" }")
            }
            TypeKind::Dynamic(d) => {
                if d.methods.is_empty() {
                    return f.write_str("interface {}");
                }
                write!(f, "interface {{ {} }}", d.methods.join("; "))
            }
            TypeKind::Channel(c) => match c.dir {
                ChannelDir::Send => write!(f, "chan<- {}", c.element_type),
                ChannelDir::Recv => write!(f, "<-chan {}", c.element_type),
                ChannelDir::Both => {
                    // `chan <-chan T` would parse as `chan<- chan T`.
                    let ambiguous = matches!(
                        &c.element_type.kind,
                        TypeKind::Channel(inner) if inner.dir == ChannelDir::Recv
                    ) && !c.element_type.is_named();
                    if ambiguous {
                        write!(f, "chan ({})", c.element_type)
                    } else {
                        write!(f, "chan {}", c.element_type)
                    }
                }
            },
            TypeKind::Callable(c) => {
                f.write_str("func(")?;
                write_list(f, &c.params)?;
                f.write_str(")")?;
                match c.results.len() {
                    0 => Ok(()),
                    1 => write!(f, " {}", c.results[0]),
                    _ => {
                        f.write_str(" (")?;
                        write_list(f, &c.results)?;
                        f.write_str(")")
                    }
                }
            }
            TypeKind::Opaque => f.write_str("opaque"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[std::sync::Arc<TypeDescriptor>]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

/// Canonical name of a type, used as registry key.
///
/// The absent-value type has the empty name.
///
/// # Example
///
/// ```rust
/// use typereg::{canonical_name, RecordBuilder, TypeDescriptor};
///
/// let user = RecordBuilder::new("User")
///     .namespace("github.com/acme/model")
///     .string_field("name")
///     .build();
///
/// assert_eq!(canonical_name(&user), "github.com/acme/model.User");
/// assert_eq!(
///     canonical_name(&TypeDescriptor::sequence(&user)),
///     "[]github.com/acme/model.User"
/// );
/// ```
pub fn canonical_name(desc: &TypeDescriptor) -> String {
    if matches!(desc.kind, TypeKind::Invalid) {
        return String::new();
    }

    if desc.is_named() && !matches!(desc.kind, TypeKind::Dynamic(_)) {
        return qualified(&desc.namespace, &desc.name);
    }

    let structural = desc.to_string();
    let namespace = innermost_namespace(desc);
    if namespace.is_empty() {
        return structural;
    }
    qualify(&structural, namespace)
}

/// `namespace.name`, or `name` alone for the empty namespace.
pub fn qualified(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", namespace, QUALIFIER, name)
    }
}

/// Namespace of the innermost named element.
///
/// Descends through array, sequence, mapping (value side), reference and
/// channel elements; falls back to the type's own namespace when nothing
/// below it is namespaced.
pub fn innermost_namespace(desc: &TypeDescriptor) -> &str {
    if let Some(element) = desc.element() {
        let inner = innermost_namespace(element);
        if !inner.is_empty() {
            return inner;
        }
    }
    &desc.namespace
}

/// Last path segment of a namespace (`github.com/acme/model` -> `model`).
pub fn short_namespace(namespace: &str) -> &str {
    namespace
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(namespace)
}

/// Replace the first abbreviated `short.` qualifier in `structural` with
/// the full namespace.
///
/// Only matches on an identifier boundary so that `model.` does not hit
/// inside `viewmodel.`.
fn qualify(structural: &str, namespace: &str) -> String {
    let short = short_namespace(namespace);
    if short == namespace {
        return structural.to_string();
    }

    let needle = format!("{}{}", short, QUALIFIER);
    let mut from = 0;
    while let Some(pos) = structural[from..].find(&needle) {
        let at = from + pos;
        let boundary = structural[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '/')));
        if boundary {
            let mut out = String::with_capacity(structural.len() + namespace.len());
            out.push_str(&structural[..at]);
            out.push_str(namespace);
            out.push_str(&structural[at + short.len()..]);
            return out;
        }
        from = at + needle.len();
    }
    structural.to_string()
}

/// Name of a value: the function name for callables, the canonical type
/// name otherwise, and the empty string for the absent value.
pub fn value_name(value: &Value) -> String {
    match value.data() {
        Data::Invalid => String::new(),
        Data::Callable(Some(callable)) => callable.name().to_string(),
        _ => canonical_name(value.ty()),
    }
}

/// Check whether a value's type has the given canonical name.
pub fn is_equal_name(value: &Value, name: &str) -> bool {
    canonical_name(value.ty()) == name
}
