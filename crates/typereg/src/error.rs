// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the registry, the instantiator and the copy engine.
//!
//! Name resolution and the structural walks never fail. The only failure
//! points are registry lookups of unknown names and encounters with kinds
//! that have no safe representation (raw memory, opaque handles).

use thiserror::Error;

/// Errors returned by typereg operations.
///
/// # Example
///
/// ```rust
/// use typereg::{Error, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// match registry.lookup("app.Missing") {
///     Err(Error::NotFound(name)) => assert_eq!(name, "app.Missing"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No descriptor is registered under this name.
    #[error("type not found: {0}")]
    NotFound(String),

    /// The kind cannot be instantiated or copied (raw memory, opaque handle).
    #[error("kind {0} is not supported")]
    UnsupportedKind(String),

    /// Record has no field with this name.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Assignment of a value into storage of a different type.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
}

/// Convenient alias for results using the crate `Error`.
pub type Result<T> = core::result::Result<T, Error>;
