// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Naming constants and registry configuration.
//!
//! Canonical names are built from two separators: the qualifier between a
//! namespace and a declared name (`app/model.User`), and the path separator
//! inside a namespace (`app/model`). Both live here so that the resolver and
//! the registry agree on them.
//!
//! # Example
//!
//! ```rust
//! use typereg::{RegistryConfig, TypeRegistry};
//!
//! let config = RegistryConfig::default().with_capacity(16).with_builtins(false);
//! let registry = TypeRegistry::with_config(&config);
//! assert!(registry.is_empty());
//! ```

/// Separator between a namespace and a declared name.
pub const QUALIFIER: char = '.';

/// Separator between segments of a namespace path.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Initial capacity of a registry map.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 100;

/// Environment variable overriding [`RegistryConfig::capacity`].
pub const ENV_CAPACITY: &str = "TYPEREG_CAPACITY";

/// Environment variable disabling builtin registration when set.
pub const ENV_NO_BUILTINS: &str = "TYPEREG_NO_BUILTINS";

/// Construction options for a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Initial capacity of the name map.
    pub capacity: usize,

    /// Register the builtin type set at construction.
    pub builtins: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: std::env::var(ENV_CAPACITY)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REGISTRY_CAPACITY),
            builtins: std::env::var(ENV_NO_BUILTINS).is_err(),
        }
    }
}

impl RegistryConfig {
    /// Set the initial map capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable builtin registration.
    pub fn with_builtins(mut self, builtins: bool) -> Self {
        self.builtins = builtins;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = RegistryConfig::default()
            .with_capacity(7)
            .with_builtins(false);
        assert_eq!(config.capacity, 7);
        assert!(!config.builtins);
    }
}
