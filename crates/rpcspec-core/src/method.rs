//! # Method Schemas & Registry
//!
//! The declared side of a check run: every API method with its ordered
//! parameter schemas and its result schema, keyed by method name.
//!
//! The registry is built once by the spec loader and read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RegistryError;

/// One declared parameter of a method.
///
/// Parameters bind to recorded values by position within
/// [`MethodSchema::params`]; `name` is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSchema {
    /// Content descriptor name, used in log output.
    pub name: String,
    /// JSON-Schema document the value must satisfy.
    pub schema: Value,
    /// Whether a round trip must supply this parameter.
    pub required: bool,
}

impl ParamSchema {
    /// A required parameter.
    pub fn required(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// An optional parameter.
    pub fn optional(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

/// The schema of a method's successful return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSchema {
    /// Content descriptor name, used in log output.
    pub name: String,
    /// JSON-Schema document the result must satisfy.
    pub schema: Value,
}

impl ResultSchema {
    /// Create a result schema.
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// A declared API method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSchema {
    /// Unique method name, e.g. `eth_getBalance`.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<ParamSchema>,
    /// Result of a successful call.
    pub result: ResultSchema,
}

impl MethodSchema {
    /// Create a method definition with parameters in call order.
    pub fn new(name: impl Into<String>, params: Vec<ParamSchema>, result: ResultSchema) -> Self {
        Self {
            name: name.into(),
            params,
            result,
        }
    }

    /// Number of leading parameters a caller must supply.
    ///
    /// Counts up to and including the last required parameter, since
    /// positional binding cannot skip over a gap.
    pub fn min_params(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| p.required)
            .map_or(0, |i| i + 1)
    }
}

/// Read-only mapping from method name to [`MethodSchema`].
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: BTreeMap<String, MethodSchema>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method definition.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateMethod` if a method with the same
    /// name is already registered, and `RegistryError::EmptyName` if the
    /// name is empty.
    pub fn insert(&mut self, method: MethodSchema) -> Result<(), RegistryError> {
        if method.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.methods.contains_key(&method.name) {
            return Err(RegistryError::DuplicateMethod { name: method.name });
        }
        self.methods.insert(method.name.clone(), method);
        Ok(())
    }

    /// Build a registry from an iterator of methods, rejecting duplicates.
    pub fn from_methods(
        methods: impl IntoIterator<Item = MethodSchema>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for method in methods {
            registry.insert(method)?;
        }
        Ok(registry)
    }

    /// Look up a method by name.
    pub fn lookup(&self, name: &str) -> Option<&MethodSchema> {
        self.methods.get(name)
    }

    /// Returns the number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if no methods are registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}
