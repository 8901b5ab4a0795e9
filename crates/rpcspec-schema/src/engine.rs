//! # Schema Engines
//!
//! Capability traits over a JSON-Schema evaluator, and the implementation
//! backed by the `jsonschema` crate.
//!
//! An engine compiles a schema document under a caller-supplied namespace
//! and hands back a compiled schema that checks decoded values. The
//! namespace is a cache key and an error label; it has no meaning of its
//! own.

use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, ValidationOptions, Validator};
use parking_lot::Mutex;
use serde_json::Value;

use crate::validate::{SchemaValidationError, Violation};

/// A JSON-Schema evaluator able to compile schema documents.
pub trait SchemaEngine {
    /// The compiled form of a schema.
    type Compiled: CompiledSchema;

    /// Compile `schema` under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaMarshal` if the schema cannot be
    /// serialized, or `SchemaValidationError::SchemaCompile` if it is not a
    /// valid schema.
    fn compile(
        &self,
        schema: &Value,
        namespace: &str,
    ) -> Result<Self::Compiled, SchemaValidationError>;
}

/// A compiled schema.
pub trait CompiledSchema {
    /// Check a decoded value, returning the first violation found.
    fn check(&self, instance: &Value) -> Result<(), Violation>;
}

/// Retriever that refuses every external reference.
///
/// Specification documents are expected to be self-contained once the spec
/// loader has inlined its component references. Refusing here keeps the
/// `jsonschema` crate from going to the network.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference not available offline: {}", uri.as_str()).into())
    }
}

/// A validator compiled by [`JsonSchemaEngine`].
#[derive(Debug, Clone)]
pub struct CompiledValidator(Arc<Validator>);

impl CompiledSchema for CompiledValidator {
    fn check(&self, instance: &Value) -> Result<(), Violation> {
        match self.0.iter_errors(instance).next() {
            None => Ok(()),
            Some(e) => Err(Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// [`SchemaEngine`] backed by the `jsonschema` crate, evaluating draft-07.
///
/// Compiled validators are cached by namespace and schema text, so the
/// same parameter schema is compiled once per run no matter how many round
/// trips exercise it.
///
/// ## Thread Safety
///
/// `JsonSchemaEngine` is `Send + Sync`; the cache sits behind a mutex.
#[derive(Debug, Default)]
pub struct JsonSchemaEngine {
    cache: Mutex<HashMap<(String, String), CompiledValidator>>,
}

impl JsonSchemaEngine {
    /// Create an engine with an empty compilation cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached validators.
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }

    fn build_options() -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft7);
        opts.with_retriever(OfflineRetriever);
        opts
    }
}

impl SchemaEngine for JsonSchemaEngine {
    type Compiled = CompiledValidator;

    fn compile(
        &self,
        schema: &Value,
        namespace: &str,
    ) -> Result<CompiledValidator, SchemaValidationError> {
        let text = serde_json::to_string(schema).map_err(|e| {
            SchemaValidationError::SchemaMarshal {
                context: namespace.to_string(),
                reason: e.to_string(),
            }
        })?;
        let key = (namespace.to_string(), text);

        if let Some(compiled) = self.cache.lock().get(&key) {
            return Ok(compiled.clone());
        }

        tracing::trace!(namespace, "compiling schema");
        let validator = Self::build_options().build(schema).map_err(|e| {
            SchemaValidationError::SchemaCompile {
                context: namespace.to_string(),
                reason: e.to_string(),
            }
        })?;

        let compiled = CompiledValidator(Arc::new(validator));
        self.cache.lock().insert(key, compiled.clone());
        Ok(compiled)
    }
}
