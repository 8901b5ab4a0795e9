//! # Schema Validation
//!
//! Validation of recorded values against the JSON-Schema documents an
//! OpenRPC specification declares for them.
//!
//! ## Dialect
//!
//! OpenRPC schema objects are documented against JSON-Schema draft-07, but
//! individual schemas rarely carry a `$schema` marker and some carry a
//! wrong one. Before compiling, the adapter overwrites `$schema` with the
//! draft-07 identifier so every schema is evaluated with the same
//! semantics, whatever the document says.
//!
//! ## Failure classes
//!
//! A schema that cannot be serialized or compiled is a different failure
//! from a value that does not conform, and a recorded value that is not
//! JSON at all is a third. Each has its own [`SchemaValidationError`]
//! variant.

use std::fmt;

use rpcspec_core::EncodedDocument;
use serde_json::Value;
use thiserror::Error;

use crate::engine::{CompiledSchema, JsonSchemaEngine, SchemaEngine};

/// Dialect identifier written into every schema before compilation.
pub const DRAFT_07_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Error during schema validation.
#[derive(Error, Debug, Clone)]
pub enum SchemaValidationError {
    /// The value did not conform to the schema.
    #[error("validation failed for '{context}':\n{violation}")]
    ValidationFailed {
        /// Namespace the schema was compiled under, e.g. `eth_call.param[1]`.
        context: String,
        /// The first violation reported by the engine.
        violation: Violation,
    },

    /// The schema could not be serialized to JSON text.
    #[error("unable to marshal schema for '{context}' to json: {reason}")]
    SchemaMarshal {
        /// Namespace of the schema.
        context: String,
        /// Reason serialization failed.
        reason: String,
    },

    /// The schema is not a valid JSON-Schema document.
    #[error("schema compile error for '{context}': {reason}")]
    SchemaCompile {
        /// Namespace of the schema.
        context: String,
        /// Reason compilation failed.
        reason: String,
    },

    /// The recorded value is not well-formed JSON.
    #[error("malformed value for '{context}': {reason}")]
    MalformedInstance {
        /// Namespace of the schema the value was to be checked against.
        context: String,
        /// Reason decoding failed.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Return a copy of `schema` with its dialect marker forced to draft-07.
///
/// Boolean schemas have nowhere to carry a marker and are returned
/// unchanged.
pub fn force_dialect(schema: &Value) -> Value {
    let mut schema = schema.clone();
    if let Value::Object(map) = &mut schema {
        map.insert(
            "$schema".to_string(),
            Value::String(DRAFT_07_DIALECT.to_string()),
        );
    }
    schema
}

/// Adapter between the checker and a [`SchemaEngine`].
#[derive(Debug, Default)]
pub struct SchemaValidator<E = JsonSchemaEngine> {
    engine: E,
}

impl SchemaValidator<JsonSchemaEngine> {
    /// Create a validator backed by the `jsonschema` crate.
    pub fn new() -> Self {
        Self::with_engine(JsonSchemaEngine::new())
    }
}

impl<E: SchemaEngine> SchemaValidator<E> {
    /// Create a validator backed by a custom engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Access the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validate a recorded value against `schema`.
    ///
    /// # Arguments
    ///
    /// * `schema` — The declared JSON-Schema document. Not modified.
    /// * `raw` — The recorded value.
    /// * `context` — Compilation namespace and error label, e.g.
    ///   `eth_getBalance.param[0]`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMarshal` or `SchemaCompile` if the schema is unusable,
    /// `MalformedInstance` if `raw` is not JSON, and `ValidationFailed` with
    /// the first violation if the value does not conform.
    pub fn validate(
        &self,
        schema: &Value,
        raw: &EncodedDocument,
        context: &str,
    ) -> Result<(), SchemaValidationError> {
        let schema = force_dialect(schema);
        let compiled = self.engine.compile(&schema, context)?;

        let instance = raw
            .decode()
            .map_err(|e| SchemaValidationError::MalformedInstance {
                context: context.to_string(),
                reason: e.to_string(),
            })?;

        compiled
            .check(&instance)
            .map_err(|violation| SchemaValidationError::ValidationFailed {
                context: context.to_string(),
                violation,
            })
    }
}
