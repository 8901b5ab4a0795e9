//! # rpcspec-schema — Schema Validation & Debug URLs
//!
//! This crate checks recorded JSON values against the JSON-Schema
//! documents an OpenRPC specification declares for them.
//!
//! ## Validation (`validate`, `engine`)
//!
//! The [`SchemaValidator`] adapter forces the draft-07 dialect marker onto
//! every schema before compiling it (OpenRPC schema objects are documented
//! against draft-07 but rarely say so per subschema), compiles it through a
//! pluggable [`SchemaEngine`], decodes the recorded value and reports the
//! first violation. [`JsonSchemaEngine`] is the engine backed by the
//! `jsonschema` crate.
//!
//! ## Debug URLs (`debug_url`)
//!
//! [`build_debug_url`] packs a failing (schema, value) pair into a link to
//! a locally running interactive schema debugger.
//!
//! ## Crate Policy
//!
//! - Depends only on `rpcspec-core` internally.
//! - Never performs network access: external `$ref`s fail to compile.

pub mod debug_url;
pub mod engine;
pub mod validate;

pub use debug_url::{build_debug_url, DEBUG_URL_ORIGIN};
pub use engine::{CompiledSchema, CompiledValidator, JsonSchemaEngine, SchemaEngine};
pub use validate::{force_dialect, SchemaValidationError, SchemaValidator, Violation, DRAFT_07_DIALECT};
