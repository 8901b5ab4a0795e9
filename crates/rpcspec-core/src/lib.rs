//! # rpcspec-core — Foundational Types for rpcspec
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: the declared side (method schemas and the registry that holds
//! them) and the recorded side (round trips captured from a real client).
//!
//! ## Key Design Principles
//!
//! 1. **Raw values stay raw.** Parameter and result values are carried as
//!    [`EncodedDocument`], the exact JSON text that was recorded. Decoding is
//!    an explicit, fallible step so a malformed fixture is reported instead
//!    of silently turning into `null`.
//!
//! 2. **Positional binding.** A round trip's parameter values bind to a
//!    method's [`ParamSchema`] entries by index. Parameter names are carried
//!    for log output only.
//!
//! 3. **Explicit lookups.** [`MethodRegistry::lookup`] returns an `Option`;
//!    the registry never hands out a default method.
//!
//! 4. **Explicit intent.** Whether a round trip deliberately violates the
//!    schema is a field on [`RoundTrip`], not something consumers re-derive
//!    from free-text names.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rpcspec-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod method;
pub mod roundtrip;

// Re-export primary types for ergonomic imports.
pub use document::EncodedDocument;
pub use error::{DocumentError, RegistryError};
pub use method::{MethodRegistry, MethodSchema, ParamSchema, ResultSchema};
pub use roundtrip::{Response, RoundTrip, INVALID_NAME_MARKER};
