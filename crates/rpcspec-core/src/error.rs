//! # Error Types
//!
//! Errors raised by the core data model. Both use `thiserror` for
//! derive-based `Display` and `Error` implementations; higher crates wrap
//! them with their own context.

use thiserror::Error;

/// Error building a [`MethodRegistry`](crate::MethodRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two methods were declared under the same name.
    #[error("duplicate method definition: {name}")]
    DuplicateMethod {
        /// The method name declared more than once.
        name: String,
    },

    /// A method was declared with an empty name.
    #[error("method name must not be empty")]
    EmptyName,
}

/// Error decoding an [`EncodedDocument`](crate::EncodedDocument).
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The raw text is not a well-formed JSON value.
    #[error("malformed JSON value: {0}")]
    Malformed(#[from] serde_json::Error),
}
