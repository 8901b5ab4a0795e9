//! # Encoded Documents — Raw JSON Values From the Corpus
//!
//! This module defines `EncodedDocument`, the opaque carrier for one recorded
//! JSON value (a single request parameter or a response result).
//!
//! The recorded text is kept verbatim. Diagnostics and debug URLs show the
//! value exactly as it appeared in the fixture, and decoding into a
//! structural `serde_json::Value` happens only when a schema is checked.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::DocumentError;

/// The raw JSON text of one recorded value.
///
/// # Invariants
///
/// - The text is never rewritten after construction.
/// - Decoding is explicit and fallible; there is no implicit `null` fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedDocument(String);

impl EncodedDocument {
    /// Wrap raw JSON text without inspecting it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encode an already-decoded value using compact JSON.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Malformed` if the value cannot be serialized.
    pub fn from_value(value: &impl Serialize) -> Result<Self, DocumentError> {
        Ok(Self(serde_json::to_string(value)?))
    }

    /// The recorded text, exactly as captured.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the text into a generic JSON value.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Malformed` if the text is not valid JSON.
    pub fn decode(&self) -> Result<Value, DocumentError> {
        Ok(serde_json::from_str(&self.0)?)
    }

    /// Returns the length of the raw text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the raw text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EncodedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&Value> for EncodedDocument {
    fn from(value: &Value) -> Self {
        // Display for Value is compact JSON and cannot fail.
        Self(value.to_string())
    }
}
