//! # Round Trips — Recorded Invocations
//!
//! A round trip is one request/response pair captured from a client and
//! kept as a conformance fixture. Its parameter values and its result are
//! held as [`EncodedDocument`]s so they can be checked against the schemas
//! the method declares.

use serde_json::Value;

use crate::document::EncodedDocument;

/// Name fragment that marks a round trip as deliberately violating the
/// schema. Used by [`RoundTrip::new`] to derive the `expect_invalid` tag.
pub const INVALID_NAME_MARKER: &str = "invalid";

/// The response half of a round trip.
///
/// A JSON-RPC response carries either a `result` or an `error`. Both are
/// optional here because fixtures are not guaranteed to be well-formed; a
/// present-but-`null` result is `Some` and is distinct from an absent one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// The recorded `result` value, if the response had one.
    pub result: Option<EncodedDocument>,
    /// The recorded `error` object, if the response had one.
    pub error: Option<Value>,
}

impl Response {
    /// A successful response.
    pub fn result(result: EncodedDocument) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// An error response.
    pub fn error(error: Value) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    /// True when the response carries an error and no result.
    ///
    /// Error payloads are not standardized, so these responses are exempt
    /// from result validation.
    pub fn is_error_only(&self) -> bool {
        self.result.is_none() && self.error.is_some()
    }
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    /// Free-text identifier, usually the fixture path.
    pub name: String,
    /// Name of the invoked method.
    pub method: String,
    /// Supplied parameter values, in call order.
    pub params: Vec<EncodedDocument>,
    /// The recorded response.
    pub response: Response,
    /// The round trip intentionally violates the method's schemas and must
    /// not be validated.
    pub expect_invalid: bool,
}

impl RoundTrip {
    /// Create a round trip, deriving `expect_invalid` from the name.
    ///
    /// A name containing [`INVALID_NAME_MARKER`] (case-sensitive) marks the
    /// round trip as expected-invalid. Use
    /// [`with_expect_invalid`](Self::with_expect_invalid) to set the tag
    /// explicitly.
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        params: Vec<EncodedDocument>,
        response: Response,
    ) -> Self {
        let name = name.into();
        let expect_invalid = name.contains(INVALID_NAME_MARKER);
        Self {
            name,
            method: method.into(),
            params,
            response,
            expect_invalid,
        }
    }

    /// Override the expected-invalid tag.
    pub fn with_expect_invalid(mut self, expect_invalid: bool) -> Self {
        self.expect_invalid = expect_invalid;
        self
    }
}
