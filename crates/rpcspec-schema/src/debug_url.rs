//! # Debug URLs
//!
//! Builds links to a locally running interactive schema debugger,
//! pre-populated with a schema and the value that failed it. Purely string
//! construction: nothing is fetched or opened.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rpcspec_core::EncodedDocument;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::validate::SchemaValidationError;

/// Origin of the schema debugger.
pub const DEBUG_URL_ORIGIN: &str = "http://localhost:5173/";

/// Everything except RFC 3986 unreserved characters is encoded.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build a debugger link for `schema` and the recorded value `raw`.
///
/// The schema is pretty-printed with a four-space indent; the value is
/// used verbatim. Each is percent-encoded exactly once.
///
/// # Errors
///
/// Returns `SchemaValidationError::SchemaMarshal` if the schema cannot be
/// serialized.
pub fn build_debug_url(
    schema: &Value,
    raw: &EncodedDocument,
) -> Result<String, SchemaValidationError> {
    let schema_text = pretty_json(schema).map_err(|e| SchemaValidationError::SchemaMarshal {
        context: "debug url".to_string(),
        reason: e.to_string(),
    })?;

    Ok(format!(
        "{DEBUG_URL_ORIGIN}#schema={}&data={}",
        utf8_percent_encode(&schema_text, ENCODE_SET),
        utf8_percent_encode(raw.as_str(), ENCODE_SET),
    ))
}

fn pretty_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
