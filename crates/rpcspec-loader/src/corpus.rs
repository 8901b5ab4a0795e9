//! # Corpus Loader
//!
//! Reads recorded JSON-RPC exchanges from a directory tree of `.io`
//! fixtures.
//!
//! ## Fixture format
//!
//! ```text
//! // retrieves the balance of the zero address
//! >> {"jsonrpc":"2.0","id":1,"method":"eth_getBalance","params":["0x00..00","latest"]}
//! << {"jsonrpc":"2.0","id":1,"result":"0x0"}
//! ```
//!
//! Lines starting with `//` are comments and blank lines are skipped. A
//! `>>` line is a request and the `<<` line that follows it is its
//! response. A file may hold several pairs; each becomes one round trip
//! named after the file's path relative to the corpus root, without the
//! extension (`eth_getBalance/get-balance`).
//!
//! Parameter and result values keep their recorded text byte for byte.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use rpcspec_core::{EncodedDocument, Response, RoundTrip};
use serde_json::value::RawValue;
use serde_json::Value;
use thiserror::Error;
use walkdir::WalkDir;

/// Extension of fixture files.
pub const FIXTURE_EXTENSION: &str = "io";

const REQUEST_PREFIX: &str = ">>";
const RESPONSE_PREFIX: &str = "<<";
const COMMENT_PREFIX: &str = "//";

/// A problem on a specific line of a fixture.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct FixtureError {
    /// 1-based line number.
    pub line: usize,
    /// What is wrong with the line.
    pub reason: String,
}

impl FixtureError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Error loading the round-trip corpus.
#[derive(Error, Debug)]
pub enum CorpusLoadError {
    /// The corpus root is not a directory.
    #[error("corpus directory '{path}' does not exist or is not a directory")]
    MissingRoot {
        /// The configured root.
        path: String,
    },

    /// The directory tree could not be walked.
    #[error("cannot walk corpus directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A fixture file could not be read.
    #[error("cannot read fixture '{path}': {source}")]
    Io {
        /// Path to the fixture.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A fixture file is malformed.
    #[error("malformed fixture '{path}', {source}")]
    Fixture {
        /// Path to the fixture.
        path: String,
        /// The offending line.
        source: FixtureError,
    },
}

/// Load every fixture under `root` whose round-trip name matches `filter`.
///
/// Fixtures are visited in sorted path order, so the returned round trips
/// have a stable order across runs and platforms. Files without the
/// `.io` extension are ignored.
///
/// # Errors
///
/// Returns `MissingRoot` if `root` is not a directory, `Walk` or `Io` on
/// filesystem errors, and `Fixture` for the first malformed fixture.
pub fn load_corpus(root: &Path, filter: Option<&Regex>) -> Result<Vec<RoundTrip>, CorpusLoadError> {
    if !root.is_dir() {
        return Err(CorpusLoadError::MissingRoot {
            path: root.display().to_string(),
        });
    }

    let mut round_trips = Vec::new();
    let mut files = 0usize;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(FIXTURE_EXTENSION)
        {
            continue;
        }

        let name = round_trip_name(root, path);
        if filter.is_some_and(|re| !re.is_match(&name)) {
            tracing::trace!(name = %name, "fixture filtered out");
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| CorpusLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed = parse_fixture(&name, &content).map_err(|source| CorpusLoadError::Fixture {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(name = %name, round_trips = parsed.len(), "loaded fixture");
        files += 1;
        round_trips.extend(parsed);
    }

    tracing::info!(
        root = %root.display(),
        files,
        round_trips = round_trips.len(),
        "loaded corpus"
    );
    Ok(round_trips)
}

/// Round-trip name for a fixture: its path below `root`, `/`-separated,
/// without the extension.
fn round_trip_name(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path
        .strip_prefix(root)
        .unwrap_or(path)
        .with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse the text of one fixture into round trips named `name`.
///
/// # Errors
///
/// Returns a [`FixtureError`] naming the first offending line: an unknown
/// line prefix, a response without a request, a request without a
/// response, or a line whose JSON does not have the expected shape.
pub fn parse_fixture(name: &str, content: &str) -> Result<Vec<RoundTrip>, FixtureError> {
    let mut round_trips = Vec::new();
    let mut pending: Option<(usize, String, Vec<EncodedDocument>)> = None;

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        if let Some(body) = line.strip_prefix(REQUEST_PREFIX) {
            if let Some((request_line, _, _)) = pending {
                return Err(FixtureError::new(
                    line_no,
                    format!("request on line {request_line} has no response"),
                ));
            }
            let (method, params) = parse_request(body.trim()).map_err(|r| FixtureError::new(line_no, r))?;
            pending = Some((line_no, method, params));
        } else if let Some(body) = line.strip_prefix(RESPONSE_PREFIX) {
            let (_, method, params) = pending
                .take()
                .ok_or_else(|| FixtureError::new(line_no, "response without a preceding request"))?;
            let response = parse_response(body.trim()).map_err(|r| FixtureError::new(line_no, r))?;
            round_trips.push(RoundTrip::new(name, method, params, response));
        } else {
            return Err(FixtureError::new(
                line_no,
                format!("expected '{REQUEST_PREFIX}', '{RESPONSE_PREFIX}' or '{COMMENT_PREFIX}'"),
            ));
        }
    }

    if let Some((request_line, _, _)) = pending {
        return Err(FixtureError::new(
            request_line,
            "request has no response",
        ));
    }

    Ok(round_trips)
}

/// Top-level members of a JSON-RPC message, values left undecoded.
type Members<'a> = BTreeMap<String, &'a RawValue>;

fn members(body: &str) -> Result<Members<'_>, String> {
    serde_json::from_str(body).map_err(|e| format!("message must be a JSON object: {e}"))
}

fn parse_request(body: &str) -> Result<(String, Vec<EncodedDocument>), String> {
    let members = members(body)?;

    let method: String = members
        .get("method")
        .ok_or("request has no method")
        .and_then(|m| serde_json::from_str(m.get()).map_err(|_| "request method must be a string"))?;

    let params = match members.get("params") {
        None => Vec::new(),
        Some(raw) => {
            let items: Vec<&RawValue> = serde_json::from_str(raw.get())
                .map_err(|_| "request params must be an array (by-position)".to_string())?;
            items.into_iter().map(|p| EncodedDocument::new(p.get())).collect()
        }
    };

    Ok((method, params))
}

fn parse_response(body: &str) -> Result<Response, String> {
    let members = members(body)?;

    let result = members.get("result").map(|r| EncodedDocument::new(r.get()));
    let error = match members.get("error") {
        None => None,
        Some(raw) => match serde_json::from_str::<Value>(raw.get()) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => return Err(format!("response error is not valid JSON: {e}")),
        },
    };

    Ok(Response { result, error })
}
