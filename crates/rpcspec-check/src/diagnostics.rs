//! # Diagnostic Sinks
//!
//! Human-facing output of a check run. The checker never prints; it hands
//! events to a [`DiagnosticSink`] supplied by the caller.

use std::io::{self, Write};

use rpcspec_core::EncodedDocument;
use serde_json::Value;

use crate::checker::CheckSummary;

/// Receiver for human-facing run output.
pub trait DiagnosticSink {
    /// A result failed validation. Called before the error is returned, with
    /// the schema as evaluated and the raw recorded result.
    fn result_mismatch(&mut self, schema: &Value, raw: &EncodedDocument);

    /// Every round trip passed.
    fn all_passing(&mut self, summary: &CheckSummary);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn result_mismatch(&mut self, schema: &Value, raw: &EncodedDocument) {
        (**self).result_mismatch(schema, raw);
    }

    fn all_passing(&mut self, summary: &CheckSummary) {
        (**self).all_passing(summary);
    }
}

/// Writes diagnostics as plain text to a stream.
///
/// A result mismatch prints the compact schema, the raw value and a blank
/// line; success prints `all passing.`.
#[derive(Debug)]
pub struct StreamSink<W> {
    out: W,
}

impl StreamSink<io::Stdout> {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StreamSink<W> {
    /// A sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[&str]) {
        for line in lines {
            if let Err(e) = writeln!(self.out, "{line}") {
                // The run outcome does not depend on diagnostics reaching the stream.
                tracing::warn!(error = %e, "failed to write diagnostic output");
                return;
            }
        }
    }
}

impl<W: Write> DiagnosticSink for StreamSink<W> {
    fn result_mismatch(&mut self, schema: &Value, raw: &EncodedDocument) {
        let schema = schema.to_string();
        self.write_lines(&[&schema, raw.as_str(), ""]);
    }

    fn all_passing(&mut self, _summary: &CheckSummary) {
        self.write_lines(&["all passing."]);
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn result_mismatch(&mut self, _schema: &Value, _raw: &EncodedDocument) {}

    fn all_passing(&mut self, _summary: &CheckSummary) {}
}

/// A diagnostic captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// A result failed validation.
    ResultMismatch {
        /// The schema as evaluated.
        schema: Value,
        /// The recorded result.
        raw: EncodedDocument,
    },
    /// The run passed.
    AllPassing(CheckSummary),
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Captured diagnostics.
    pub events: Vec<DiagnosticEvent>,
}

impl RecordingSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for RecordingSink {
    fn result_mismatch(&mut self, schema: &Value, raw: &EncodedDocument) {
        self.events.push(DiagnosticEvent::ResultMismatch {
            schema: schema.clone(),
            raw: raw.clone(),
        });
    }

    fn all_passing(&mut self, summary: &CheckSummary) {
        self.events.push(DiagnosticEvent::AllPassing(*summary));
    }
}
