//! # Checker
//!
//! Matches round trips to method definitions and validates them, stopping
//! at the first failure.
//!
//! Parameters bind by position: the value at index `i` of a round trip is
//! checked against the `i`-th declared parameter. A round trip may supply
//! fewer values than declared as long as every omitted parameter is
//! optional; it may never supply more.

use rpcspec_core::{EncodedDocument, MethodRegistry, MethodSchema, RoundTrip};
use rpcspec_schema::{
    build_debug_url, force_dialect, JsonSchemaEngine, SchemaEngine, SchemaValidationError,
    SchemaValidator, Violation,
};
use serde_json::Value;

use crate::diagnostics::DiagnosticSink;
use crate::error::CheckError;

/// Run configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckConfig {
    /// Attach a schema-debugger link to validation errors.
    pub generate_debug_urls: bool,
}

/// Counts from a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Round trips whose parameters (and result, if any) were validated.
    pub checked: usize,
    /// Round trips skipped because they are tagged `expect_invalid`.
    pub skipped_invalid: usize,
    /// Of `checked`, round trips whose result validation was skipped
    /// because the response is an error.
    pub skipped_error_results: usize,
}

impl CheckSummary {
    /// Total round trips visited.
    pub fn total(&self) -> usize {
        self.checked + self.skipped_invalid
    }
}

/// Validates a corpus of round trips against a method registry.
pub struct Checker<'a, E: SchemaEngine = JsonSchemaEngine, S: DiagnosticSink = crate::NullSink> {
    registry: &'a MethodRegistry,
    validator: SchemaValidator<E>,
    config: CheckConfig,
    sink: S,
}

impl<'a, S: DiagnosticSink> Checker<'a, JsonSchemaEngine, S> {
    /// Create a checker backed by the `jsonschema` crate.
    pub fn new(registry: &'a MethodRegistry, config: CheckConfig, sink: S) -> Self {
        Self::with_validator(registry, SchemaValidator::new(), config, sink)
    }
}

impl<'a, E: SchemaEngine, S: DiagnosticSink> Checker<'a, E, S> {
    /// Create a checker backed by a custom schema engine.
    pub fn with_validator(
        registry: &'a MethodRegistry,
        validator: SchemaValidator<E>,
        config: CheckConfig,
        sink: S,
    ) -> Self {
        Self {
            registry,
            validator,
            config,
            sink,
        }
    }

    /// Consume the checker and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Check every round trip in order.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered; later round trips are not
    /// looked at.
    pub fn run(&mut self, round_trips: &[RoundTrip]) -> Result<CheckSummary, CheckError> {
        tracing::info!(
            round_trips = round_trips.len(),
            methods = self.registry.len(),
            debug_urls = self.config.generate_debug_urls,
            "checking round trips"
        );

        let mut summary = CheckSummary::default();
        for rt in round_trips {
            self.check_round_trip(rt, &mut summary)?;
        }

        tracing::info!(
            checked = summary.checked,
            skipped_invalid = summary.skipped_invalid,
            skipped_error_results = summary.skipped_error_results,
            "all round trips passed"
        );
        self.sink.all_passing(&summary);
        Ok(summary)
    }

    fn check_round_trip(
        &mut self,
        rt: &RoundTrip,
        summary: &mut CheckSummary,
    ) -> Result<(), CheckError> {
        let registry = self.registry;
        let method = registry
            .lookup(&rt.method)
            .ok_or_else(|| CheckError::UndefinedMethod {
                method: rt.method.clone(),
            })?;

        if rt.expect_invalid {
            tracing::debug!(round_trip = %rt.name, "skipping expected-invalid round trip");
            summary.skipped_invalid += 1;
            return Ok(());
        }

        if rt.params.len() > method.params.len() {
            return Err(CheckError::TooManyParameters {
                method: method.name.clone(),
                supplied: rt.params.len(),
                declared: method.params.len(),
            });
        }

        tracing::debug!(
            round_trip = %rt.name,
            method = %method.name,
            supplied = rt.params.len(),
            required = method.min_params(),
            "checking round trip"
        );

        for (index, param) in method.params.iter().enumerate() {
            let Some(raw) = rt.params.get(index) else {
                if param.required {
                    return Err(CheckError::MissingRequiredParameter {
                        method: method.name.clone(),
                        index,
                    });
                }
                tracing::trace!(method = %method.name, param = %param.name, "optional parameter omitted");
                continue;
            };
            self.check_param(rt, method, index, raw)?;
        }

        summary.checked += 1;

        if rt.response.is_error_only() {
            // Error payloads are not standardized.
            summary.skipped_error_results += 1;
            return Ok(());
        }

        let raw = rt
            .response
            .result
            .as_ref()
            .ok_or_else(|| CheckError::MissingResult {
                round_trip: rt.name.clone(),
                method: method.name.clone(),
            })?;
        self.check_result(rt, method, raw)
    }

    fn check_param(
        &self,
        rt: &RoundTrip,
        method: &MethodSchema,
        index: usize,
        raw: &EncodedDocument,
    ) -> Result<(), CheckError> {
        let schema = &method.params[index].schema;
        let context = format!("{}.param[{index}]", method.name);

        let Some(violation) = split_violation(rt, self.validator.validate(schema, raw, &context))? else {
            return Ok(());
        };
        Err(CheckError::ParameterValidation {
            round_trip: rt.name.clone(),
            method: method.name.clone(),
            index,
            violation,
            debug_url: self.debug_url(schema, raw, &context)?,
        })
    }

    fn check_result(
        &mut self,
        rt: &RoundTrip,
        method: &MethodSchema,
        raw: &EncodedDocument,
    ) -> Result<(), CheckError> {
        let schema = &method.result.schema;
        let context = format!("{}.result", method.name);

        let Some(violation) = split_violation(rt, self.validator.validate(schema, raw, &context))? else {
            return Ok(());
        };
        self.sink.result_mismatch(&force_dialect(schema), raw);
        Err(CheckError::ResultValidation {
            round_trip: rt.name.clone(),
            method: method.name.clone(),
            violation,
            debug_url: self.debug_url(schema, raw, &context)?,
        })
    }

    fn debug_url(
        &self,
        schema: &Value,
        raw: &EncodedDocument,
        context: &str,
    ) -> Result<Option<String>, CheckError> {
        if !self.config.generate_debug_urls {
            return Ok(None);
        }
        build_debug_url(&force_dialect(schema), raw)
            .map(Some)
            .map_err(|e| CheckError::SchemaMarshal {
                context: context.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Separate a conformance violation from the adapter failures that end the
/// run on their own.
fn split_violation(
    rt: &RoundTrip,
    outcome: Result<(), SchemaValidationError>,
) -> Result<Option<Violation>, CheckError> {
    match outcome {
        Ok(()) => Ok(None),
        Err(SchemaValidationError::ValidationFailed { violation, .. }) => Ok(Some(violation)),
        Err(SchemaValidationError::SchemaCompile { context, reason }) => {
            Err(CheckError::SchemaCompile { context, reason })
        }
        Err(SchemaValidationError::SchemaMarshal { context, reason }) => {
            Err(CheckError::SchemaMarshal { context, reason })
        }
        Err(SchemaValidationError::MalformedInstance { context, reason }) => {
            Err(CheckError::MalformedInstance {
                round_trip: rt.name.clone(),
                context,
                reason,
            })
        }
    }
}

/// Check `round_trips` against `registry` with the `jsonschema`-backed
/// engine.
///
/// Prints nothing itself; `sink` receives the result-mismatch dump and the
/// success line.
///
/// # Errors
///
/// Returns the first failure encountered.
pub fn check<S: DiagnosticSink>(
    registry: &MethodRegistry,
    round_trips: &[RoundTrip],
    config: CheckConfig,
    sink: S,
) -> Result<CheckSummary, CheckError> {
    Checker::new(registry, config, sink).run(round_trips)
}
