//! # Check command
//!
//! Loads the specification and the fixture corpus, then runs the checker
//! with diagnostics written to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;

use rpcspec_check::{check, CheckConfig, CheckSummary, DiagnosticSink, StreamSink};
use rpcspec_loader::{load_corpus, load_spec};

/// Arguments of a check run.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// OpenRPC specification document (JSON, or YAML by extension).
    #[arg(long, default_value = "openrpc.json")]
    pub spec: PathBuf,

    /// Directory holding the `.io` fixtures.
    #[arg(long, default_value = "tests")]
    pub tests: PathBuf,

    /// Only check round trips whose name matches this regular expression.
    #[arg(long, default_value = ".*")]
    pub regexp: String,

    /// Attach a schema-debugger link to validation failures.
    #[arg(long)]
    pub debug_urls: bool,
}

/// Execute a check run, printing diagnostics to stdout.
///
/// # Errors
///
/// Returns the load failure or the first non-conforming round trip.
pub fn run_check(args: &CheckArgs) -> Result<()> {
    run_check_with(args, StreamSink::stdout())?;
    Ok(())
}

/// Execute a check run, sending diagnostics to `sink`.
pub fn run_check_with<S: DiagnosticSink>(args: &CheckArgs, sink: S) -> Result<CheckSummary> {
    let filter = Regex::new(&args.regexp)
        .with_context(|| format!("invalid --regexp pattern: {}", args.regexp))?;

    let registry = load_spec(&args.spec)
        .with_context(|| format!("failed to load specification: {}", args.spec.display()))?;
    let round_trips = load_corpus(&args.tests, Some(&filter))
        .with_context(|| format!("failed to load round trips: {}", args.tests.display()))?;

    tracing::debug!(
        methods = registry.len(),
        round_trips = round_trips.len(),
        "loaded specification and corpus"
    );

    let config = CheckConfig {
        generate_debug_urls: args.debug_urls,
    };
    let summary = check(&registry, &round_trips, config, sink)?;
    Ok(summary)
}
