//! # speccheck entry point
//!
//! Parses command-line arguments, sets up logging and runs the check.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rpcspec_cli::check::{run_check, CheckArgs};

/// Check recorded JSON-RPC round trips against an OpenRPC specification.
///
/// Every supplied parameter and every successful result must conform to the
/// schema the specification declares for it. The run stops at the first
/// failure.
#[derive(Parser, Debug)]
#[command(name = "speccheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(
        spec = %cli.check.spec.display(),
        tests = %cli.check.tests.display(),
        "speccheck starting"
    );

    match run_check(&cli.check) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
