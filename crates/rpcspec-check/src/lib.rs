//! # rpcspec-check — Specification Conformance Checker
//!
//! Cross-validates an OpenRPC specification against recorded round trips:
//! every supplied parameter and every successful result must conform to the
//! schema the specification declares for it.
//!
//! ## Run model
//!
//! A run walks the corpus in order and stops at the first failure, which
//! becomes the run's single outcome. There is no collect-all mode.
//!
//! For each round trip the [`Checker`]:
//!
//! 1. resolves its method in the [`MethodRegistry`](rpcspec_core::MethodRegistry)
//!    (unknown method is an error);
//! 2. skips it entirely if it is tagged `expect_invalid`;
//! 3. rejects it if it supplies more parameters than the method declares;
//! 4. validates each supplied parameter against the parameter schema at the
//!    same position, tolerating omitted optional parameters;
//! 5. validates the result, unless the response is an error with no result.
//!
//! ## Diagnostics
//!
//! Output meant for a human goes through a [`DiagnosticSink`] rather than
//! straight to stdout. With [`CheckConfig::generate_debug_urls`] set,
//! validation errors also carry a link to the interactive schema debugger.

pub mod checker;
pub mod diagnostics;
pub mod error;

pub use checker::{check, CheckConfig, CheckSummary, Checker};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink, RecordingSink, StreamSink};
pub use error::CheckError;
