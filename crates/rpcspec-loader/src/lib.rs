//! # rpcspec-loader — Specification & Corpus Loaders
//!
//! Turns files on disk into the in-memory structures a check run consumes.
//!
//! - [`spec`] reads an OpenRPC document (JSON, or YAML by extension) into a
//!   [`MethodRegistry`](rpcspec_core::MethodRegistry), inlining local
//!   component references so every schema is self-contained.
//! - [`corpus`] walks a directory of `.io` fixtures and parses each
//!   `>>` request / `<<` response pair into a
//!   [`RoundTrip`](rpcspec_core::RoundTrip), in sorted path order.
//!
//! Both loaders run once at the start of a check run; their output is
//! read-only afterwards.

pub mod corpus;
pub mod spec;

pub use corpus::{load_corpus, parse_fixture, CorpusLoadError, FixtureError, FIXTURE_EXTENSION};
pub use spec::{load_spec, parse_spec, SpecLoadError};
