//! # rpcspec-cli — the `speccheck` command
//!
//! Checks a directory of recorded JSON-RPC round trips against an OpenRPC
//! specification and exits non-zero on the first non-conforming value.
//!
//! ```bash
//! # Check every fixture under tests/ against openrpc.json:
//! speccheck
//!
//! # Only the eth_call fixtures, with schema-debugger links on failure:
//! speccheck --spec openrpc.yaml --tests fixtures --regexp '^eth_call/' --debug-urls
//! ```

pub mod check;
