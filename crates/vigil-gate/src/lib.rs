//! # vigil-gate
//!
//! Browser capability gate for the VIGIL runtime: classifies the host
//! environment as trusted or untrusted before any session state exists.
//!
//! The gate is a pure function: it performs no I/O and holds no state, so
//! the session controller can re-run it identically on every explicit
//! retry-detection action.

pub mod classify;

pub use classify::{classify, BrowserProfile};
