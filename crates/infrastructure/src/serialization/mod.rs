//! Deterministic JSON for files written by the local store.
//!
//! Output uses 2-space indentation and ends with a newline, so store files
//! stay readable and diff cleanly.

mod json;

pub use json::*;
