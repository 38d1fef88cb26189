//! Output writers for the artifacts a run produces.
//!
//! The snapshot is the only artifact: a single JSON document the static
//! viewer reads. It is rewritten atomically and in full on every run.

pub mod json;
