//! Tracing/logging setup shared by the binary and tests.

pub mod tracing;

pub use self::tracing::{Format, init, init_with};
