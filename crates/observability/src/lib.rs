//! Process-wide logging setup for the awap binaries and tests.

pub mod tracing;

pub use self::tracing::{DEFAULT_DIRECTIVE, init, init_with_default};
