//! # Loggers shipped with the crate.
//!
//! - [`TracingLogger`] forwards entries to `tracing::error!` (default).
//! - [`NopLogger`] discards everything.

use tracing::error;

use super::logger::{Field, FieldList, Logger};

/// Forwards error entries to the `tracing` ecosystem.
///
/// Fields are rendered into a single `fields` value, e.g.
/// `panic happened fields="runner=sync phase=Runnable attempt=2 kind=runner_panic"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, msg: &str, fields: &[Field]) {
        error!(fields = %FieldList(fields), "{msg}");
    }
}

/// Logger that drops every entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn error(&self, _msg: &str, _fields: &[Field]) {}
}
