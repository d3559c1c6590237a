//! # Logging for the launcher.
//!
//! Runtime failures are reported, never returned. This module provides the
//! [`Logger`] trait the error pipeline writes to, plus two implementations.
//!
//! ## Architecture
//! ```text
//! worker ── Failure ──► [error channel] ──► ErrorPipeline ──► Logger::error(msg, fields)
//!                                                               │
//!                                               ┌───────────────┼──────────────┐
//!                                               ▼               ▼              ▼
//!                                         TracingLogger     NopLogger       custom
//! ```
//!
//! Lifecycle messages (phase changes, shutdown) go straight to `tracing`.

mod logger;
mod tracing_logger;

#[cfg(test)]
pub(crate) mod recording;

pub use logger::{Field, Logger};
pub use tracing_logger::{NopLogger, TracingLogger};
