//! # Unit of work executed by a runner.
//!
//! A [`Job`] has a stable name and produces one future per execution. The
//! future receives a [`CancellationToken`] and should return promptly once it
//! is cancelled (usually with [`RunnerError::Canceled`]).

use std::{future::Future, pin::Pin, sync::Arc};

use tokio_util::sync::CancellationToken;

use crate::error::RunnerError;

/// Boxed future returned by [`Job::run`].
pub type BoxJobFuture = Pin<Box<dyn Future<Output = Result<(), RunnerError>> + Send + 'static>>;

/// Shared handle to a job.
pub type JobRef = Arc<dyn Job>;

/// # Asynchronous, cancelable unit of work.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use launchvisor::{BoxJobFuture, Job, RunnerError};
///
/// struct Ping;
///
/// impl Job for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     fn run(&self, ctx: CancellationToken) -> BoxJobFuture {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Err(RunnerError::Canceled);
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Job: Send + Sync + 'static {
    /// Stable, human-readable name used in logs.
    fn name(&self) -> &str;

    /// Creates the future for one execution.
    fn run(&self, ctx: CancellationToken) -> BoxJobFuture;
}
