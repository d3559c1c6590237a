//! # Closure-backed job (`JobFn`)
//!
//! [`JobFn`] wraps `F: Fn(CancellationToken) -> Fut` and builds a fresh future
//! for every execution, so repeats never share hidden state. Share state
//! explicitly through an `Arc` captured by the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use tokio_util::sync::CancellationToken;
//! use launchvisor::{JobFn, JobRef, RunnerError};
//!
//! let polls = Arc::new(AtomicU32::new(0));
//! let counter = polls.clone();
//! let job: JobRef = JobFn::arc("poller", move |_ctx: CancellationToken| {
//!     let counter = counter.clone();
//!     async move {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok::<_, RunnerError>(())
//!     }
//! });
//!
//! assert_eq!(job.name(), "poller");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::RunnerError;
use crate::runners::job::{BoxJobFuture, Job};

/// Closure-backed job.
pub struct JobFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F, Fut> JobFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunnerError>> + Send + 'static,
{
    /// Creates a new closure-backed job.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the job and returns it as a shared [`JobRef`](crate::JobRef).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Job for JobFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunnerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: CancellationToken) -> BoxJobFuture {
        Box::pin((self.f)(ctx))
    }
}
