//! # Runner abstractions.
//!
//! - [`Job`] - trait for an async, cancelable unit of work
//! - [`JobFn`] - closure-backed job
//! - [`JobRef`] - shared reference to a job (`Arc<dyn Job>`)
//! - [`Runner`] - job plus [`Role`] and repeat policy, validated at registration
//! - [`RunnerOpts`] - registration options

mod job;
mod job_fn;
mod runner;

pub use job::{BoxJobFuture, Job, JobRef};
pub use job_fn::JobFn;
pub use runner::{Role, Runner, RunnerOpts};
