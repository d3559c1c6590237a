//! # launchvisor
//!
//! **Launchvisor** runs a fixed set of async jobs in two phases and shuts the
//! process down gracefully.
//!
//! Jobs are registered as *runnables* (the main work: servers, pollers,
//! migrations) or *finishers* (cleanup that runs once every runnable is done).
//! Runnables may be repeated after they finish, panic or fail; finishers run
//! exactly once. A shutdown signal cancels the runnables, then finishers still
//! run, and the launch ends when everything drained or a grace period elapsed.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Runnable A  │   │  Runnable B  │   │  Finisher F  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Launcher                                                         │
//! │  - runnable queue / finisher queue (bounded, filled before launch)│
//! │  - Logger (runner errors and panics)                              │
//! │  - ShutdownSignal (OS signals by default)                         │
//! └──────┬───────────────────────────────────────────────────┬────────┘
//!        ▼ launch(ctx)                                       │
//! ┌──────────────────────┐   Failure   ┌────────────────┐    │
//! │     Coordinator      │ ──────────► │ ErrorPipeline  │ ──► Logger::error
//! │ main ─► finishers    │   close     │ drain + flush  │    │
//! │ (PhaseDispatcher ×2) │ ──────────► │                │ ───┼──► jobs done
//! └──────┬───────────────┘             └────────────────┘    │
//!        ▼ one per execution                                 ▼
//!     ┌──────────────┐                              shared.cancelled()
//!     │    Worker    │ execute, then requeue                 │
//!     │              │ (after backoff) or complete           ▼
//!     └──────────────┘                          min(jobs done, grace timer)
//! ```
//!
//! ### Lifecycle
//! ```text
//! add_runner(job, opts) ──► validate ──► queue (attempt = 1)
//!
//! launch(ctx):
//!   Idle ─► RunningMain
//!     dispatch every runnable with ctx = shared (child of ctx)
//!     on finish:
//!       ├─ Panic && repeat.on_panic   ─► log, backoff, requeue
//!       ├─ Err   && repeat.on_error   ─► log, backoff, requeue
//!       ├─ Ok    && repeat.on_finish  ─► backoff, requeue
//!       └─ otherwise                  ─► log if failed, complete
//!     on shared cancelled: no new executions, queued ones discarded
//!     phase ends once every runnable completed or was discarded
//!   ─► RunningFinishers (skipped if none)
//!     dispatch every finisher once with ctx = caller's token
//!   ─► Draining
//!     close error pipeline, flush, cancel shared
//!   ─► Terminated (only if jobs done before the grace timer)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Launching**     | Register runners, run both phases, graceful exit.        | [`Launcher`], [`LauncherBuilder`], [`Exit`]|
//! | **Runners**       | Define jobs as trait objects or closures.                | [`Job`], [`JobFn`], [`RunnerOpts`]         |
//! | **Policies**      | Repeat conditions and the delay between repeats.         | [`RepeatPolicy`], [`BackoffPolicy`]        |
//! | **Logging**       | Sink for runtime errors and panics.                      | [`Logger`], [`TracingLogger`]              |
//! | **Shutdown**      | Pluggable interruption source.                           | [`ShutdownSignal`], [`OsSignals`]          |
//! | **Errors**        | Typed runner outcomes and registration errors.           | [`RunnerError`], [`ConfigError`]           |
//! | **Configuration** | Queue capacity, grace period, repeat backoff.            | [`LauncherConfig`]                         |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use launchvisor::{Exit, Launcher, LauncherConfig, NoSignal, RunnerOpts};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = LauncherConfig {
//!         grace: Duration::from_secs(2),
//!         ..LauncherConfig::default()
//!     };
//!     let mut launcher = Launcher::builder(cfg).with_signal(NoSignal).build();
//!
//!     launcher.add_fn(
//!         "hello",
//!         |ctx: CancellationToken| async move {
//!             if ctx.is_cancelled() { return Ok(()); }
//!             println!("Hello from runner!");
//!             Ok(())
//!         },
//!         RunnerOpts::new(),
//!     )?;
//!     launcher.add_fn(
//!         "goodbye",
//!         |_ctx: CancellationToken| async { println!("cleaning up"); Ok(()) },
//!         RunnerOpts::new().finisher(),
//!     )?;
//!
//!     assert_eq!(launcher.launch(CancellationToken::new()).await, Exit::JobsDone);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod logging;
mod policies;
mod runners;

// ---- Public re-exports ----

pub use core::{
    Exit, LaunchState, Launcher, LauncherBuilder, LauncherConfig, NoSignal, OsSignals,
    ShutdownSignal,
};
pub use error::{ConfigError, RunnerError};
pub use logging::{Field, Logger, NopLogger, TracingLogger};
pub use policies::{BackoffPolicy, JitterPolicy, RepeatPolicy, RepeatReason};
pub use runners::{BoxJobFuture, Job, JobFn, JobRef, Role, Runner, RunnerOpts};
