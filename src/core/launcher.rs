//! # Launcher: registers runners and supervises one launch.
//!
//! The [`Launcher`] owns both phase queues, the logger and the signal source.
//! Runners are registered with [`Launcher::add_runner`]; [`Launcher::launch`]
//! consumes the launcher, so every launcher runs at most once.
//!
//! ## High-level architecture
//! ```text
//! add_runner(job, opts) ──► Runner::new (validate) ──► runnable / finisher PhaseQueue
//!
//! launch(ctx):
//!   shared = ctx.child_token()
//!   spawn signal_trigger(signal, shared)          ── signal ─► shared.cancel()
//!   spawn ErrorPipeline(failures, logger)         ── close  ─► flush ─► jobs_done
//!   spawn Coordinator(runnables, finishers)       ── end    ─► close pipeline, shared.cancel()
//!
//!   shared.cancelled().await
//!   wait_graceful(jobs_done, grace) ─► Exit::JobsDone | Exit::GraceElapsed
//! ```
//!
//! - Runtime failures are logged, never returned.
//! - `launch` returns once work drained and errors flushed, or once `grace`
//!   elapsed after cancellation, whichever comes first.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use launchvisor::{Exit, Launcher, LauncherConfig, NoSignal, RunnerError, RunnerOpts};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = LauncherConfig {
//!         grace: Duration::from_secs(1),
//!         ..LauncherConfig::default()
//!     };
//!     let mut launcher = Launcher::builder(cfg).with_signal(NoSignal).build();
//!
//!     launcher.add_fn("migrate", |_ctx: CancellationToken| async { Ok(()) }, RunnerOpts::new())?;
//!     launcher.add_fn(
//!         "flush",
//!         |_ctx: CancellationToken| async { Err(RunnerError::fail("nothing to flush")) },
//!         RunnerOpts::new().finisher(),
//!     )?;
//!
//!     let exit = launcher.launch(CancellationToken::new()).await;
//!     assert_eq!(exit, Exit::JobsDone);
//!     Ok(())
//! }
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    core::{
        builder::LauncherBuilder,
        config::LauncherConfig,
        coordinator::Coordinator,
        pipeline::ErrorPipeline,
        queue::PhaseQueue,
        shutdown::{self, ShutdownSignal},
        state::{Exit, LaunchState, StateCell},
    },
    error::{ConfigError, RunnerError},
    logging::Logger,
    runners::{JobFn, JobRef, Role, Runner, RunnerOpts},
};

/// Registers runners and runs them through both phases.
pub struct Launcher {
    cfg: LauncherConfig,
    logger: Arc<dyn Logger>,
    signal: Arc<dyn ShutdownSignal>,
    runnables: PhaseQueue,
    finishers: PhaseQueue,
    state: Arc<StateCell>,
}

impl Launcher {
    /// Launcher with the default logger ([`TracingLogger`](crate::TracingLogger))
    /// and signal source ([`OsSignals`](crate::OsSignals)).
    pub fn new(cfg: LauncherConfig) -> Self {
        LauncherBuilder::new(cfg).build()
    }

    /// Starts a builder for a launcher with custom collaborators.
    pub fn builder(cfg: LauncherConfig) -> LauncherBuilder {
        LauncherBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: LauncherConfig,
        logger: Arc<dyn Logger>,
        signal: Arc<dyn ShutdownSignal>,
    ) -> Self {
        let capacity = cfg.queue_capacity();
        Self {
            runnables: PhaseQueue::new(Role::Runnable, capacity),
            finishers: PhaseQueue::new(Role::Finisher, capacity),
            cfg,
            logger,
            signal,
            state: Arc::new(StateCell::new()),
        }
    }

    /// Registers a job.
    ///
    /// ### Errors
    /// - [`ConfigError::FinisherWithRepeat`] if a finisher carries a repeat flag;
    /// - [`ConfigError::QueueFull`] if the phase already holds `queue_capacity` runners.
    pub fn add_runner(&mut self, job: JobRef, opts: RunnerOpts) -> Result<(), ConfigError> {
        let runner = Runner::new(job, opts)?;
        match runner.role() {
            Role::Runnable => self.runnables.push(runner),
            Role::Finisher => self.finishers.push(runner),
        }
    }

    /// Registers a closure as a job; see [`JobFn`].
    pub fn add_fn<F, Fut>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        f: F,
        opts: RunnerOpts,
    ) -> Result<(), ConfigError>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), RunnerError>> + Send + 'static,
    {
        self.add_runner(JobFn::arc(name, f), opts)
    }

    /// Number of registered main-phase runners.
    pub fn runnable_count(&self) -> usize {
        self.runnables.outstanding
    }

    /// Number of registered finishers.
    pub fn finisher_count(&self) -> usize {
        self.finishers.outstanding
    }

    /// Watches the lifecycle of this launcher; see [`LaunchState`].
    pub fn state(&self) -> watch::Receiver<LaunchState> {
        self.state.subscribe()
    }

    /// Runs every registered runner and returns when the launch is over.
    ///
    /// `ctx` is the caller's token: cancelling it cancels the runnables and also
    /// prevents finishers from being dispatched. A shutdown signal only cancels
    /// the runnables; finishers still run.
    ///
    /// Never fails: errors are reported through the logger.
    pub async fn launch(self, ctx: CancellationToken) -> Exit {
        let Self {
            cfg,
            logger,
            signal,
            runnables,
            finishers,
            state,
        } = self;

        let shared = ctx.child_token();
        let grace = cfg.grace();
        let (failures_tx, failures_rx) = mpsc::channel(cfg.queue_capacity());
        let (close_tx, close_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        info!(
            runnables = runnables.outstanding,
            finishers = finishers.outstanding,
            ?grace,
            "launch started"
        );

        let trigger = tokio::spawn(shutdown::signal_trigger(signal, shared.clone()));

        let pipeline = ErrorPipeline {
            failures: failures_rx,
            close: close_rx,
            shared: shared.clone(),
            logger,
        };
        tokio::spawn(pipeline.run(done_tx));

        let coordinator = Coordinator {
            runnables,
            finishers,
            caller: ctx,
            shared: shared.clone(),
            failures: failures_tx,
            close_pipeline: close_tx,
            backoff: cfg.repeat_backoff,
            state: state.clone(),
        };
        tokio::spawn(coordinator.run());

        shared.cancelled().await;
        let exit = shutdown::wait_graceful(done_rx, grace).await;
        trigger.abort();

        if exit == Exit::JobsDone {
            state.advance(LaunchState::Terminated);
        }
        exit
    }
}
