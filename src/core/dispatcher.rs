//! # Phase dispatcher: sole owner of a phase queue.
//!
//! One dispatcher drives one phase from start to end:
//!
//! ```text
//! loop while outstanding > 0 {
//!   select (biased) {
//!     ctx.cancelled()       ─► close queue (once)
//!     completions.recv()    ─► outstanding -= 1
//!     queue.recv()          ─► open:   tokio::spawn(Worker::run)
//!                              closed: discard, outstanding -= 1
//!   }
//! }
//! ```
//!
//! ## Rules
//! - The dispatcher is the only reader of the queue and the only writer of the
//!   outstanding counter, so "reached zero → close" happens exactly once.
//! - Workers never close anything; they report terminal completions.
//! - On cancellation no new execution starts. Queued dispatches are discarded,
//!   but the phase only ends once every in-flight worker has reported. A worker
//!   whose repeat hits the closed queue reports a completion instead. A runner
//!   that ignores its token is bounded by the grace timer in `launch`.

use tokio::{select, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    core::{
        queue::PhaseQueue,
        worker::{Completion, Failure, Worker},
    },
    policies::BackoffPolicy,
    runners::Role,
};

/// What happened to a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PhaseSummary {
    /// Terminal completions reported by workers.
    pub completed: usize,
    /// Queued dispatches dropped after cancellation.
    pub discarded: usize,
    pub cancelled: bool,
}

pub(crate) struct PhaseDispatcher {
    pub queue: PhaseQueue,
    /// Token handed to every job of this phase; cancelling it stops new executions.
    pub ctx: CancellationToken,
    pub failures: mpsc::Sender<Failure>,
    pub backoff: BackoffPolicy,
}

impl PhaseDispatcher {
    pub async fn run(self) -> PhaseSummary {
        let Self {
            queue,
            ctx,
            failures,
            backoff,
        } = self;
        let PhaseQueue {
            role,
            tx,
            mut rx,
            mut outstanding,
            ..
        } = queue;

        let repeats = role == Role::Runnable;
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut completed = 0;
        let mut discarded = 0;
        let mut cancelled = false;
        let mut queue_open = true;

        debug!(?role, outstanding, "phase started");

        while outstanding > 0 {
            select! {
                biased;
                _ = ctx.cancelled(), if !cancelled => {
                    cancelled = true;
                    rx.close();
                    debug!(?role, outstanding, "phase cancelled; waiting for in-flight runners");
                }
                Some(done) = done_rx.recv() => {
                    outstanding -= 1;
                    completed += 1;
                    debug!(
                        ?role,
                        runner = %done.runner.name(),
                        attempt = done.attempt,
                        outstanding,
                        "runner completed"
                    );
                }
                dispatch = rx.recv(), if queue_open => match dispatch {
                    Some(dispatch) if !cancelled => {
                        let worker = Worker {
                            dispatch,
                            ctx: ctx.clone(),
                            requeue: repeats.then(|| tx.clone()),
                            failures: failures.clone(),
                            completions: done_tx.clone(),
                            backoff,
                        };
                        tokio::spawn(worker.run());
                    }
                    Some(dropped) => {
                        outstanding -= 1;
                        discarded += 1;
                        debug!(?role, runner = %dropped.runner.name(), "queued runner discarded");
                    }
                    None => queue_open = false,
                },
            }
        }

        rx.close();
        debug!(?role, completed, discarded, cancelled, "phase over");

        PhaseSummary {
            completed,
            discarded,
            cancelled,
        }
    }
}
