//! # Execute one dispatch of a runner.
//!
//! Each dequeued [`Dispatch`] gets its own tokio task running a [`Worker`]:
//!
//! ```text
//! runner.execute(ctx)
//!   ├─ Err(e) ──► failures.send(Failure)        (awaits room: error backpressure)
//!   ▼
//! repeat.decide(&result)      (only when the phase allows repeats)
//!   ├─ Some(reason) ──► sleep(backoff)          (cancellable by ctx)
//!   │                     ├─ slept     ──► requeue(attempt + 1) ──► done, no completion
//!   │                     └─ cancelled ──► terminal
//!   └─ None ──► terminal
//!
//! terminal ──► completions.send(Completion) ──► dispatcher decrements outstanding
//! ```
//!
//! ## Rules
//! - A requeue never touches the outstanding counter.
//! - Exactly one completion is reported per terminal outcome.
//! - Once `ctx` is cancelled no further re-submission happens.
//! - A repeat that hits the closed queue of a cancelled phase becomes a
//!   completion, so the dispatcher still sees the runner finish.
//! - Other failed sends mean the grace timer already ended the launch; they
//!   are dropped.

use std::sync::Arc;

use tokio::{select, sync::mpsc, time};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    core::queue::Dispatch,
    error::RunnerError,
    policies::BackoffPolicy,
    runners::{Role, Runner},
};

/// An error reported by a worker to the error pipeline.
#[derive(Debug, Clone)]
pub(crate) struct Failure {
    pub runner: Arc<str>,
    pub role: Role,
    pub attempt: u32,
    pub error: RunnerError,
}

/// Terminal completion of a runner, reported to its phase dispatcher.
#[derive(Debug)]
pub(crate) struct Completion {
    pub runner: Arc<Runner>,
    pub attempt: u32,
}

pub(crate) struct Worker {
    pub dispatch: Dispatch,
    /// Token handed to the job.
    pub ctx: CancellationToken,
    /// Queue to re-submit into; `None` for phases without repeats.
    pub requeue: Option<mpsc::Sender<Dispatch>>,
    pub failures: mpsc::Sender<Failure>,
    pub completions: mpsc::UnboundedSender<Completion>,
    pub backoff: BackoffPolicy,
}

impl Worker {
    pub async fn run(self) {
        let Dispatch { runner, attempt } = self.dispatch;
        let res = runner.execute(self.ctx.clone()).await;

        if let Err(error) = &res {
            let failure = Failure {
                runner: Arc::from(runner.name()),
                role: runner.role(),
                attempt,
                error: error.clone(),
            };
            let _ = self.failures.send(failure).await;
        }

        let runner = match &self.requeue {
            Some(queue) => {
                match resubmit(queue, &self.ctx, &self.backoff, runner, attempt, &res).await {
                    Some(runner) => runner,
                    None => return,
                }
            }
            None => runner,
        };

        let _ = self.completions.send(Completion { runner, attempt });
    }
}

/// Re-submits `runner` if its policy asks for it.
///
/// Returns `None` when the runner went back to the queue, or gives the runner
/// back when this execution is terminal.
async fn resubmit(
    queue: &mpsc::Sender<Dispatch>,
    ctx: &CancellationToken,
    backoff: &BackoffPolicy,
    runner: Arc<Runner>,
    attempt: u32,
    res: &Result<(), RunnerError>,
) -> Option<Arc<Runner>> {
    let Some(reason) = runner.repeat().decide(res) else {
        return Some(runner);
    };

    let delay = backoff.delay_for(attempt.saturating_sub(1));
    debug!(runner = %runner.name(), attempt, ?reason, ?delay, "repeat scheduled");

    let sleep = time::sleep(delay);
    tokio::pin!(sleep);
    select! {
        _ = &mut sleep => {}
        _ = ctx.cancelled() => {
            debug!(runner = %runner.name(), attempt, "repeat dropped: cancelled during backoff");
            return Some(runner);
        }
    }

    let next = Dispatch {
        runner,
        attempt: attempt.saturating_add(1),
    };
    match queue.send(next).await {
        Ok(()) => None,
        Err(mpsc::error::SendError(back)) => Some(back.runner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runners::{JobFn, JobRef, RunnerOpts};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct Harness {
        queue_tx: mpsc::Sender<Dispatch>,
        queue_rx: mpsc::Receiver<Dispatch>,
        failures_tx: mpsc::Sender<Failure>,
        failures_rx: mpsc::Receiver<Failure>,
        done_tx: mpsc::UnboundedSender<Completion>,
        done_rx: mpsc::UnboundedReceiver<Completion>,
    }

    impl Harness {
        fn new() -> Self {
            let (queue_tx, queue_rx) = mpsc::channel(4);
            let (failures_tx, failures_rx) = mpsc::channel(4);
            let (done_tx, done_rx) = mpsc::unbounded_channel();
            Self {
                queue_tx,
                queue_rx,
                failures_tx,
                failures_rx,
                done_tx,
                done_rx,
            }
        }

        fn worker(&self, runner: Runner, ctx: CancellationToken, repeats: bool) -> Worker {
            Worker {
                dispatch: Dispatch {
                    runner: Arc::new(runner),
                    attempt: 1,
                },
                ctx,
                requeue: repeats.then(|| self.queue_tx.clone()),
                failures: self.failures_tx.clone(),
                completions: self.done_tx.clone(),
                backoff: BackoffPolicy::constant(Duration::from_millis(10)),
            }
        }
    }

    fn failing(calls: Arc<AtomicU32>) -> JobRef {
        JobFn::arc("failing", move |_ctx: CancellationToken| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RunnerError::fail("unavailable"))
            }
        })
    }

    #[tokio::test]
    async fn terminal_failure_reports_error_then_completion() {
        let mut h = Harness::new();
        let calls = Arc::new(AtomicU32::new(0));
        let runner = Runner::new(failing(calls.clone()), RunnerOpts::new()).unwrap();

        h.worker(runner, CancellationToken::new(), true).run().await;

        let failure = h.failures_rx.try_recv().unwrap();
        assert_eq!(&*failure.runner, "failing");
        assert_eq!(failure.attempt, 1);
        assert_eq!(failure.error, RunnerError::fail("unavailable"));

        let done = h.done_rx.try_recv().unwrap();
        assert_eq!(done.attempt, 1);
        assert!(h.queue_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn repeat_on_error_requeues_without_completion() {
        let mut h = Harness::new();
        let calls = Arc::new(AtomicU32::new(0));
        let runner = Runner::new(failing(calls), RunnerOpts::new().repeat_on_error()).unwrap();

        h.worker(runner, CancellationToken::new(), true).run().await;

        let again = h.queue_rx.try_recv().unwrap();
        assert_eq!(again.attempt, 2);
        assert!(h.done_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancellation_during_backoff_is_terminal() {
        let mut h = Harness::new();
        let calls = Arc::new(AtomicU32::new(0));
        let runner = Runner::new(failing(calls), RunnerOpts::new().repeat_on_error()).unwrap();
        let ctx = CancellationToken::new();
        ctx.cancel();

        h.worker(runner, ctx, true).run().await;

        assert!(h.queue_rx.try_recv().is_err());
        assert!(h.done_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn phase_without_repeats_ignores_policy() {
        let mut h = Harness::new();
        let calls = Arc::new(AtomicU32::new(0));
        let runner = Runner::new(failing(calls), RunnerOpts::new().repeat_on_error()).unwrap();

        h.worker(runner, CancellationToken::new(), false).run().await;

        assert!(h.queue_rx.try_recv().is_err());
        assert!(h.done_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn closed_queue_turns_repeat_into_completion() {
        let mut h = Harness::new();
        h.queue_rx.close();
        let calls = Arc::new(AtomicU32::new(0));
        let runner = Runner::new(failing(calls), RunnerOpts::new().repeat_on_finish()).unwrap();

        h.worker(runner, CancellationToken::new(), true).run().await;

        assert!(h.done_rx.try_recv().is_ok());
    }
}
