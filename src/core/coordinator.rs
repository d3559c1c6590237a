//! # Coordinator: phase ordering.
//!
//! ```text
//! RunningMain       PhaseDispatcher(runnables, ctx = shared)
//!      │ every runnable completed or discarded
//!      ▼
//! RunningFinishers  PhaseDispatcher(finishers, ctx = caller)   (skipped if none)
//!      │ every finisher completed or discarded
//!      ▼
//! Draining          close error pipeline, cancel shared
//! ```
//!
//! Finishers run against the caller's token, not the shared one, so cleanup
//! still happens after a signal. They only stop early if the caller itself
//! cancels.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    core::{
        dispatcher::PhaseDispatcher,
        queue::PhaseQueue,
        state::{LaunchState, StateCell},
        worker::Failure,
    },
    policies::BackoffPolicy,
};

pub(crate) struct Coordinator {
    pub runnables: PhaseQueue,
    pub finishers: PhaseQueue,
    /// Caller's token.
    pub caller: CancellationToken,
    /// Child of `caller`; cancelled by signals and at the end of the run.
    pub shared: CancellationToken,
    pub failures: mpsc::Sender<Failure>,
    pub close_pipeline: oneshot::Sender<()>,
    pub backoff: BackoffPolicy,
    pub state: Arc<StateCell>,
}

impl Coordinator {
    pub async fn run(self) {
        let Self {
            runnables,
            finishers,
            caller,
            shared,
            failures,
            close_pipeline,
            backoff,
            state,
        } = self;

        state.advance(LaunchState::RunningMain);
        let main = PhaseDispatcher {
            queue: runnables,
            ctx: shared.clone(),
            failures: failures.clone(),
            backoff,
        }
        .run()
        .await;

        info!(
            completed = main.completed,
            discarded = main.discarded,
            cancelled = main.cancelled,
            finishers = finishers.outstanding,
            "main phase over"
        );

        if finishers.outstanding > 0 {
            state.advance(LaunchState::RunningFinishers);
            let cleanup = PhaseDispatcher {
                queue: finishers,
                ctx: caller,
                failures: failures.clone(),
                backoff,
            }
            .run()
            .await;
            info!(
                completed = cleanup.completed,
                skipped = cleanup.discarded,
                cancelled = cleanup.cancelled,
                "finisher phase over"
            );
        }

        state.advance(LaunchState::Draining);
        drop(failures);
        let _ = close_pipeline.send(());
        shared.cancel();
    }
}
