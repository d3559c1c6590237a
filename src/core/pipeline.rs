//! # Error pipeline: from workers to the logger.
//!
//! Drains the error channel until the coordinator closes it, then flushes what
//! is still buffered and signals "jobs done" exactly once.
//!
//! ## Classification
//! ```text
//! Canceled && shared token cancelled  → dropped (expected shutdown noise)
//! Canceled before cancellation        → "error happened: ..."  (unexpected early cancel)
//! Panic                               → "panic happened: ..."  kind=runner_panic
//! Fail                                → "error happened: ..."  kind=runner_failed
//! ```
//!
//! A panicking logger is contained: the entry is lost, the pipeline keeps going.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::{
    select,
    sync::{mpsc, oneshot},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    core::worker::Failure,
    logging::{Field, Logger},
};

pub(crate) struct ErrorPipeline {
    pub failures: mpsc::Receiver<Failure>,
    /// Fired once by the coordinator when both phases are over.
    pub close: oneshot::Receiver<()>,
    pub shared: CancellationToken,
    pub logger: Arc<dyn Logger>,
}

impl ErrorPipeline {
    pub async fn run(self, jobs_done: oneshot::Sender<()>) {
        let Self {
            mut failures,
            mut close,
            shared,
            logger,
        } = self;
        let mut logged = 0usize;

        loop {
            select! {
                biased;
                Some(failure) = failures.recv() => {
                    logged += usize::from(report(logger.as_ref(), &shared, failure));
                }
                _ = &mut close => break,
            }
        }

        failures.close();
        while let Some(failure) = failures.recv().await {
            logged += usize::from(report(logger.as_ref(), &shared, failure));
        }

        debug!(logged, "error pipeline flushed");
        let _ = jobs_done.send(());
    }
}

/// Classifies one failure and forwards it; returns whether it was logged.
fn report(logger: &dyn Logger, shared: &CancellationToken, failure: Failure) -> bool {
    if failure.error.is_canceled() && shared.is_cancelled() {
        return false;
    }

    let prefix = if failure.error.is_panic() {
        "panic happened"
    } else {
        "error happened"
    };
    let msg = format!("{prefix}: {}", failure.error);
    let fields = [
        Field::new("runner", &failure.runner),
        Field::new("phase", format!("{:?}", failure.role)),
        Field::new("attempt", failure.attempt),
        Field::new("kind", failure.error.as_label()),
    ];

    if std::panic::catch_unwind(AssertUnwindSafe(|| logger.error(&msg, &fields))).is_err() {
        warn!(runner = %failure.runner, "logger panicked; entry dropped");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunnerError;
    use crate::logging::recording::RecordingLogger;
    use crate::runners::Role;

    fn failure(error: RunnerError) -> Failure {
        Failure {
            runner: Arc::from("sync"),
            role: Role::Runnable,
            attempt: 2,
            error,
        }
    }

    #[test]
    fn panic_and_failure_get_distinct_prefixes() {
        let log = RecordingLogger::default();
        let shared = CancellationToken::new();

        assert!(report(&log, &shared, failure(RunnerError::Panic { payload: "oops".into() })));
        assert!(report(&log, &shared, failure(RunnerError::fail("timeout"))));

        let entries = log.entries();
        assert_eq!(entries[0].msg, "panic happened: panic: oops");
        assert_eq!(entries[0].field("kind"), Some("runner_panic"));
        assert_eq!(entries[1].msg, "error happened: execution failed: timeout");
        assert_eq!(entries[1].field("kind"), Some("runner_failed"));
        assert_eq!(entries[1].field("runner"), Some("sync"));
        assert_eq!(entries[1].field("attempt"), Some("2"));
        assert_eq!(entries[1].field("phase"), Some("Runnable"));
    }

    #[test]
    fn cancellation_is_logged_only_before_shutdown() {
        let log = RecordingLogger::default();
        let shared = CancellationToken::new();

        assert!(report(&log, &shared, failure(RunnerError::Canceled)));
        shared.cancel();
        assert!(!report(&log, &shared, failure(RunnerError::Canceled)));
        assert!(report(&log, &shared, failure(RunnerError::fail("late"))));

        assert_eq!(log.entries().len(), 2);
    }

    #[test]
    fn panicking_logger_is_contained() {
        struct Broken;
        impl Logger for Broken {
            fn error(&self, _msg: &str, _fields: &[Field]) {
                panic!("logger down");
            }
        }

        let shared = CancellationToken::new();
        assert!(!report(&Broken, &shared, failure(RunnerError::fail("x"))));
    }

    #[tokio::test]
    async fn close_flushes_buffer_then_signals_done() {
        let log = RecordingLogger::default();
        let (tx, rx) = mpsc::channel(8);
        let (close_tx, close_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let pipeline = ErrorPipeline {
            failures: rx,
            close: close_rx,
            shared: CancellationToken::new(),
            logger: Arc::new(log.clone()),
        };

        for _ in 0..3 {
            tx.send(failure(RunnerError::fail("boom"))).await.unwrap();
        }
        close_tx.send(()).unwrap();
        pipeline.run(done_tx).await;

        done_rx.await.unwrap();
        assert_eq!(log.entries().len(), 3);
        assert!(tx.send(failure(RunnerError::fail("late"))).await.is_err());
    }
}
