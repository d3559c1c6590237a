//! # Launch lifecycle.
//!
//! ```text
//! Idle ──► RunningMain ──► RunningFinishers ──► Draining ──► Terminated
//!                │                                 ▲
//!                └──────── (no finishers) ─────────┘
//! ```
//!
//! The coordinator drives `RunningMain` through `Draining`; `launch` itself marks
//! `Terminated` once the error pipeline reports every error flushed. When the
//! grace timer wins, `Terminated` is never reached.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Position of a launcher in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchState {
    /// Registered, not launched.
    Idle,
    /// Dispatching runnables.
    RunningMain,
    /// Dispatching finishers against the caller's token.
    RunningFinishers,
    /// Error pipeline closed, flushing what is buffered.
    Draining,
    /// All errors flushed; `launch` returned [`Exit::JobsDone`].
    Terminated,
}

impl LaunchState {
    /// True if `next` directly follows `self`.
    pub fn can_advance_to(self, next: LaunchState) -> bool {
        use LaunchState::*;
        matches!(
            (self, next),
            (Idle, RunningMain)
                | (RunningMain, RunningFinishers)
                | (RunningMain, Draining)
                | (RunningFinishers, Draining)
                | (Draining, Terminated)
        )
    }
}

/// How [`Launcher::launch`](crate::Launcher::launch) ended.
///
/// Informational only: runtime failures are reported through the logger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Both phases drained and all errors were flushed.
    JobsDone,
    /// The grace period elapsed after cancellation; in-flight work was abandoned.
    GraceElapsed {
        /// The configured grace period.
        grace: Duration,
    },
}

/// Publishes lifecycle transitions to watchers.
pub(crate) struct StateCell {
    tx: watch::Sender<LaunchState>,
}

impl StateCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LaunchState::Idle);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<LaunchState> {
        self.tx.subscribe()
    }

    /// Moves to `next`; out-of-order transitions are ignored.
    pub fn advance(&self, next: LaunchState) {
        let prev = *self.tx.borrow();
        if !prev.can_advance_to(next) {
            debug!(from = ?prev, to = ?next, "ignored out-of-order launch transition");
            return;
        }
        self.tx.send_replace(next);
        debug!(from = ?prev, to = ?next, "launch state changed");
    }
}
