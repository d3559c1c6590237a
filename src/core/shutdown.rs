//! # Shutdown triggers.
//!
//! Two independent things end a launch:
//! - a [`ShutdownSignal`] firing, which cancels the shared token;
//! - the grace timer, started once the shared token is cancelled.
//!
//! ## Signal sources
//! - [`OsSignals`] - **unix:** `SIGINT` (Ctrl-C), `SIGTERM`, `SIGQUIT`;
//!   **other platforms:** Ctrl-C via [`tokio::signal::ctrl_c`].
//! - [`NoSignal`] - never fires.
//! - [`CancellationToken`] - fires when the token is cancelled.

use std::{io, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{select, sync::oneshot, time};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::state::Exit;

/// Source of interruption requests.
///
/// The launcher awaits [`recv`](Self::recv) once per launch, concurrently with
/// the work; the listener task is aborted when `launch` returns.
#[async_trait]
pub trait ShutdownSignal: Send + Sync + 'static {
    /// Completes when shutdown is requested.
    ///
    /// An `Err` means the source could not be set up; it is logged and the
    /// launch continues without a signal trigger.
    async fn recv(&self) -> io::Result<()>;
}

/// Process termination signals.
///
/// Handlers are installed on the first call to [`recv`](ShutdownSignal::recv),
/// so a signal delivered before `launch` keeps its default action.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsSignals;

#[async_trait]
impl ShutdownSignal for OsSignals {
    async fn recv(&self) -> io::Result<()> {
        let name = SignalSet::install()?.recv().await?;
        info!(signal = name, "os signal received");
        Ok(())
    }
}

/// Listeners for every termination signal of the platform.
#[cfg(unix)]
struct SignalSet {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalSet {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Name of the first signal delivered after `install`.
    async fn recv(&mut self) -> io::Result<&'static str> {
        let name = select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.quit.recv() => "SIGQUIT",
        };
        Ok(name)
    }
}

/// Ctrl-C is the only termination signal tokio exposes off unix.
#[cfg(not(unix))]
struct SignalSet;

#[cfg(not(unix))]
impl SignalSet {
    fn install() -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> io::Result<&'static str> {
        tokio::signal::ctrl_c().await?;
        Ok("ctrl-c")
    }
}

/// A signal source that never fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSignal;

#[async_trait]
impl ShutdownSignal for NoSignal {
    async fn recv(&self) -> io::Result<()> {
        std::future::pending().await
    }
}

#[async_trait]
impl ShutdownSignal for CancellationToken {
    async fn recv(&self) -> io::Result<()> {
        self.cancelled().await;
        Ok(())
    }
}

/// Cancels `shared` when `signal` fires. Cancelling is idempotent, so a signal
/// arriving after the launch already wound down is harmless.
pub(crate) async fn signal_trigger(signal: Arc<dyn ShutdownSignal>, shared: CancellationToken) {
    select! {
        biased;
        _ = shared.cancelled() => {}
        res = signal.recv() => match res {
            Ok(()) => {
                info!("shutdown requested");
                shared.cancel();
            }
            Err(e) => warn!(error = %e, "shutdown signal unavailable"),
        }
    }
}

/// Waits for "jobs done" for at most `grace`.
pub(crate) async fn wait_graceful(jobs_done: oneshot::Receiver<()>, grace: Duration) -> Exit {
    match time::timeout(grace, jobs_done).await {
        Ok(Ok(())) => {
            info!("jobs done");
            Exit::JobsDone
        }
        Ok(Err(_)) => {
            warn!("error pipeline stopped without flushing");
            Exit::JobsDone
        }
        Err(_elapsed) => {
            warn!(?grace, "graceful timeout elapsed; abandoning running jobs");
            Exit::GraceElapsed { grace }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_signal_cancels_shared() {
        let signal = CancellationToken::new();
        let shared = CancellationToken::new();
        let trigger = tokio::spawn(signal_trigger(Arc::new(signal.clone()), shared.clone()));

        signal.cancel();
        trigger.await.unwrap();
        assert!(shared.is_cancelled());
    }

    #[tokio::test]
    async fn trigger_ends_when_shared_is_cancelled_first() {
        let shared = CancellationToken::new();
        shared.cancel();

        time::timeout(
            Duration::from_secs(1),
            signal_trigger(Arc::new(NoSignal), shared),
        )
        .await
        .unwrap();
    }

    #[cfg(unix)]
    fn raise(sig: &str) {
        let status = std::process::Command::new("kill")
            .args([sig, &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signal_set_names_the_delivered_signal() {
        let mut set = SignalSet::install().unwrap();
        raise("-TERM");

        let name = time::timeout(Duration::from_secs(2), set.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(name, "SIGTERM");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn os_signals_fire_on_sigterm() {
        // keeps SIGTERM handled while the listener below installs its own set
        let _guard = SignalSet::install().unwrap();
        let mut listener = tokio::spawn(async { OsSignals.recv().await });

        for _ in 0..40 {
            raise("-TERM");
            if let Ok(res) = time::timeout(Duration::from_millis(50), &mut listener).await {
                res.unwrap().unwrap();
                return;
            }
        }
        panic!("OsSignals never observed SIGTERM");
    }

    #[tokio::test]
    async fn grace_timer_wins_without_done() {
        let (_done_tx, done_rx) = oneshot::channel::<()>();
        let grace = Duration::from_millis(30);

        assert_eq!(wait_graceful(done_rx, grace).await, Exit::GraceElapsed { grace });
    }

    #[tokio::test]
    async fn done_wins_before_grace() {
        let (done_tx, done_rx) = oneshot::channel();
        done_tx.send(()).unwrap();

        let exit = wait_graceful(done_rx, Duration::from_secs(5)).await;
        assert_eq!(exit, Exit::JobsDone);
    }
}
