use std::sync::Arc;

use crate::{
    core::{
        config::LauncherConfig,
        launcher::Launcher,
        shutdown::{OsSignals, ShutdownSignal},
    },
    logging::{Logger, TracingLogger},
};

/// Builder for constructing a [`Launcher`] with custom collaborators.
pub struct LauncherBuilder {
    cfg: LauncherConfig,
    logger: Arc<dyn Logger>,
    signal: Arc<dyn ShutdownSignal>,
}

impl LauncherBuilder {
    /// Creates a builder with [`TracingLogger`] and [`OsSignals`].
    pub fn new(cfg: LauncherConfig) -> Self {
        Self {
            cfg,
            logger: Arc::new(TracingLogger),
            signal: Arc::new(OsSignals),
        }
    }

    /// Sets the sink for runner errors and panics.
    pub fn with_logger<L: Logger>(mut self, logger: L) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Sets the source of shutdown requests.
    ///
    /// Pass [`NoSignal`](crate::NoSignal) to ignore process signals, or a
    /// [`CancellationToken`](tokio_util::sync::CancellationToken) to trigger
    /// shutdown programmatically.
    pub fn with_signal<S: ShutdownSignal>(mut self, signal: S) -> Self {
        self.signal = Arc::new(signal);
        self
    }

    /// Builds the launcher. Nothing runs until [`Launcher::launch`].
    pub fn build(self) -> Launcher {
        Launcher::from_parts(self.cfg, self.logger, self.signal)
    }
}
