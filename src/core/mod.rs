//! Runtime core: registration, phases and shutdown.
//!
//! The only public entry point is [`Launcher`]; everything else here is wiring.
//!
//! Internal modules:
//! - [`queue`]: bounded per-phase queue of pending runners;
//! - [`worker`]: runs one execution and decides between requeue and completion;
//! - [`dispatcher`]: owns a phase queue, spawns workers, closes the phase once;
//! - [`coordinator`]: runs the main phase, then the finishers;
//! - [`pipeline`]: forwards runner failures to the [`Logger`](crate::Logger);
//! - [`shutdown`]: signal sources and the grace timer;
//! - [`state`]: lifecycle published to watchers.

mod builder;
mod config;
mod coordinator;
mod dispatcher;
mod launcher;
mod pipeline;
mod queue;
mod shutdown;
mod state;
mod worker;

pub use builder::LauncherBuilder;
pub use config::LauncherConfig;
pub use launcher::Launcher;
pub use shutdown::{NoSignal, OsSignals, ShutdownSignal};
pub use state::{Exit, LaunchState};
