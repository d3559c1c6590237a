//! # Launcher configuration.
//!
//! [`LauncherConfig`] centralizes the settings of one [`Launcher`](crate::Launcher).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → default capacity (100)
//! - `grace = 0s` → default grace period (5s)

use std::time::Duration;

use crate::policies::BackoffPolicy;

const DEFAULT_QUEUE_CAPACITY: usize = 100;
const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Settings for a launcher.
///
/// ## Field semantics
/// - `queue_capacity`: pending-runner capacity of each phase queue, also used for the
///   error channel (`0` = default)
/// - `grace`: how long `launch` waits for work to drain once the shared token is
///   cancelled (`0s` = default)
/// - `repeat_backoff`: delay before a repeating runner re-enters its queue
///
/// Prefer the accessors over reading the sentinel fields directly.
#[derive(Clone, Debug)]
pub struct LauncherConfig {
    /// Maximum number of pending runners per phase.
    ///
    /// Bounds what is *waiting* in a queue, not how many runners execute at
    /// once: every dequeued runner gets its own task.
    pub queue_capacity: usize,

    /// Maximum wait for "jobs done" after cancellation.
    ///
    /// Work still running when it elapses is abandoned; `launch` returns
    /// [`Exit::GraceElapsed`](crate::Exit::GraceElapsed).
    pub grace: Duration,

    /// Delay policy between an execution and the re-submission of a repeating runner.
    pub repeat_backoff: BackoffPolicy,
}

impl LauncherConfig {
    /// Queue capacity with the `0` sentinel resolved.
    #[inline]
    pub fn queue_capacity(&self) -> usize {
        if self.queue_capacity == 0 {
            DEFAULT_QUEUE_CAPACITY
        } else {
            self.queue_capacity
        }
    }

    /// Grace period with the `0s` sentinel resolved.
    #[inline]
    pub fn grace(&self) -> Duration {
        if self.grace == Duration::ZERO {
            DEFAULT_GRACE
        } else {
            self.grace
        }
    }
}

impl Default for LauncherConfig {
    /// - `queue_capacity = 100`
    /// - `grace = 5s`
    /// - `repeat_backoff` = constant 100ms
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            grace: DEFAULT_GRACE,
            repeat_backoff: BackoffPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_resolve_to_defaults() {
        let cfg = LauncherConfig {
            queue_capacity: 0,
            grace: Duration::ZERO,
            ..LauncherConfig::default()
        };
        assert_eq!(cfg.queue_capacity(), 100);
        assert_eq!(cfg.grace(), Duration::from_secs(5));
    }

    #[test]
    fn explicit_values_are_kept() {
        let cfg = LauncherConfig {
            queue_capacity: 3,
            grace: Duration::from_millis(250),
            ..LauncherConfig::default()
        };
        assert_eq!(cfg.queue_capacity(), 3);
        assert_eq!(cfg.grace(), Duration::from_millis(250));
    }
}
