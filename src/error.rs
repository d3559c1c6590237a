//! Error types used by the launcher and by runners.
//!
//! This module defines two enums:
//!
//! - [`RunnerError`] - errors produced while executing a runner's job.
//! - [`ConfigError`] - errors produced at registration time.
//!
//! Runtime errors ([`RunnerError`]) never leave the launcher: they flow through the
//! error pipeline into the [`Logger`](crate::Logger). Only [`ConfigError`] is returned
//! to the caller, synchronously, from [`Launcher::add_runner`](crate::Launcher::add_runner).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use std::fmt::Display;

use thiserror::Error;

use crate::policies::RepeatPolicy;
use crate::runners::Role;

/// # Errors produced by runner execution.
///
/// A job returns [`RunnerError::Fail`] or [`RunnerError::Canceled`];
/// [`RunnerError::Panic`] is produced by the launcher when a job panics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// Business failure returned by the job.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The job panicked; the panic was recovered at the execution boundary.
    #[error("panic: {payload}")]
    Panic {
        /// Text of the panic payload.
        payload: String,
    },

    /// The job observed cancellation of its token and stopped.
    #[error("context cancelled")]
    Canceled,
}

impl RunnerError {
    /// Builds a [`RunnerError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use launchvisor::RunnerError;
    ///
    /// let err = RunnerError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        RunnerError::Fail {
            error: error.to_string(),
        }
    }

    /// True for errors recovered from a panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, RunnerError::Panic { .. })
    }

    /// True for cancellation errors.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RunnerError::Canceled)
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use launchvisor::RunnerError;
    ///
    /// let err = RunnerError::Panic { payload: "boom".into() };
    /// assert_eq!(err.as_label(), "runner_panic");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::Fail { .. } => "runner_failed",
            RunnerError::Panic { .. } => "runner_panic",
            RunnerError::Canceled => "runner_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RunnerError::Fail { error } => format!("error: {error}"),
            RunnerError::Panic { payload } => format!("panic: {payload}"),
            RunnerError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// # Errors produced while registering runners.
///
/// Returned from [`Launcher::add_runner`](crate::Launcher::add_runner) and
/// [`Runner::new`](crate::Runner::new); never deferred to a runtime panic.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A finisher was configured with a repeat option.
    #[error("finisher {runner:?} must not repeat (requested {repeat:?})")]
    FinisherWithRepeat {
        /// Name of the rejected runner.
        runner: String,
        /// The repeat flags that were requested.
        repeat: RepeatPolicy,
    },

    /// More runners were registered for a phase than its queue can hold.
    #[error("{role:?} queue is full (capacity {capacity}); cannot register {runner:?}")]
    QueueFull {
        /// Name of the rejected runner.
        runner: String,
        /// Phase the runner was registered for.
        role: Role,
        /// Configured queue capacity.
        capacity: usize,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use launchvisor::{ConfigError, RepeatPolicy};
    ///
    /// let err = ConfigError::FinisherWithRepeat {
    ///     runner: "cleanup".into(),
    ///     repeat: RepeatPolicy::ON_ERROR,
    /// };
    /// assert_eq!(err.as_label(), "config_finisher_with_repeat");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::FinisherWithRepeat { .. } => "config_finisher_with_repeat",
            ConfigError::QueueFull { .. } => "config_queue_full",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::FinisherWithRepeat { runner, repeat } => {
                format!("finisher {runner} has repeat flags {repeat:?}")
            }
            ConfigError::QueueFull {
                runner,
                role,
                capacity,
            } => format!("{role:?} queue full at {capacity}; rejected {runner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_is_distinguished_from_failure() {
        let panic = RunnerError::Panic {
            payload: "index out of bounds".into(),
        };
        let fail = RunnerError::fail("index out of bounds");

        assert!(panic.is_panic());
        assert!(!fail.is_panic());
        assert_ne!(panic.as_label(), fail.as_label());
    }

    #[test]
    fn canceled_has_stable_label() {
        let err = RunnerError::Canceled;
        assert!(err.is_canceled());
        assert_eq!(err.as_label(), "runner_canceled");
        assert_eq!(err.as_message(), "context cancelled");
    }

    #[test]
    fn queue_full_message_names_runner() {
        let err = ConfigError::QueueFull {
            runner: "poller".into(),
            role: Role::Runnable,
            capacity: 2,
        };
        assert_eq!(err.as_label(), "config_queue_full");
        assert!(err.as_message().contains("poller"));
        assert!(err.to_string().contains("capacity 2"));
    }
}
