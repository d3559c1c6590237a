//! # Repeat policy for runners.
//!
//! [`RepeatPolicy`] decides whether a runner goes back to its queue after an
//! execution. Three independent flags are checked in a fixed priority:
//!
//! ```text
//! panicked         && on_panic  → repeat (Panic)
//! failed/cancelled && on_error  → repeat (Error)
//! on_finish (any result)        → repeat (Finish)
//! otherwise                     → terminal completion
//! ```
//!
//! `on_finish` alone turns a runner into a polling job: it runs, sleeps the
//! backoff, runs again, and only stops when the shared token is cancelled.
//!
//! Finishers never repeat; registration rejects any flag on them.

use crate::error::RunnerError;

/// Which flag caused a re-submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatReason {
    /// The job panicked and `on_panic` is set.
    Panic,
    /// The job returned an error and `on_error` is set.
    Error,
    /// `on_finish` is set.
    Finish,
}

/// Flags controlling re-submission of a runner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RepeatPolicy {
    /// Repeat after every execution, whatever the result.
    pub on_finish: bool,
    /// Repeat after a recovered panic.
    pub on_panic: bool,
    /// Repeat after a returned error (including cancellation).
    pub on_error: bool,
}

impl RepeatPolicy {
    /// Run once.
    pub const NEVER: Self = Self {
        on_finish: false,
        on_panic: false,
        on_error: false,
    };
    /// Repeat after every execution.
    pub const ON_FINISH: Self = Self {
        on_finish: true,
        ..Self::NEVER
    };
    /// Repeat after panics.
    pub const ON_PANIC: Self = Self {
        on_panic: true,
        ..Self::NEVER
    };
    /// Repeat after returned errors.
    pub const ON_ERROR: Self = Self {
        on_error: true,
        ..Self::NEVER
    };

    /// True when no flag is set.
    pub fn is_never(&self) -> bool {
        *self == Self::NEVER
    }

    /// Flags of both policies combined.
    pub fn union(self, other: Self) -> Self {
        Self {
            on_finish: self.on_finish || other.on_finish,
            on_panic: self.on_panic || other.on_panic,
            on_error: self.on_error || other.on_error,
        }
    }

    /// Resolves the outcome of one execution into a repeat decision.
    ///
    /// Returns `None` for a terminal completion.
    pub fn decide(&self, result: &Result<(), RunnerError>) -> Option<RepeatReason> {
        match result {
            Err(e) if e.is_panic() && self.on_panic => Some(RepeatReason::Panic),
            Err(e) if !e.is_panic() && self.on_error => Some(RepeatReason::Error),
            _ if self.on_finish => Some(RepeatReason::Finish),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panicked() -> Result<(), RunnerError> {
        Err(RunnerError::Panic {
            payload: "boom".into(),
        })
    }

    fn failed() -> Result<(), RunnerError> {
        Err(RunnerError::fail("nope"))
    }

    #[test]
    fn never_is_always_terminal() {
        let p = RepeatPolicy::NEVER;
        assert!(p.is_never());
        assert_eq!(p.decide(&Ok(())), None);
        assert_eq!(p.decide(&failed()), None);
        assert_eq!(p.decide(&panicked()), None);
    }

    #[test]
    fn on_panic_ignores_plain_errors() {
        let p = RepeatPolicy::ON_PANIC;
        assert_eq!(p.decide(&panicked()), Some(RepeatReason::Panic));
        assert_eq!(p.decide(&failed()), None);
        assert_eq!(p.decide(&Ok(())), None);
    }

    #[test]
    fn on_error_ignores_panics_and_covers_cancellation() {
        let p = RepeatPolicy::ON_ERROR;
        assert_eq!(p.decide(&failed()), Some(RepeatReason::Error));
        assert_eq!(
            p.decide(&Err(RunnerError::Canceled)),
            Some(RepeatReason::Error)
        );
        assert_eq!(p.decide(&panicked()), None);
    }

    #[test]
    fn on_finish_repeats_any_result() {
        let p = RepeatPolicy::ON_FINISH;
        assert_eq!(p.decide(&Ok(())), Some(RepeatReason::Finish));
        assert_eq!(p.decide(&failed()), Some(RepeatReason::Finish));
        assert_eq!(p.decide(&panicked()), Some(RepeatReason::Finish));
    }

    #[test]
    fn panic_and_error_flags_take_priority_over_finish() {
        let p = RepeatPolicy::ON_FINISH
            .union(RepeatPolicy::ON_PANIC)
            .union(RepeatPolicy::ON_ERROR);
        assert_eq!(p.decide(&panicked()), Some(RepeatReason::Panic));
        assert_eq!(p.decide(&failed()), Some(RepeatReason::Error));
        assert_eq!(p.decide(&Ok(())), Some(RepeatReason::Finish));
    }
}
