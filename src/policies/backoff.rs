//! # Delay before a repeated runner re-enters its queue.
//!
//! [`BackoffPolicy`] computes the pause a worker takes between a finished
//! execution and the re-submission of the same runner. The default is a flat
//! 100ms, which is what the launcher has always slept between repeats.
//!
//! The delay for the `n`-th repeat (0-based) is `first × factor^n`, capped at `max`,
//! then jittered. The base is derived from `n` alone, so jitter never compounds.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use launchvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(1),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay_for(0), Duration::from_millis(100));
//! assert_eq!(backoff.delay_for(2), Duration::from_millis(400));
//! assert_eq!(backoff.delay_for(9), Duration::from_secs(1));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Repeat backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first repeat.
    pub first: Duration,
    /// Upper bound for any delay.
    pub max: Duration,
    /// Multiplicative growth per repeat (`1.0` = constant).
    pub factor: f64,
    /// Randomization applied to the capped base delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 100ms, no jitter.
    fn default() -> Self {
        Self::constant(Duration::from_millis(100))
    }
}

impl BackoffPolicy {
    /// Same delay before every repeat.
    pub fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Exponential growth from `first`, capped at `max`.
    pub fn exponential(first: Duration, factor: f64, max: Duration) -> Self {
        Self {
            first,
            max,
            factor,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a copy with the given jitter.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before the `repeat`-th re-submission (0-based).
    pub fn delay_for(&self, repeat: u32) -> Duration {
        let base = self.base(repeat);
        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }

    fn base(&self, repeat: u32) -> Duration {
        let exp = repeat.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_flat_hundred_millis() {
        let policy = BackoffPolicy::default();
        for repeat in [0, 1, 5, 1000] {
            assert_eq!(policy.delay_for(repeat), Duration::from_millis(100));
        }
    }

    #[test]
    fn exponential_doubles_until_cap() {
        let policy = BackoffPolicy::exponential(
            Duration::from_millis(50),
            2.0,
            Duration::from_millis(300),
        );

        assert_eq!(policy.delay_for(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(300));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(300));
    }

    #[test]
    fn first_above_max_is_capped() {
        let policy =
            BackoffPolicy::exponential(Duration::from_secs(10), 2.0, Duration::from_secs(5));
        assert_eq!(policy.delay_for(0), Duration::from_secs(5));
    }

    #[test]
    fn full_jitter_stays_under_base() {
        let policy = BackoffPolicy::exponential(
            Duration::from_millis(100),
            2.0,
            Duration::from_secs(30),
        )
        .with_jitter(JitterPolicy::Full);

        for repeat in 0..12 {
            let base = (100.0 * 2.0f64.powi(repeat as i32)).min(30_000.0) as u64;
            assert!(policy.delay_for(repeat) <= Duration::from_millis(base));
        }
    }

    #[test]
    fn equal_jitter_keeps_half_of_base() {
        let policy =
            BackoffPolicy::constant(Duration::from_millis(1000)).with_jitter(JitterPolicy::Equal);

        for repeat in 0..50 {
            let delay = policy.delay_for(repeat);
            assert!(delay >= Duration::from_millis(500), "repeat {repeat}: {delay:?}");
            assert!(delay <= Duration::from_millis(1000), "repeat {repeat}: {delay:?}");
        }
    }

    #[test]
    fn decorrelated_jitter_respects_floor_and_cap() {
        let policy = BackoffPolicy::exponential(
            Duration::from_millis(100),
            2.0,
            Duration::from_secs(2),
        )
        .with_jitter(JitterPolicy::Decorrelated);

        for _ in 0..100 {
            let delay = policy.delay_for(6);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_secs(2));
        }
    }
}
