//! # Jitter for repeat delays.
//!
//! Many polling runners registered at the same time tend to wake up together.
//! [`JitterPolicy`] spreads their re-submissions apart.

use rand::Rng;
use std::time::Duration;

/// Randomization strategy applied by [`BackoffPolicy`](crate::BackoffPolicy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Exact delay.
    #[default]
    None,

    /// Uniform in `[0, delay]`.
    Full,

    /// `delay/2 + uniform[0, delay/2]`.
    Equal,

    /// Uniform in `[base, prev × 3]`, capped at `max`.
    ///
    /// Needs the extra context passed to [`apply_decorrelated`](Self::apply_decorrelated).
    Decorrelated,
}

impl JitterPolicy {
    /// Applies jitter to `delay`.
    ///
    /// `Decorrelated` returns `delay` unchanged here.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None | JitterPolicy::Decorrelated => delay,
            JitterPolicy::Full => uniform_ms(0, millis(delay)),
            JitterPolicy::Equal => {
                let half = millis(delay) / 2;
                uniform_ms(half, half * 2)
            }
        }
    }

    /// Decorrelated jitter; other policies fall back to [`apply`](Self::apply) on `prev`.
    pub fn apply_decorrelated(&self, base: Duration, prev: Duration, max: Duration) -> Duration {
        if !matches!(self, JitterPolicy::Decorrelated) {
            return self.apply(prev);
        }

        let floor = millis(base);
        let ceil = millis(prev).saturating_mul(3).min(millis(max)).max(floor);
        if floor >= ceil {
            return base;
        }
        uniform_ms(floor, ceil)
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

fn uniform_ms(lo: u64, hi: u64) -> Duration {
    if hi <= lo {
        return Duration::from_millis(lo);
    }
    Duration::from_millis(rand::rng().random_range(lo..=hi))
}
