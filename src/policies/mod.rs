//! Repeat and backoff policies.
//!
//! This module groups the knobs that control **whether** a runner is re-submitted
//! after an execution and **how long** its worker waits before re-submitting it.
//!
//! ## Contents
//! - [`RepeatPolicy`] which outcomes send a runner back to its queue
//! - [`BackoffPolicy`] the delay before re-submission (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization of that delay
//!
//! ## Quick wiring
//! ```text
//! Runner { role, repeat: RepeatPolicy }
//!      └─► core::worker uses:
//!           - repeat.decide(&result) to requeue or complete
//!           - cfg.repeat_backoff.delay_for(attempt - 1) before requeueing
//! ```
//!
//! ## Defaults
//! - `RepeatPolicy::NEVER`.
//! - `BackoffPolicy::default()` → constant 100ms, no jitter.

mod backoff;
mod jitter;
mod repeat;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use repeat::{RepeatPolicy, RepeatReason};
