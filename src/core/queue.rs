//! # Phase queue: pending runners of one phase.
//!
//! A bounded `mpsc` channel plus the phase's outstanding counter.
//!
//! ## Rules
//! - Registration happens before launch and never blocks: a full queue is a
//!   [`ConfigError::QueueFull`].
//! - `outstanding` counts registered runners that have not completed terminally.
//!   It is only touched by the owner of the queue (registration, then the phase
//!   dispatcher), so it needs no atomics.
//! - Capacity bounds what is waiting, not what is executing.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::ConfigError;
use crate::runners::{Role, Runner};

/// One queued execution of a runner.
pub(crate) struct Dispatch {
    pub runner: Arc<Runner>,
    /// 1-based execution number of this runner.
    pub attempt: u32,
}

pub(crate) struct PhaseQueue {
    pub role: Role,
    pub capacity: usize,
    pub tx: mpsc::Sender<Dispatch>,
    pub rx: mpsc::Receiver<Dispatch>,
    pub outstanding: usize,
}

impl PhaseQueue {
    pub fn new(role: Role, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            role,
            capacity,
            tx,
            rx,
            outstanding: 0,
        }
    }

    /// Enqueues a freshly registered runner.
    pub fn push(&mut self, runner: Runner) -> Result<(), ConfigError> {
        let dispatch = Dispatch {
            runner: Arc::new(runner),
            attempt: 1,
        };
        match self.tx.try_send(dispatch) {
            Ok(()) => {
                self.outstanding += 1;
                Ok(())
            }
            Err(
                mpsc::error::TrySendError::Full(d) | mpsc::error::TrySendError::Closed(d),
            ) => Err(ConfigError::QueueFull {
                runner: d.runner.name().to_string(),
                role: self.role,
                capacity: self.capacity,
            }),
        }
    }
}
