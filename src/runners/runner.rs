//! # Runner: a job plus its role and repeat policy.
//!
//! A [`Runner`] is built once at registration and never changes afterwards;
//! the launcher shares it as `Arc<Runner>` between the queue and workers.
//!
//! Registration validates the only invariant a runner has: a finisher must not
//! carry any repeat flag. [`Runner::new`] returns
//! [`ConfigError::FinisherWithRepeat`] instead of accepting such a runner.
//!
//! [`Runner::execute`] is the panic boundary: whatever the job does, it returns
//! a `Result`, and a panic comes back as [`RunnerError::Panic`].

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::{ConfigError, RunnerError};
use crate::policies::RepeatPolicy;
use crate::runners::job::JobRef;

/// Phase a runner belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// Main phase; may repeat.
    #[default]
    Runnable,
    /// Cleanup phase; runs after the main phase drains, never repeats.
    Finisher,
}

/// Registration options for a runner.
///
/// ## Example
/// ```rust
/// use launchvisor::{RepeatPolicy, Role, RunnerOpts};
///
/// let poller = RunnerOpts::new().repeat_on_finish();
/// assert_eq!(poller.role(), Role::Runnable);
/// assert_eq!(poller.repeat(), RepeatPolicy::ON_FINISH);
///
/// let cleanup = RunnerOpts::new().finisher();
/// assert_eq!(cleanup.role(), Role::Finisher);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunnerOpts {
    role: Role,
    repeat: RepeatPolicy,
}

impl RunnerOpts {
    /// A non-repeating main-phase runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the runner to the cleanup phase.
    pub fn finisher(mut self) -> Self {
        self.role = Role::Finisher;
        self
    }

    /// Re-submit after every execution (polling job).
    pub fn repeat_on_finish(mut self) -> Self {
        self.repeat.on_finish = true;
        self
    }

    /// Re-submit after a panic.
    pub fn repeat_on_panic(mut self) -> Self {
        self.repeat.on_panic = true;
        self
    }

    /// Re-submit after a returned error.
    pub fn repeat_on_error(mut self) -> Self {
        self.repeat.on_error = true;
        self
    }

    /// Replaces all repeat flags.
    pub fn with_repeat(mut self, repeat: RepeatPolicy) -> Self {
        self.repeat = repeat;
        self
    }

    /// Phase the runner will be registered in.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Repeat flags accumulated so far.
    pub fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }
}

/// Immutable descriptor of one registered unit of work.
pub struct Runner {
    job: JobRef,
    role: Role,
    repeat: RepeatPolicy,
}

impl Runner {
    /// Validates `opts` and builds the runner.
    ///
    /// ### Errors
    /// [`ConfigError::FinisherWithRepeat`] if `opts` marks a finisher with any repeat flag.
    pub fn new(job: JobRef, opts: RunnerOpts) -> Result<Self, ConfigError> {
        if opts.role == Role::Finisher && !opts.repeat.is_never() {
            return Err(ConfigError::FinisherWithRepeat {
                runner: job.name().to_string(),
                repeat: opts.repeat,
            });
        }
        Ok(Self {
            job,
            role: opts.role,
            repeat: opts.repeat,
        })
    }

    /// Name of the underlying job, as used in log fields.
    pub fn name(&self) -> &str {
        self.job.name()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Validated repeat flags; always [`RepeatPolicy::NEVER`] for finishers.
    pub fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }

    /// Runs the job once.
    ///
    /// Panics raised while building the future or while polling it are recovered
    /// and returned as [`RunnerError::Panic`] carrying the payload text.
    pub async fn execute(&self, ctx: CancellationToken) -> Result<(), RunnerError> {
        let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| self.job.run(ctx))) {
            Ok(fut) => fut,
            Err(payload) => return Err(panic_error(payload)),
        };

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(res) => res,
            Err(payload) => Err(panic_error(payload)),
        }
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("name", &self.name())
            .field("role", &self.role)
            .field("repeat", &self.repeat)
            .finish()
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> RunnerError {
    let payload = match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_string(),
            Err(_) => "non-string panic payload".to_string(),
        },
    };
    RunnerError::Panic { payload }
}
