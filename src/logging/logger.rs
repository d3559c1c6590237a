//! # Logging collaborator.
//!
//! The launcher never returns runtime errors to its caller; it reports them
//! through a [`Logger`]. Anything that can record an error message with a list
//! of structured fields can be plugged in.
//!
//! ## Example
//! ```rust
//! use std::sync::Mutex;
//! use launchvisor::{Field, Logger};
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<String>>);
//!
//! impl Logger for Collect {
//!     fn error(&self, msg: &str, fields: &[Field]) {
//!         let mut line = msg.to_string();
//!         for f in fields {
//!             line.push_str(&format!(" {f}"));
//!         }
//!         self.0.lock().unwrap().push(line);
//!     }
//! }
//!
//! let log = Collect::default();
//! log.error("error happened", &[Field::new("runner", "sync")]);
//! assert_eq!(log.0.lock().unwrap()[0], "error happened runner=sync");
//! ```

use std::fmt;

/// One structured key/value pair attached to a log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Field name, e.g. `runner` or `attempt`.
    pub key: &'static str,
    /// Rendered value.
    pub value: String,
}

impl Field {
    /// Renders `value` with its `Display` impl.
    ///
    /// ```rust
    /// use launchvisor::Field;
    ///
    /// let f = Field::new("attempt", 3);
    /// assert_eq!(f.value, "3");
    /// assert_eq!(f.to_string(), "attempt=3");
    /// ```
    pub fn new(key: &'static str, value: impl fmt::Display) -> Self {
        Self {
            key,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Error sink used by the launcher's error pipeline.
///
/// Called from a single pipeline task, one entry at a time. Implementations
/// should not block for long: the error channel fills up behind a slow logger
/// and workers wait for room.
pub trait Logger: Send + Sync + 'static {
    /// Records one error with its structured fields.
    fn error(&self, msg: &str, fields: &[Field]);
}

/// Space-separated `key=value` rendering of a field list.
pub(crate) struct FieldList<'a>(pub &'a [Field]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
