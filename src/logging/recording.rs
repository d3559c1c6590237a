use std::sync::{Arc, Mutex};

use super::{Field, Logger};

/// One captured log entry.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub msg: String,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Test logger that keeps every entry.
#[derive(Clone, Default)]
pub(crate) struct RecordingLogger {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, msg: &str, fields: &[Field]) {
        self.entries.lock().unwrap().push(Entry {
            msg: msg.to_string(),
            fields: fields.to_vec(),
        });
    }
}
