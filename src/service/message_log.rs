use std::sync::{Arc, Mutex};

/// Append-only, ordered trail of diagnostics accumulated by a single poll
/// operation and handed back to the caller. Clones share the same buffer,
/// so concurrent workers in a mutation batch can append from wherever they
/// finish; within a batch no relative ordering is guaranteed.
///
/// Every line is mirrored to `log::debug!`, which replaces the original
/// bot's global "print messages to the console" switch.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        MessageLog::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{}", message);
        self.messages
            .lock()
            .expect("message log poisoned")
            .push(message);
    }

    pub fn extend(&self, messages: impl IntoIterator<Item = String>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().expect("message log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the accumulated lines in append order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("message log poisoned")
            .clone()
    }

    /// Consume this handle, yielding the accumulated lines. Other clones
    /// may still exist, in which case the buffer is copied out.
    pub fn into_messages(self) -> Vec<String> {
        match Arc::try_unwrap(self.messages) {
            Ok(inner) => inner.into_inner().expect("message log poisoned"),
            Err(shared) => shared.lock().expect("message log poisoned").clone(),
        }
    }
}
