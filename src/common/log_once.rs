use std::collections::HashSet;
use tracing::{debug, error};

/// Suppresses repeats of recurring conditions (a missing window, an empty
/// timestamp queue) until the condition is cleared.
#[derive(Debug, Default)]
pub struct LogOnce {
    errors: HashSet<String>,
    debugs: HashSet<String>,
}

impl LogOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the message was actually emitted.
    pub fn error_once(&mut self, message: &str) -> bool {
        if self.errors.contains(message) {
            return false;
        }
        error!("{}", message);
        self.errors.insert(message.to_owned());
        true
    }

    pub fn clear_error(&mut self, message: &str) {
        self.errors.remove(message);
    }

    pub fn debug_once(&mut self, message: &str) -> bool {
        if self.debugs.contains(message) {
            return false;
        }
        debug!("{}", message);
        self.debugs.insert(message.to_owned());
        true
    }

    pub fn clear_debug(&mut self, message: &str) {
        self.debugs.remove(message);
    }
}
