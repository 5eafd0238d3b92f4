use std::sync::{Arc, RwLock};

/// Append-only status feed for the current run, shared with the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    messages: Arc<RwLock<Vec<String>>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        // A poisoned lock only means a reader panicked mid-clone; the data is intact.
        let mut messages = self.messages.write().unwrap_or_else(|e| e.into_inner());
        messages.push(message);
    }

    pub fn reset(&self, first: impl Into<String>) {
        let first = first.into();
        tracing::info!("{}", first);
        let mut messages = self.messages.write().unwrap_or_else(|e| e.into_inner());
        messages.clear();
        messages.push(first);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.messages
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_feed() {
        let log = ProgressLog::new();
        let writer = log.clone();
        writer.push("Analyzing PUPS...");
        assert_eq!(log.snapshot(), vec!["Analyzing PUPS...".to_string()]);
    }

    #[test]
    fn reset_starts_a_fresh_feed() {
        let log = ProgressLog::new();
        log.push("old");
        log.push("older");
        log.reset("Starting data fetch...");
        assert_eq!(log.snapshot().len(), 1);
        assert_eq!(log.snapshot()[0], "Starting data fetch...");
    }
}
