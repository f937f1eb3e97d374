//! In-Memory Emotion Log Adapter
//!
//! Keeps recorded emotions in memory. Useful for testing and development.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::{EmotionLog, EmotionLogEntry, EmotionLogError};

/// In-memory emotion log. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmotionLog {
    entries: Arc<Mutex<Vec<EmotionLogEntry>>>,
}

impl InMemoryEmotionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded entries, oldest first.
    pub fn entries(&self) -> Vec<EmotionLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded labels, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.label).collect()
    }
}

#[async_trait]
impl EmotionLog for InMemoryEmotionLog {
    async fn record(&self, entry: EmotionLogEntry) -> Result<(), EmotionLogError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        Ok(())
    }
}
