//! Emotion Log Port - Append-only record of detected emotions.
//!
//! Every successful classification is recorded exactly once with the time it
//! was detected. Failed classifications are never recorded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Errors that can occur while recording an emotion.
#[derive(Debug, thiserror::Error)]
pub enum EmotionLogError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// A timestamped emotion label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionLogEntry {
    pub timestamp: Timestamp,
    pub label: String,
}

impl EmotionLogEntry {
    pub fn new(timestamp: Timestamp, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            label: label.into(),
        }
    }

    /// Renders the entry as a log line: `YYYY-MM-DD HH:MM:SS - Emotion: <label>`.
    pub fn to_line(&self) -> String {
        format!("{} - Emotion: {}", self.timestamp.to_log_string(), self.label)
    }
}

/// Port for persisting detected emotions.
#[async_trait]
pub trait EmotionLog: Send + Sync {
    /// Appends an entry. Callers treat this as fire-and-forget.
    async fn record(&self, entry: EmotionLogEntry) -> Result<(), EmotionLogError>;
}
