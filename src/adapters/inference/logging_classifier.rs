//! Logging Classifier - Wrapper that records every successful classification.
//!
//! Decorates any `EmotionClassifier` so that each successful result is
//! written to the emotion log exactly once. Failures pass through untouched
//! and are never logged.
//!
//! The write runs on a detached task once the inner call has resolved, so
//! dropping the `classify` future (for example on timeout) either happens
//! before any write starts or after the result is already returned. Log
//! write failures are traced and swallowed. Must be called from within a
//! Tokio runtime.
//!
//! # Example
//!
//! ```ignore
//! let classifier = LoggingClassifier::new(
//!     HuggingFaceEmotionClassifier::new(config)?,
//!     Arc::new(FileEmotionLog::new("EmotionLog.txt")),
//! );
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    ClassificationResult, ClassifyError, EmotionClassifier, EmotionLog, EmotionLogEntry,
};

/// Classifier wrapper that persists detected emotions.
pub struct LoggingClassifier<C> {
    inner: C,
    log: Arc<dyn EmotionLog>,
}

impl<C: EmotionClassifier> LoggingClassifier<C> {
    pub fn new(inner: C, log: Arc<dyn EmotionLog>) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl<C: EmotionClassifier> EmotionClassifier for LoggingClassifier<C> {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifyError> {
        let result = self.inner.classify(text).await?;

        let entry = EmotionLogEntry::new(Timestamp::now(), result.label.clone());
        let log = Arc::clone(&self.log);
        tokio::spawn(async move {
            let label = entry.label.clone();
            if let Err(e) = log.record(entry).await {
                tracing::warn!(label = %label, error = %e, "failed to record emotion");
            }
        });

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::adapters::emotion_log::InMemoryEmotionLog;
    use crate::adapters::inference::MockEmotionClassifier;
    use crate::ports::{EmotionLogError, InferenceError};

    struct BrokenLog;

    /// Polls until `log` holds `count` entries or a second has passed.
    async fn wait_for_entries(log: &InMemoryEmotionLog, count: usize) -> Vec<EmotionLogEntry> {
        for _ in 0..100 {
            let entries = log.entries();
            if entries.len() >= count {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        log.entries()
    }

    /// Gives any detached write a chance to land.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    #[async_trait]
    impl EmotionLog for BrokenLog {
        async fn record(&self, _entry: EmotionLogEntry) -> Result<(), EmotionLogError> {
            Err(EmotionLogError::IoError("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn success_is_logged_once() {
        let log = Arc::new(InMemoryEmotionLog::new());
        let classifier = LoggingClassifier::new(
            MockEmotionClassifier::new().with_label("nostalgia", 0.8),
            log.clone(),
        );

        let result = classifier.classify("remember mix cds?").await.unwrap();

        assert_eq!(result.label, "nostalgia");
        let entries = wait_for_entries(&log, 1).await;
        settle().await;
        assert_eq!(log.entries().len(), 1);
        assert_eq!(entries[0].label, "nostalgia");
    }

    #[tokio::test]
    async fn failure_is_not_logged() {
        let log = Arc::new(InMemoryEmotionLog::new());
        let classifier = LoggingClassifier::new(
            MockEmotionClassifier::new().with_error(InferenceError::status(500, "boom")),
            log.clone(),
        );

        let result = classifier.classify("hello").await;

        assert!(result.is_err());
        settle().await;
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn empty_input_is_not_logged() {
        let log = Arc::new(InMemoryEmotionLog::new());
        let classifier = LoggingClassifier::new(MockEmotionClassifier::new(), log.clone());

        assert_eq!(classifier.classify("").await, Err(ClassifyError::EmptyInput));
        settle().await;
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn abandoned_call_is_not_logged() {
        let log = Arc::new(InMemoryEmotionLog::new());
        let classifier = LoggingClassifier::new(
            MockEmotionClassifier::new()
                .with_label("joy", 0.9)
                .with_delay(Duration::from_millis(200)),
            log.clone(),
        );

        let outcome =
            tokio::time::timeout(Duration::from_millis(20), classifier.classify("hi")).await;
        assert!(outcome.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn log_failure_keeps_the_result() {
        let classifier = LoggingClassifier::new(
            MockEmotionClassifier::new().with_label("joy", 0.6),
            Arc::new(BrokenLog),
        );

        let result = classifier.classify("yay").await.unwrap();
        assert_eq!(result.label, "joy");
    }
}
