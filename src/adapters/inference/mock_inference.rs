//! Mock inference adapters for testing.
//!
//! Configurable stand-ins for the classifier and reply generator ports so
//! the conversation can be exercised without calling real endpoints.
//!
//! # Features
//!
//! - Pre-configured outcomes, consumed in order
//! - Simulated latency for timeout testing
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockReplyGenerator::new()
//!     .with_reply("Friend: lol yes!")
//!     .with_delay(Duration::from_millis(100));
//!
//! let result = generator.generate(&prompt).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    ClassificationResult, ClassifyError, EmotionClassifier, GenerateError, GenerationResult,
    ReplyGenerator,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock emotion classifier.
#[derive(Debug, Clone, Default)]
pub struct MockEmotionClassifier {
    outcomes: Arc<Mutex<VecDeque<Result<ClassificationResult, ClassifyError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEmotionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful classification.
    pub fn with_label(self, label: impl Into<String>, confidence: f32) -> Self {
        lock(&self.outcomes).push_back(Ok(ClassificationResult::new(label, confidence)));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: ClassifyError) -> Self {
        lock(&self.outcomes).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Texts passed to `classify`, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl EmotionClassifier for MockEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifyError> {
        if text.is_empty() {
            return Err(ClassifyError::EmptyInput);
        }
        lock(&self.calls).push(text.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = lock(&self.outcomes).pop_front();
        next.unwrap_or_else(|| Ok(ClassificationResult::new("neutral", 1.0)))
    }
}

/// Mock reply generator.
#[derive(Debug, Clone, Default)]
pub struct MockReplyGenerator {
    outcomes: Arc<Mutex<VecDeque<Result<GenerationResult, GenerateError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockReplyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful generation.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        lock(&self.outcomes).push_back(Ok(GenerationResult::new(text)));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: GenerateError) -> Self {
        lock(&self.outcomes).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Prompts passed to `generate`, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl ReplyGenerator for MockReplyGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerateError> {
        if prompt.is_empty() {
            return Err(GenerateError::EmptyInput);
        }
        lock(&self.calls).push(prompt.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = lock(&self.outcomes).pop_front();
        next.unwrap_or_else(|| Ok(GenerationResult::new("Friend: Mock reply")))
    }
}
