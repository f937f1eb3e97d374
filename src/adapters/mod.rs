//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the conversation engine to external systems:
//! - `inference` - Hugging Face classifier and reply generator, plus mocks
//! - `emotion_log` - File and in-memory emotion logs
//! - `display` - Console and recording display surfaces

pub mod display;
pub mod emotion_log;
pub mod inference;

pub use display::{ConsoleDisplay, RecordingDisplay};
pub use emotion_log::{FileEmotionLog, InMemoryEmotionLog};
pub use inference::{
    HuggingFaceClient, HuggingFaceConfig, HuggingFaceEmotionClassifier,
    HuggingFaceReplyGenerator, LoggingClassifier, MockEmotionClassifier, MockReplyGenerator,
};
