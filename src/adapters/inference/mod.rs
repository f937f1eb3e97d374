//! Inference Adapters.
//!
//! Implementations of the classifier and reply generator ports.
//!
//! ## Available Adapters
//!
//! - `HuggingFaceEmotionClassifier` - Hugging Face text-classification models
//! - `HuggingFaceReplyGenerator` - Hugging Face text-generation models
//! - `LoggingClassifier` - Wrapper that records each detected emotion
//! - `MockEmotionClassifier` / `MockReplyGenerator` - Configurable mocks for testing

mod hf_emotion_classifier;
mod hf_reply_generator;
mod hugging_face;
mod logging_classifier;
mod mock_inference;

pub use hf_emotion_classifier::HuggingFaceEmotionClassifier;
pub use hf_reply_generator::HuggingFaceReplyGenerator;
pub use hugging_face::{HuggingFaceClient, HuggingFaceConfig, DEFAULT_BASE_URL};
pub use logging_classifier::LoggingClassifier;
pub use mock_inference::{MockEmotionClassifier, MockReplyGenerator};
