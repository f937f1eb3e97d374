//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the conversation engine and the outside world. Adapters implement them.
//!
//! ## Inference Ports
//!
//! - `EmotionClassifier` - Text in, dominant emotion label out
//! - `ReplyGenerator` - Prompt in, generated continuation out
//!
//! ## Collaborator Ports
//!
//! - `EmotionLog` - Append-only record of detected emotions
//! - `DisplaySurface` - Speaker/text updates and the input-enabled flag

mod display_surface;
mod emotion_classifier;
mod emotion_log;
mod inference_error;
mod reply_generator;

pub use display_surface::{DisplaySurface, DisplayUpdate, SpeakerLabel};
pub use emotion_classifier::{ClassificationResult, EmotionClassifier, LabelScore};
pub use emotion_log::{EmotionLog, EmotionLogEntry, EmotionLogError};
pub use inference_error::{ClassifyError, GenerateError, InferenceError};
pub use reply_generator::{GeneratedCandidate, GenerationResult, ReplyGenerator};
