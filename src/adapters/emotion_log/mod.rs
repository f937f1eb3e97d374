//! Emotion Log Adapters
//!
//! - `FileEmotionLog` - Appends timestamped lines to a text file
//! - `InMemoryEmotionLog` - For testing

mod file_emotion_log;
mod in_memory_emotion_log;

pub use file_emotion_log::FileEmotionLog;
pub use in_memory_emotion_log::InMemoryEmotionLog;
