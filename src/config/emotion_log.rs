//! Emotion log configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where detected emotions are recorded
#[derive(Debug, Clone, Deserialize)]
pub struct EmotionLogConfig {
    /// Record emotions at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Append-only log file
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for EmotionLogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> PathBuf {
    PathBuf::from("EmotionLog.txt")
}
