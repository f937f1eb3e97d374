//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `NOSTALGIA_FRIEND` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use nostalgia_friend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Replying with {}", config.inference.reply_model);
//! ```

mod conversation;
mod emotion_log;
mod error;
mod inference;

pub use conversation::ConversationConfig;
pub use emotion_log::EmotionLogConfig;
pub use error::{ConfigError, ValidationError};
pub use inference::InferenceConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote inference (token, models, timeout)
    pub inference: InferenceConfig,

    /// Conversation behaviour
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Emotion log destination
    #[serde(default)]
    pub emotion_log: EmotionLogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `NOSTALGIA_FRIEND` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `NOSTALGIA_FRIEND__INFERENCE__API_TOKEN=hf_...` -> `inference.api_token = hf_...`
    /// - `NOSTALGIA_FRIEND__CONVERSATION__REPLY_LINES=join_lines` -> `conversation.reply_lines`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NOSTALGIA_FRIEND")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.inference.validate()?;
        Ok(())
    }
}
