//! Remote inference configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Hugging Face Inference API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Inference API token, sent as a bearer token
    pub api_token: Secret<String>,

    /// Base URL; the model id is appended as a path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Text-generation model used for replies
    #[serde(default = "default_reply_model")]
    pub reply_model: String,

    /// Text-classification model used for emotions
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Bound on each remote call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Generation budget per reply
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
}

impl InferenceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate inference configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("INFERENCE__API_TOKEN"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.reply_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("INFERENCE__REPLY_MODEL"));
        }
        if self.classifier_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("INFERENCE__CLASSIFIER_MODEL"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_new_tokens == 0 {
            return Err(ValidationError::InvalidMaxNewTokens);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_reply_model() -> String {
    "microsoft/DialoGPT-medium".to_string()
}

fn default_classifier_model() -> String {
    "1bbypluto/Nostalgic_finetuned".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_max_new_tokens() -> u32 {
    100
}
