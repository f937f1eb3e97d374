//! Hugging Face Inference API client.
//!
//! Shared transport for the classification and generation adapters: bearer
//! authentication, a bounded request timeout, and translation of HTTP
//! failures into `InferenceError`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HuggingFaceConfig::new(api_token, "microsoft/DialoGPT-medium")
//!     .with_base_url("https://api-inference.huggingface.co/models")
//!     .with_timeout(Duration::from_secs(15));
//!
//! let client = HuggingFaceClient::new(config)?;
//! ```

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::ports::InferenceError;

/// Default Inference API root; the model id is appended to it.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Longest slice of an unrecognised error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Configuration for one Hugging Face model endpoint.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// API token for bearer authentication.
    api_token: Secret<String>,
    /// Model id, e.g. "microsoft/DialoGPT-medium".
    pub model: String,
    /// Base URL the model id is appended to.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HuggingFaceConfig {
    /// Creates a configuration for `model` with the default base URL and a 15s timeout.
    pub fn new(api_token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_token: Secret::new(api_token.into()),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL for the configured model.
    pub fn endpoint_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// HTTP client bound to one model endpoint.
pub struct HuggingFaceClient {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceClient {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// POSTs an already-encoded JSON body and returns the 2xx response body.
    pub async fn post(&self, body: String) -> Result<String, InferenceError> {
        let response = self
            .client
            .post(self.config.endpoint_url())
            .header("Authorization", format!("Bearer {}", self.config.api_token()))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        tracing::debug!(model = %self.config.model, status = status.as_u16(), "inference response");

        if status.is_success() {
            Ok(text)
        } else {
            Err(error_from_status(status, &text))
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_timeout() {
            InferenceError::timeout(self.config.timeout)
        } else if e.is_connect() {
            InferenceError::network(format!("Connection failed: {}", e))
        } else {
            InferenceError::network(e.to_string())
        }
    }
}

/// Error body the Inference API sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: serde_json::Value,
    estimated_time: Option<f64>,
}

/// Maps a non-2xx status and its body to a transport error.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> InferenceError {
    InferenceError::status(status.as_u16(), error_message(status, body))
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        let mut message = match parsed.error {
            serde_json::Value::String(s) => s,
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };
        if let Some(secs) = parsed.estimated_time {
            message.push_str(&format!(" (ready in ~{}s)", secs.ceil() as u64));
        }
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}
