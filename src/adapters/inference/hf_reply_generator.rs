//! Hugging Face reply generator.
//!
//! Sends the rendered prompt to a text-generation model and returns the
//! first candidate. The request body is encoded by hand with the prompt
//! escaper so the prompt reaches the model exactly as rendered.

use async_trait::async_trait;
use serde::Deserialize;

use super::hugging_face::{HuggingFaceClient, HuggingFaceConfig};
use crate::domain::conversation::{escape_json_string, PromptRenderConfig};
use crate::ports::{GenerateError, GeneratedCandidate, GenerationResult, ReplyGenerator};

/// Reply generator backed by the Hugging Face Inference API.
pub struct HuggingFaceReplyGenerator {
    client: HuggingFaceClient,
    max_new_tokens: u32,
}

impl HuggingFaceReplyGenerator {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, GenerateError> {
        Ok(Self {
            client: HuggingFaceClient::new(config)?,
            max_new_tokens: PromptRenderConfig::default().max_new_tokens,
        })
    }

    /// Sends the generation budget of the prompt configuration that
    /// renders this generator's prompts.
    pub fn with_render_config(mut self, render: &PromptRenderConfig) -> Self {
        self.max_new_tokens = render.max_new_tokens;
        self
    }
}

#[async_trait]
impl ReplyGenerator for HuggingFaceReplyGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerateError> {
        if prompt.is_empty() {
            return Err(GenerateError::EmptyInput);
        }

        let body = encode_request_body(prompt, self.max_new_tokens);
        let response = self.client.post(body).await?;
        let result = GenerationResult::from_candidates(parse_candidates(&response)?)?;

        tracing::debug!(
            model = self.client.model(),
            chars = result.text.len(),
            "generated reply"
        );
        Ok(result)
    }
}

/// Encodes `{"inputs": <prompt>, "parameters": {"max_new_tokens": n}}`.
fn encode_request_body(prompt: &str, max_new_tokens: u32) -> String {
    format!(
        "{{\"inputs\":\"{}\",\"parameters\":{{\"max_new_tokens\":{}}}}}",
        escape_json_string(prompt),
        max_new_tokens
    )
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationBody {
    Many(Vec<GeneratedCandidate>),
    One(GeneratedCandidate),
}

/// Decodes a generation response into its candidates.
fn parse_candidates(body: &str) -> Result<Vec<GeneratedCandidate>, GenerateError> {
    let parsed: GenerationBody = serde_json::from_str(body)
        .map_err(|e| GenerateError::parse(format!("Failed to parse generation: {}", e)))?;

    Ok(match parsed {
        GenerationBody::Many(candidates) => candidates,
        GenerationBody::One(candidate) => vec![candidate],
    })
}
