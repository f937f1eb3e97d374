//! Reply Generator Port - Interface for text-generation inference.
//!
//! Takes a fully rendered prompt and returns the generator's continuation.
//! Splitting that continuation into turns is the controller's decision.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::inference_error::GenerateError;

/// Port for reply generation.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generates a continuation for `prompt`.
    ///
    /// Empty `prompt` fails with `EmptyInput` without any network call.
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerateError>;
}

/// One candidate completion as returned by a generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCandidate {
    pub generated_text: String,
}

/// Generated text. May span several lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Takes the first candidate; later candidates are ignored.
    ///
    /// Fails with `EmptyResult` when there are no candidates.
    pub fn from_candidates(
        candidates: impl IntoIterator<Item = GeneratedCandidate>,
    ) -> Result<Self, GenerateError> {
        candidates
            .into_iter()
            .next()
            .map(|c| Self::new(c.generated_text))
            .ok_or(GenerateError::EmptyResult)
    }
}
