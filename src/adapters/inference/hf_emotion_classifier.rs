//! Hugging Face emotion classifier.
//!
//! Sends `{"inputs": <text>}` to a text-classification model and picks the
//! dominant label. Depending on the model, the endpoint answers with a flat
//! list of `{label, score}` objects or a list wrapping one such list; both
//! are accepted.

use async_trait::async_trait;
use serde::Deserialize;

use super::hugging_face::{HuggingFaceClient, HuggingFaceConfig};
use crate::ports::{ClassificationResult, ClassifyError, EmotionClassifier, LabelScore};

/// Emotion classifier backed by the Hugging Face Inference API.
pub struct HuggingFaceEmotionClassifier {
    client: HuggingFaceClient,
}

impl HuggingFaceEmotionClassifier {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            client: HuggingFaceClient::new(config)?,
        })
    }
}

#[async_trait]
impl EmotionClassifier for HuggingFaceEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifyError> {
        if text.is_empty() {
            return Err(ClassifyError::EmptyInput);
        }

        let body = serde_json::json!({ "inputs": text }).to_string();
        let response = self.client.post(body).await?;
        let result = ClassificationResult::from_scores(parse_scores(&response)?)?;

        tracing::debug!(
            model = self.client.model(),
            label = %result.label,
            confidence = result.confidence,
            "classified text"
        );
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationBody {
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

/// Decodes a classification response into its scored labels.
fn parse_scores(body: &str) -> Result<Vec<LabelScore>, ClassifyError> {
    let parsed: ClassificationBody = serde_json::from_str(body)
        .map_err(|e| ClassifyError::parse(format!("Failed to parse classification: {}", e)))?;

    Ok(match parsed {
        ClassificationBody::Flat(scores) => scores,
        ClassificationBody::Nested(lists) => lists.into_iter().next().unwrap_or_default(),
    })
}
