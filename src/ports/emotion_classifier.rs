//! Emotion Classifier Port - Interface for text-classification inference.
//!
//! The classifier labels the player's line with an emotion. Its outcome is
//! observational: it feeds the emotion log and tracing, never the reply path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::inference_error::ClassifyError;

/// Port for emotion/sentiment classification.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classifies `text`, returning the dominant label.
    ///
    /// Empty `text` fails with `EmptyInput` without any network call.
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifyError>;
}

/// One scored label as returned by a classification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// The dominant label of a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Picks the highest-scoring label; the first one wins ties.
    ///
    /// Fails with `EmptyResult` when there is nothing to pick from.
    pub fn from_scores(
        scores: impl IntoIterator<Item = LabelScore>,
    ) -> Result<Self, ClassifyError> {
        let mut best: Option<LabelScore> = None;
        for candidate in scores {
            match &best {
                Some(current) if candidate.score <= current.score => {}
                _ => best = Some(candidate),
            }
        }

        best.map(|b| Self::new(b.label, b.score))
            .ok_or(ClassifyError::EmptyResult)
    }
}
