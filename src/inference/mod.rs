//! Sentiment inference.
//!
//! Text goes through the [`TextTokenizer`] to a fixed-length index sequence,
//! then through a [`SentimentClassifier`] to three class probabilities, and
//! finally through the label table to a [`Sentiment`].

mod model;
mod tokenizer;

pub use model::{Device, SentimentModel};
pub use tokenizer::TextTokenizer;

use serde::{Deserialize, Serialize};

use crate::math::{argmax, is_distribution, softmax};

/// Number of sentiment classes the classifier was trained on
pub const NUM_CLASSES: usize = 3;

/// Sentiment classes in training-time label order
pub const LABELS: [Sentiment; NUM_CLASSES] =
    [Sentiment::Neutral, Sentiment::Positive, Sentiment::Negative];

/// Sentiment predicted for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Neutral,
    Positive,
    Negative,
}

impl Sentiment {
    /// Map a training-time label index to its sentiment
    pub fn from_index(index: usize) -> Option<Self> {
        LABELS.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for a single text
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub sentiment: Sentiment,
    /// Class probabilities, in [`LABELS`] order
    pub confidence: [f32; NUM_CLASSES],
}

impl Prediction {
    /// Build a prediction from raw classifier scores.
    ///
    /// Scores that are not already a probability distribution are passed
    /// through softmax first.
    pub fn from_scores(scores: [f32; NUM_CLASSES]) -> Result<Self, InferenceError> {
        let confidence = if is_distribution(&scores) {
            scores
        } else {
            let probs = softmax(&scores);
            [probs[0], probs[1], probs[2]]
        };

        let sentiment = argmax(&confidence)
            .and_then(Sentiment::from_index)
            .ok_or_else(|| InferenceError::InvalidOutput(format!("{confidence:?}")))?;

        Ok(Self {
            sentiment,
            confidence,
        })
    }
}

/// A model that scores a padded token sequence against the sentiment classes.
pub trait SentimentClassifier: Send + Sync {
    /// Run one forward pass and return the raw class scores
    fn predict(&self, sequence: &[i64]) -> Result<[f32; NUM_CLASSES], InferenceError>;
}

/// Tokenize `text`, run the classifier and map the result to a sentiment.
pub fn classify(
    tokenizer: &TextTokenizer,
    classifier: &dyn SentimentClassifier,
    text: &str,
) -> Result<Prediction, InferenceError> {
    let sequence = tokenizer.encode(text);
    let scores = classifier.predict(&sequence)?;
    Prediction::from_scores(scores)
}

/// Inference error types
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("ONNX runtime error: {0}")]
    Onnx(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
