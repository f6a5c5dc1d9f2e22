//! API request and response types for prediction.

use serde::{Deserialize, Serialize};

use crate::inference::{Prediction, Sentiment, NUM_CLASSES};

/// Request to classify a piece of text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Free text to classify
    pub text: String,
}

/// Prediction result with recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Echo of the input text
    pub text: String,
    /// Predicted sentiment
    pub sentiment: Sentiment,
    /// Probabilities for neutral, positive and negative, in that order
    pub confidence: [f32; NUM_CLASSES],
    /// Songs formatted as `title by artist1, artist2`
    pub recommendations: Vec<String>,
}

impl PredictResponse {
    pub fn new(text: String, prediction: Prediction, recommendations: Vec<String>) -> Self {
        Self {
            text,
            sentiment: prediction.sentiment,
            confidence: prediction.confidence,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let prediction = Prediction::from_scores([0.1, 0.8, 0.1]).unwrap();
        let response = PredictResponse::new(
            "I love this!".to_string(),
            prediction,
            vec!["Song by Artist".to_string()],
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["text"], "I love this!");
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["confidence"].as_array().unwrap().len(), 3);
        assert_eq!(json["recommendations"][0], "Song by Artist");
    }

    #[test]
    fn test_request_requires_text() {
        assert!(serde_json::from_str::<PredictRequest>(r#"{"txt": "hi"}"#).is_err());
        let req: PredictRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(req.text, "hi");
    }
}
