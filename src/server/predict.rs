//! Sentiment prediction route handler.

use axum::{extract::State, Json};
use tracing::{error, info};

use crate::error::AppError;
use crate::inference;
use crate::types::{PredictRequest, PredictResponse};

use super::extractors::JsonBody;
use super::AppState;

/// POST /predict
///
/// Classify the sentiment of `text` and recommend songs to match it.
pub async fn predict(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    info!(text_len = req.text.len(), "Predicting sentiment");

    let prediction = tokio::task::spawn_blocking({
        let tokenizer = state.tokenizer.clone();
        let classifier = state.classifier.clone();
        let text = req.text.clone();
        move || inference::classify(&tokenizer, classifier.as_ref(), &text)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Prediction task panicked");
        AppError::Internal(e.to_string())
    })??;

    info!(
        sentiment = %prediction.sentiment,
        confidence = ?prediction.confidence,
        "Sentiment predicted"
    );

    let recommendations = state.recommender.recommend(prediction.sentiment).await?;

    Ok(Json(PredictResponse::new(
        req.text,
        prediction,
        recommendations,
    )))
}
