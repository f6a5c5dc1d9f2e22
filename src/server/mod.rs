//! HTTP server setup and routing.

mod extractors;
mod predict;
mod routes;

pub use extractors::JsonBody;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::inference::{SentimentClassifier, SentimentModel, TextTokenizer};
use crate::recommend::{MusicSearch, Recommender, YtMusicClient};

/// Shared application state passed to all handlers.
///
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub tokenizer: Arc<TextTokenizer>,
    pub classifier: Arc<dyn SentimentClassifier>,
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        tokenizer: TextTokenizer,
        classifier: Arc<dyn SentimentClassifier>,
        search: Arc<dyn MusicSearch>,
    ) -> Self {
        let recommender = Recommender::new(search, config.search.limit);
        Self {
            tokenizer: Arc::new(tokenizer),
            classifier,
            recommender,
        }
    }

    /// Load the tokenizer and model from disk and build the search client.
    pub fn load(config: &AppConfig) -> Result<Self, AppError> {
        let tokenizer = TextTokenizer::load(&config.model.tokenizer_path, config.model.max_len)?;
        let model = SentimentModel::load(&config.model)?;
        let search = YtMusicClient::new(&config.search)?;

        info!(device = %model.device(), "Sentiment model ready");

        Ok(Self::new(config, tokenizer, Arc::new(model), Arc::new(search)))
    }
}

/// Creates the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/predict", post(predict::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
