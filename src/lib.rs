//! moodtunes
//!
//! A small inference service that classifies the sentiment of free text with
//! a pre-trained ONNX model and recommends songs from YouTube Music to match.

pub mod config;
pub mod error;
pub mod inference;
pub mod math;
pub mod recommend;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, Result};

pub use inference::{Prediction, Sentiment, SentimentClassifier, SentimentModel, TextTokenizer};
pub use recommend::{MusicSearch, Recommender, Song, YtMusicClient};
