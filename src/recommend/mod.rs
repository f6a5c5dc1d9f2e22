//! Music recommendations keyed off a sentiment.
//!
//! Each sentiment maps to a fixed search genre. One search is issued per
//! request; the hits are shuffled and the first few are formatted for display.

mod ytmusic;

pub use ytmusic::{parse_search_response, YtMusicClient, SONGS_FILTER_PARAMS};

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inference::Sentiment;

/// Upper bound on recommendations returned for one request
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Error type for music search operations
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search service returned status {0}")]
    Status(u16),

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),
}

/// A song returned by the search service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            title: title.into(),
            artists,
        }
    }

    /// Display form, e.g. `Under Pressure by Queen, David Bowie`
    pub fn display(&self) -> String {
        format!("{} by {}", self.title, self.artists.join(", "))
    }
}

/// Song search backend queried by genre keyword.
#[async_trait]
pub trait MusicSearch: Send + Sync {
    /// Search for songs matching `query`
    async fn search_songs(&self, query: &str) -> Result<Vec<Song>, SearchError>;
}

/// Search genre for a sentiment
pub fn genre_for(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "pop",
        Sentiment::Negative => "sad",
        Sentiment::Neutral => "classical",
    }
}

/// Turns a sentiment into a short, randomly ordered playlist.
#[derive(Clone)]
pub struct Recommender {
    search: Arc<dyn MusicSearch>,
    limit: usize,
}

impl Recommender {
    /// `limit` is capped at [`MAX_RECOMMENDATIONS`].
    pub fn new(search: Arc<dyn MusicSearch>, limit: usize) -> Self {
        Self {
            search,
            limit: limit.min(MAX_RECOMMENDATIONS),
        }
    }

    /// Maximum number of recommendations returned
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Recommend up to `limit` songs for `sentiment`.
    pub async fn recommend(&self, sentiment: Sentiment) -> Result<Vec<String>, SearchError> {
        let genre = genre_for(sentiment);
        let mut songs = self.search.search_songs(genre).await?;

        debug!(%sentiment, genre, hits = songs.len(), "Music search complete");

        songs.shuffle(&mut rand::rng());

        Ok(songs.iter().take(self.limit).map(Song::display).collect())
    }
}
