//! YouTube Music search client.
//!
//! Talks to the same internal `youtubei` endpoint the web player uses, with
//! the search restricted to songs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{MusicSearch, SearchError, Song};
use crate::config::SearchConfig;

/// Search `params` value that restricts results to songs
pub const SONGS_FILTER_PARAMS: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

const ALBUM_PAGE: &str = "MUSIC_PAGE_TYPE_ALBUM";

const PAGE_TYPE_POINTER: &str = concat!(
    "/navigationEndpoint/browseEndpoint/browseEndpointContextSupportedConfigs",
    "/browseEndpointContextMusicConfig/pageType"
);

const TABBED_SECTIONS_POINTER: &str = concat!(
    "/contents/tabbedSearchResultsRenderer/tabs/0/tabRenderer/content",
    "/sectionListRenderer/contents"
);

/// Client for the YouTube Music search API
#[derive(Clone)]
pub struct YtMusicClient {
    client: Client,
    base_url: String,
    client_version: String,
    language: String,
}

impl YtMusicClient {
    /// Create a new client from search configuration
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_s {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client_version = config
            .client_version
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("1.%Y%m%d.01.00").to_string());

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_version,
            language: config.language.clone(),
        })
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "context": {
                "client": {
                    "clientName": "WEB_REMIX",
                    "clientVersion": self.client_version,
                    "hl": self.language,
                },
                "user": {}
            },
            "query": query,
            "params": SONGS_FILTER_PARAMS,
        })
    }
}

#[async_trait]
impl MusicSearch for YtMusicClient {
    async fn search_songs(&self, query: &str) -> Result<Vec<Song>, SearchError> {
        let url = format!("{}/youtubei/v1/search?alt=json", self.base_url);

        debug!(query, %url, "Searching YouTube Music");

        let response = self
            .client
            .post(&url)
            .header("origin", &self.base_url)
            .json(&self.request_body(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), query, "YouTube Music search failed");
            return Err(SearchError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(parse_search_response(&body))
    }
}

/// Extract songs from a `youtubei/v1/search` response.
///
/// Items without a title are skipped. A response with no song shelves
/// yields an empty list.
pub fn parse_search_response(body: &Value) -> Vec<Song> {
    let sections = body
        .pointer(TABBED_SECTIONS_POINTER)
        .or_else(|| body.pointer("/contents/sectionListRenderer/contents"))
        .and_then(Value::as_array);

    let Some(sections) = sections else {
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| section.pointer("/musicShelfRenderer/contents"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .filter_map(parse_song)
        .collect()
}

fn parse_song(item: &Value) -> Option<Song> {
    let title = flex_column_runs(item, 0)?
        .first()?
        .get("text")?
        .as_str()?
        .to_string();

    let artists = flex_column_runs(item, 1)
        .map(parse_artist_runs)
        .unwrap_or_default();

    Some(Song { title, artists })
}

fn flex_column_runs(item: &Value, index: usize) -> Option<&[Value]> {
    item.get("flexColumns")?
        .get(index)?
        .pointer("/musicResponsiveListItemFlexColumnRenderer/text/runs")?
        .as_array()
        .map(Vec::as_slice)
}

/// Artist runs sit at even positions, separated by `" & "`, `", "` or `" • "`.
/// The same column also carries the album link, duration and sometimes year.
fn parse_artist_runs(runs: &[Value]) -> Vec<String> {
    runs.iter()
        .step_by(2)
        .filter(|run| page_type(run) != Some(ALBUM_PAGE))
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .filter(|text| !is_metadata(text))
        .map(str::to_string)
        .collect()
}

fn page_type(run: &Value) -> Option<&str> {
    run.pointer(PAGE_TYPE_POINTER).and_then(Value::as_str)
}

fn is_metadata(text: &str) -> bool {
    let text = text.trim();
    text.is_empty()
        || text == "Song"
        || is_duration(text)
        || is_year(text)
        || is_play_count(text)
}

fn is_duration(text: &str) -> bool {
    text.contains(':')
        && text
            .split(':')
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn is_year(text: &str) -> bool {
    text.len() == 4 && text.chars().all(|c| c.is_ascii_digit())
}

fn is_play_count(text: &str) -> bool {
    text.ends_with(" plays") || text.ends_with(" views")
}
