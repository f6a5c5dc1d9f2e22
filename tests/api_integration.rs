//! Integration tests for API endpoints.
//!
//! These tests drive the real router with a word-matching classifier and an
//! in-memory song catalogue, so they need neither a model file nor network
//! access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use moodtunes::config::AppConfig;
use moodtunes::inference::{InferenceError, SentimentClassifier, TextTokenizer, NUM_CLASSES};
use moodtunes::recommend::{MusicSearch, SearchError, Song};
use moodtunes::server::{create_router, AppState};

const LOVE: i64 = 3;
const HATE: i64 = 4;

fn tokenizer() -> TextTokenizer {
    let word_index = json!({"<OOV>": 1, "i": 2, "love": 3, "hate": 4, "this": 5}).to_string();
    let export = json!({
        "class_name": "Tokenizer",
        "config": {"oov_token": "<OOV>", "lower": true, "split": " ", "word_index": word_index}
    });
    TextTokenizer::from_json_str(&export.to_string(), 100).unwrap()
}

/// Scores "love" as positive and "hate" as negative; everything else is neutral
struct KeywordClassifier;

impl SentimentClassifier for KeywordClassifier {
    fn predict(&self, sequence: &[i64]) -> Result<[f32; NUM_CLASSES], InferenceError> {
        assert_eq!(sequence.len(), 100);
        if sequence.contains(&LOVE) {
            Ok([0.05, 0.9, 0.05])
        } else if sequence.contains(&HATE) {
            Ok([0.1, 0.1, 0.8])
        } else {
            Ok([0.6, 0.2, 0.2])
        }
    }
}

/// Emits raw logits instead of probabilities
struct LogitClassifier;

impl SentimentClassifier for LogitClassifier {
    fn predict(&self, _sequence: &[i64]) -> Result<[f32; NUM_CLASSES], InferenceError> {
        Ok([1.5, -0.3, 4.2])
    }
}

struct BrokenClassifier;

impl SentimentClassifier for BrokenClassifier {
    fn predict(&self, _sequence: &[i64]) -> Result<[f32; NUM_CLASSES], InferenceError> {
        Err(InferenceError::Onnx("session exploded".to_string()))
    }
}

/// Returns `count` songs tagged with the query and records every query
struct Catalogue {
    count: usize,
    queries: Mutex<Vec<String>>,
}

impl Catalogue {
    fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            count,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl MusicSearch for Catalogue {
    async fn search_songs(&self, query: &str) -> Result<Vec<Song>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok((0..self.count)
            .map(|i| {
                Song::new(
                    format!("{query} song {i}"),
                    vec![format!("Artist {i}"), "Guest".to_string()],
                )
            })
            .collect())
    }
}

struct Offline;

#[async_trait]
impl MusicSearch for Offline {
    async fn search_songs(&self, _query: &str) -> Result<Vec<Song>, SearchError> {
        Err(SearchError::Status(503))
    }
}

fn create_test_server(
    classifier: Arc<dyn SentimentClassifier>,
    search: Arc<dyn MusicSearch>,
) -> TestServer {
    let state = AppState::new(&AppConfig::default(), tokenizer(), classifier, search);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn default_server(catalogue: Arc<Catalogue>) -> TestServer {
    create_test_server(Arc::new(KeywordClassifier), catalogue)
}

fn assert_confidence(body: &Value) {
    let confidence: Vec<f64> = body["confidence"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(confidence.len(), 3);
    let sum: f64 = confidence.iter().sum();
    assert!((sum - 1.0).abs() < 1e-3, "confidence sums to {sum}");
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = default_server(Catalogue::new(5));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["max_len"], 100);
    assert_eq!(body["vocab_size"], 5);
}

#[tokio::test]
async fn test_predict_positive_uses_pop() {
    let catalogue = Catalogue::new(10);
    let server = default_server(catalogue.clone());

    let response = server
        .post("/predict")
        .json(&json!({"text": "I love this!"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["text"], "I love this!");
    assert_eq!(body["sentiment"], "positive");
    assert_confidence(&body);

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 5);
    for rec in recs {
        let rec = rec.as_str().unwrap();
        assert!(rec.starts_with("pop song "), "unexpected recommendation {rec}");
        assert!(rec.ends_with(", Guest"));
    }
    assert_eq!(*catalogue.queries.lock().unwrap(), vec!["pop".to_string()]);
}

#[tokio::test]
async fn test_predict_negative_uses_sad() {
    let catalogue = Catalogue::new(10);
    let server = default_server(catalogue.clone());

    let response = server
        .post("/predict")
        .json(&json!({"text": "I HATE this"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sentiment"], "negative");
    assert_eq!(*catalogue.queries.lock().unwrap(), vec!["sad".to_string()]);
}

#[tokio::test]
async fn test_predict_neutral_uses_classical() {
    let catalogue = Catalogue::new(10);
    let server = default_server(catalogue.clone());

    let response = server
        .post("/predict")
        .json(&json!({"text": "the weather report"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sentiment"], "neutral");
    assert_confidence(&body);
    assert_eq!(*catalogue.queries.lock().unwrap(), vec!["classical".to_string()]);
}

#[tokio::test]
async fn test_predict_fewer_search_results() {
    let server = default_server(Catalogue::new(3));

    let response = server.post("/predict").json(&json!({"text": "love"})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_predict_configured_limit_is_capped() {
    let mut config = AppConfig::default();
    config.search.limit = 10;
    let catalogue = Catalogue::new(20);
    let state = AppState::new(&config, tokenizer(), Arc::new(KeywordClassifier), catalogue);
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.post("/predict").json(&json!({"text": "love"})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_predict_empty_text() {
    let server = default_server(Catalogue::new(5));

    let response = server.post("/predict").json(&json!({"text": ""})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sentiment"], "neutral");
    assert_confidence(&body);
}

#[tokio::test]
async fn test_predict_normalizes_logits() {
    let server = create_test_server(Arc::new(LogitClassifier), Catalogue::new(5));

    let response = server.post("/predict").json(&json!({"text": "anything"})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sentiment"], "negative");
    assert_confidence(&body);
}

#[tokio::test]
async fn test_predict_missing_text_is_validation_error() {
    let catalogue = Catalogue::new(5);
    let server = default_server(catalogue.clone());

    let response = server.post("/predict").json(&json!({"txt": "hello"})).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("text"));
    assert!(catalogue.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_predict_wrong_type_is_validation_error() {
    let server = default_server(Catalogue::new(5));

    let response = server.post("/predict").json(&json!({"text": 42})).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_malformed_json() {
    let server = default_server(Catalogue::new(5));

    let response = server
        .post("/predict")
        .bytes("{\"text\": ".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_predict_requires_json_content_type() {
    let server = default_server(Catalogue::new(5));

    let response = server.post("/predict").text("I love this!").await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_search_failure_is_500_with_detail() {
    let server = create_test_server(Arc::new(KeywordClassifier), Arc::new(Offline));

    let response = server.post("/predict").json(&json!({"text": "love"})).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Search service returned status 503");
}

#[tokio::test]
async fn test_classifier_failure_is_500_with_detail() {
    let server = create_test_server(Arc::new(BrokenClassifier), Catalogue::new(5));

    let response = server.post("/predict").json(&json!({"text": "love"})).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["detail"], "ONNX runtime error: session exploded");
}

#[tokio::test]
async fn test_unknown_route() {
    let server = default_server(Catalogue::new(5));

    let response = server.get("/predict").await;

    response.assert_status_not_ok();
}
