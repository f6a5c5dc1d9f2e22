use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// All settings can be configured via environment variables with the `MOODTUNES_` prefix.
/// For example: `MOODTUNES_SERVER__PORT=8000`, `MOODTUNES_MODEL__MAX_LEN=100`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Sentiment model and tokenizer configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Music search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Element type of the model's input tensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Keras exports feed token indices as floats unless the `Input` layer says otherwise
    #[default]
    Float32,
    Int64,
    Int32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX sentiment classifier
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Path to the tokenizer JSON export
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: PathBuf,

    /// Fixed sequence length the model was trained with
    #[serde(default = "default_max_len")]
    pub max_len: usize,

    /// Element type of the model input
    #[serde(default)]
    pub input_type: InputType,

    /// ONNX Runtime intra-op thread count
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,

    /// Enable CUDA acceleration
    #[serde(default)]
    pub enable_cuda: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            tokenizer_path: default_tokenizer_path(),
            max_len: default_max_len(),
            input_type: InputType::default(),
            intra_threads: default_intra_threads(),
            enable_cuda: false,
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("sentiment_model.onnx")
}

fn default_tokenizer_path() -> PathBuf {
    PathBuf::from("tokenizer.json")
}

fn default_max_len() -> usize {
    100
}

fn default_intra_threads() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// YouTube Music API origin
    #[serde(default = "default_search_url")]
    pub base_url: String,

    /// `WEB_REMIX` client version; derived from today's date when unset
    #[serde(default)]
    pub client_version: Option<String>,

    /// Interface language sent in the client context
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds (no timeout when unset)
    #[serde(default)]
    pub timeout_s: Option<u64>,

    /// Number of recommendations returned per request, at most 5
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            client_version: None,
            language: default_language(),
            timeout_s: None,
            limit: default_limit(),
        }
    }
}

fn default_search_url() -> String {
    "https://music.youtube.com".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_limit() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ServerConfig {
    /// Returns the socket address for binding the server
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables should be prefixed with `MOODTUNES_` and use
    /// double underscores for nested values:
    /// - `MOODTUNES_MODEL__PATH` -> model.path
    /// - `MOODTUNES_SEARCH__TIMEOUT_S` -> search.timeout_s
    /// - `MOODTUNES_SERVER__PORT` -> server.port
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MOODTUNES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
