//! Word-index tokenizer for the sentiment model.
//!
//! Reads the JSON export of the tokenizer the classifier was trained with
//! (`Tokenizer.to_json()` in Keras) and reproduces its `texts_to_sequences`
//! plus `pad_sequences` behaviour: pre-padding and pre-truncation to a fixed
//! length with index 0 as padding.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::InferenceError;

const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Top-level layout of the tokenizer JSON export
#[derive(Debug, Deserialize)]
struct TokenizerFile {
    config: TokenizerConfig,
}

#[derive(Debug, Deserialize)]
struct TokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_lower")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: WordIndex,
}

/// Keras stores `word_index` as a JSON string nested inside the JSON document;
/// hand-written files usually inline the object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordIndex {
    Encoded(String),
    Inline(HashMap<String, i64>),
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_lower() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

/// Converts raw text into the fixed-length index sequence the model expects.
#[derive(Debug, Clone)]
pub struct TextTokenizer {
    word_index: HashMap<String, i64>,
    oov_index: Option<i64>,
    num_words: Option<usize>,
    filters: String,
    lower: bool,
    split: String,
    char_level: bool,
    max_len: usize,
}

impl TextTokenizer {
    /// Load a tokenizer export from disk
    pub fn load(path: &Path, max_len: usize) -> Result<Self, InferenceError> {
        let json = std::fs::read_to_string(path)?;
        let tokenizer = Self::from_json_str(&json, max_len)?;

        info!(
            path = %path.display(),
            vocab_size = tokenizer.vocab_size(),
            oov = tokenizer.oov_index.is_some(),
            max_len,
            "Tokenizer loaded"
        );

        Ok(tokenizer)
    }

    /// Parse a tokenizer export from a JSON string
    pub fn from_json_str(json: &str, max_len: usize) -> Result<Self, InferenceError> {
        let file: TokenizerFile = serde_json::from_str(json)
            .map_err(|e| InferenceError::Tokenizer(format!("Invalid tokenizer JSON: {e}")))?;
        let config = file.config;

        let word_index = match config.word_index {
            WordIndex::Inline(map) => map,
            WordIndex::Encoded(raw) => serde_json::from_str(&raw)
                .map_err(|e| InferenceError::Tokenizer(format!("Invalid word_index: {e}")))?,
        };

        if max_len == 0 {
            return Err(InferenceError::Tokenizer(
                "Sequence length must be positive".to_string(),
            ));
        }

        let oov_index = config
            .oov_token
            .as_ref()
            .and_then(|token| word_index.get(token).copied());

        Ok(Self {
            word_index,
            oov_index,
            num_words: config.num_words,
            filters: config.filters,
            lower: config.lower,
            split: config.split,
            char_level: config.char_level,
            max_len,
        })
    }

    /// Number of entries in the vocabulary
    pub fn vocab_size(&self) -> usize {
        self.word_index.len()
    }

    /// Fixed output sequence length
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Tokenize and pad `text` to exactly `max_len` indices.
    pub fn encode(&self, text: &str) -> Vec<i64> {
        let sequence = self.text_to_sequence(text);
        pad_sequence(&sequence, self.max_len)
    }

    /// Map `text` to vocabulary indices without padding.
    pub fn text_to_sequence(&self, text: &str) -> Vec<i64> {
        self.split_words(text)
            .iter()
            .filter_map(|word| self.lookup(word))
            .collect()
    }

    fn lookup(&self, word: &str) -> Option<i64> {
        match self.word_index.get(word) {
            Some(&index) => match self.num_words {
                Some(limit) if index >= limit as i64 => self.oov_index,
                _ => Some(index),
            },
            None => self.oov_index,
        }
    }

    fn split_words(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.char_level {
            return text.chars().map(String::from).collect();
        }

        let mut cleaned = String::with_capacity(text.len());
        for c in text.chars() {
            if self.filters.contains(c) {
                cleaned.push_str(&self.split);
            } else {
                cleaned.push(c);
            }
        }

        if self.split.is_empty() {
            return vec![cleaned];
        }

        cleaned
            .split(self.split.as_str())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Left-pad with zeros or keep the trailing `max_len` indices.
pub(crate) fn pad_sequence(sequence: &[i64], max_len: usize) -> Vec<i64> {
    let mut padded = vec![0i64; max_len];
    let kept = &sequence[sequence.len().saturating_sub(max_len)..];
    padded[max_len - kept.len()..].copy_from_slice(kept);
    padded
}
