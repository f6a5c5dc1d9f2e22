//! Shared types for the moodtunes API.
//!
//! These types are used across the application for request/response handling.

pub mod api;

use serde::{Deserialize, Serialize};

pub use api::*;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    /// Number of words in the loaded tokenizer vocabulary
    pub vocab_size: usize,
    /// Sequence length fed to the model
    pub max_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}
