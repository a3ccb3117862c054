//! Response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::error::ErrorEnvelope;
use crate::types::SearchResult;

/// Successful search body. `count` always equals `data.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<SearchResult>,
    pub count: usize,
}

impl SearchResponse {
    pub fn new(data: Vec<SearchResult>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "OK".to_string(),
            message: "TVMaze API server is running".to_string(),
        }
    }
}

/// Either body the search endpoint can produce, as seen by a consumer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success(SearchResponse),
    Error(ErrorEnvelope),
}
