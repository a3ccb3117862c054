//! HTTP client for the search backend.

use thiserror::Error;
use tracing::debug;
use tvsearch_core::envelope::ResponseEnvelope;
use tvsearch_core::types::SearchResult;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Failed to connect to the server. Please check if the backend is running.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// A search that produced no results. `Display` is the text shown to the
/// user; the variants only matter for logging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchFailure {
    /// The backend answered with an error envelope.
    #[error("{message}")]
    Server { kind: String, message: String },
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,
    #[error("{}", UNEXPECTED_ERROR_MESSAGE)]
    Unexpected,
}

/// Anything that can answer a show search for the lifecycle controller.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchFailure>;
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl SearchBackend for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchFailure> {
        let url = format!("{}/api/search/shows", self.base_url);
        debug!(url = %url, query = %query, "backend request");

        let resp = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "backend unreachable");
                SearchFailure::Network
            })?;

        let body = resp.bytes().await.map_err(|_| SearchFailure::Network)?;
        let envelope: ResponseEnvelope = serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, "unreadable backend body");
            SearchFailure::Unexpected
        })?;

        match envelope {
            ResponseEnvelope::Success(r) => Ok(r.data),
            ResponseEnvelope::Error(e) => Err(SearchFailure::Server {
                kind: e.error,
                message: e.message,
            }),
        }
    }
}
