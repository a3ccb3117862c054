//! TVMaze catalog client.
//!
//! Uses the public TVMaze API: https://www.tvmaze.com/api

use serde::Deserialize;
use tracing::{debug, warn};
use tvsearch_core::types::SearchResult;

use crate::provider::ShowCatalog;
use crate::{CatalogConfig, UpstreamError};

/// Error body TVMaze sends alongside non-success statuses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct TvMazeClient {
    base_url: String,
    client: reqwest::Client,
}

impl TvMazeClient {
    pub fn new(config: CatalogConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Internal(format!("build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_bytes(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, UpstreamError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "TVMaze request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            warn!(status = status.as_u16(), message = %message, "TVMaze rejected request");
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Unavailable(e.to_string())
            } else {
                UpstreamError::Internal(format!("read body: {e}"))
            }
        })?;
        Ok(bytes.to_vec())
    }
}

/// Errors raised before any response arrived. Only a malformed request is
/// our own fault; everything else means the catalog could not be reached.
fn classify_transport(e: reqwest::Error) -> UpstreamError {
    if e.is_builder() {
        UpstreamError::Internal(format!("build request: {e}"))
    } else {
        warn!(error = %e, "TVMaze unreachable");
        UpstreamError::Unavailable(e.to_string())
    }
}

#[async_trait::async_trait]
impl ShowCatalog for TvMazeClient {
    fn name(&self) -> &str {
        "tvmaze"
    }

    async fn search_shows(&self, query: &str) -> Result<Vec<SearchResult>, UpstreamError> {
        let body = self.get_bytes("/search/shows", &[("q", query)]).await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "TVMaze returned an unreadable search body");
            UpstreamError::Internal(format!("parse JSON: {e}"))
        })
    }
}
