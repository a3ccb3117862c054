pub mod provider;
pub mod tvmaze;

use std::time::Duration;

use thiserror::Error;
use tvsearch_core::error::ApiError;

pub use provider::ShowCatalog;
pub use tvmaze::TvMazeClient;

/// How a catalog lookup failed.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// No response arrived: connection refused, DNS failure, timeout.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// The catalog answered with a non-success status.
    #[error("catalog returned {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("catalog failure: {0}")]
    Internal(String),
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Unavailable(_) => ApiError::UpstreamUnavailable,
            UpstreamError::Rejected { status, message } => ApiError::UpstreamApi { status, message },
            UpstreamError::Internal(message) => ApiError::Internal(message),
        }
    }
}

/// Upstream client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tvmaze.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
