use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the HTTP API can report to a caller.
///
/// `Display` is the human message; [`ApiError::kind`] is the short label
/// placed in the envelope's `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Query parameter \"q\" is required")]
    MissingQueryParameter,

    /// The catalog answered with a non-success status; it is passed through.
    #[error("{message}")]
    UpstreamApi { status: u16, message: String },

    #[error("Could not reach TVMaze API")]
    UpstreamUnavailable,

    #[error("{0}")]
    Internal(String),

    #[error("Cannot {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// A handler panicked. The panic text stays in the server log.
    #[error("Unknown error")]
    Unhandled,
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingQueryParameter => "Missing query parameter",
            Self::UpstreamApi { .. } => "TVMaze API error",
            Self::UpstreamUnavailable => "TVMaze API is unavailable",
            Self::Internal(_) => "Internal server error",
            Self::RouteNotFound { .. } => "Route not found",
            Self::Unhandled => "Something broke!",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingQueryParameter => 400,
            Self::UpstreamApi { status, .. } => *status,
            Self::UpstreamUnavailable => 503,
            Self::Internal(_) => 500,
            Self::RouteNotFound { .. } => 404,
            Self::Unhandled => 500,
        }
    }
}

/// JSON error envelope: `{ "error": "<kind>", "message": "<text>" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}
