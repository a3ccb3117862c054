use std::any::Any;
use std::collections::HashMap;

use axum::extract::{OriginalUri, Query, State};
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};
use tvsearch_core::envelope::{HealthResponse, SearchResponse};
use tvsearch_core::error::ApiError;

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    // Outermost first: panics are turned into responses before the
    // header and CORS layers see them.
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CatchPanicLayer::custom(handle_panic));

    Router::new()
        .nest("/api", api_router())
        .fallback(route_not_found)
        .layer(middleware)
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/search/shows", get(search_shows))
        .method_not_allowed_fallback(route_not_found)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Query parameters are read as a plain map so that no input shape can
/// produce a non-envelope rejection. A repeated `q` keeps its last value.
async fn search_shows(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params
        .get("q")
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::MissingQueryParameter)?;

    debug!(query = %query, catalog = state.catalog.name(), "searching shows");

    let data = state.catalog.search_shows(query).await.map_err(|e| {
        warn!(query = %query, error = %e, "show search failed");
        ApiError::from(e)
    })?;

    Ok(Json(SearchResponse::new(data)))
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

/// Unknown paths and unsupported methods on known paths both answer 404.
async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    ApiError::RouteNotFound {
        method: method.to_string(),
        path,
    }
    .into()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "non-string panic payload"
    };

    error!(panic = %message, "request handler panicked");
    AppError(ApiError::Unhandled).into_response()
}
