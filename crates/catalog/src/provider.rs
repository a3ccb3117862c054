use tvsearch_core::types::SearchResult;

use crate::UpstreamError;

/// A show catalog that can be searched by free text.
#[async_trait::async_trait]
pub trait ShowCatalog: Send + Sync {
    fn name(&self) -> &str;

    /// Search shows matching `query`, in the catalog's relevance order.
    ///
    /// Callers pass a query that is non-empty after trimming. One outbound
    /// request per call; failures are not retried.
    async fn search_shows(&self, query: &str) -> Result<Vec<SearchResult>, UpstreamError>;
}
