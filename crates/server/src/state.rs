use std::sync::Arc;

use tvsearch_catalog::ShowCatalog;

/// Shared application state passed to all handlers. Read-only: requests
/// never share mutable data.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ShowCatalog>,
}

impl AppState {
    pub fn new(catalog: impl ShowCatalog + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}
