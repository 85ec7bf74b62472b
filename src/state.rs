//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the data provider, the optional backend handle (absent in
//! demonstration mode), and process config.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::AppConfig;
use crate::services::provider::DataProvider;

/// Clone is required by Axum; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub provider: DataProvider,
    /// `None` when backend credentials are missing or placeholders.
    pub backend: Option<Arc<dyn Backend>>,
    pub config: AppConfig,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Option<Arc<dyn Backend>>, config: AppConfig) -> Self {
        let provider = DataProvider::new(backend.clone());
        Self { provider, backend, config }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
