use std::sync::Arc;

use crate::config::BoardConfig;
use crate::gateway::{HttpGateway, SymbolDataSource};
use crate::symbols::StaticCategories;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: BoardConfig,
    pub source: Arc<dyn SymbolDataSource>,
    pub categories: StaticCategories,
}

impl AppState {
    pub fn new(config: BoardConfig) -> Arc<Self> {
        let source = Arc::new(HttpGateway::new(&config));
        Arc::new(Self {
            config,
            source,
            categories: StaticCategories,
        })
    }
}
