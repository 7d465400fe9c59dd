use std::sync::Arc;

use crate::{
    config::Config,
    db::Store,
    error::{AppError, AppResult},
};

/// Shared by every handler. `store` is `None` when the service started
/// without a reachable database.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn Store>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn Store>>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> AppResult<&dyn Store> {
        self.store.as_deref().ok_or(AppError::DatabaseUnavailable)
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub async fn close(&self) {
        if let Some(store) = &self.store {
            store.close().await;
        }
    }
}
