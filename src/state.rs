use std::path::PathBuf;
use std::sync::Arc;

use capjobs_core::{Config, KeywordRegistry};
use capjobs_store::{DocumentStore, MongoStore, StoreError};

use crate::rate_limit::RateLimiter;

/// Everything a request handler may touch, built once at startup.
pub struct AppState {
    pub keywords: KeywordRegistry,
    pub store: Arc<dyn DocumentStore>,
    pub limiter: RateLimiter,
    pub index_html: PathBuf,
}

impl AppState {
    /// Assemble state around an already-opened store.
    pub fn new(config: &Config, store: Arc<dyn DocumentStore>) -> Arc<Self> {
        Arc::new(Self {
            keywords: config.keywords.clone(),
            store,
            limiter: RateLimiter::new(config.rate_limit),
            index_html: config.server.index_html.clone(),
        })
    }

    /// Open the MongoDB client named by `config` and assemble state around it.
    pub async fn connect(config: &Config) -> Result<Arc<Self>, StoreError> {
        let store = MongoStore::connect(&config.database.uri, &config.database.name).await?;
        Ok(Self::new(config, Arc::new(store)))
    }
}
