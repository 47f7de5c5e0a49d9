//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::ListCache;
use crate::config::ApiConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; carries the configuration, the database
/// connection pool, and the List Cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    cache: ListCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The List Cache is constructed here, once per process, with the
    /// configured TTL.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let cache = ListCache::new(config.cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cache,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the List Cache.
    #[must_use]
    pub fn cache(&self) -> &ListCache {
        &self.inner.cache
    }
}
