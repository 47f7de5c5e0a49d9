//! List Cache: time-bounded memoization for the user-list view.
//!
//! One artifact is cached today (the full user list with nested products),
//! but keys are an enum so growing the set later is a variant, not a
//! redesign. Backed by `moka` with a single time-to-live configured at
//! construction.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::db::RepositoryError;
use crate::models::user::UserWithProducts;

/// Keys for cacheable artifacts.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// The full user list with nested products.
    UserList,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CachedValue {
    /// The full user list with nested products.
    UserList(Arc<Vec<UserWithProducts>>),
}

/// Process-local cache for expensive list queries.
///
/// Cheap to clone; constructed once and handed to handlers through the
/// application state rather than living in a process-wide global.
#[derive(Clone)]
pub struct ListCache {
    inner: Cache<CacheKey, CachedValue>,
    ttl: Duration,
}

impl ListCache {
    /// Create a cache whose entries live for `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder().time_to_live(ttl).build();
        Self { inner, ttl }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a live (non-expired) entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Return the live entry for `key`, or await `compute`, store its result
    /// and return it.
    ///
    /// Concurrent misses for the same key are coalesced: one caller computes,
    /// the rest wait for that result. A failed compute is not cached, so the
    /// next call recomputes.
    ///
    /// # Errors
    ///
    /// Returns the compute error (shared, since several waiters may receive
    /// it) when the entry was absent and `compute` failed.
    pub async fn get_or_compute<F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<CachedValue, Arc<RepositoryError>>
    where
        F: Future<Output = Result<CachedValue, RepositoryError>>,
    {
        self.inner.try_get_with(key, compute).await
    }

    /// Remove the entry for `key` unconditionally.
    ///
    /// The next `get_or_compute` recomputes even inside what would have been
    /// the TTL window.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_list() -> CachedValue {
        CachedValue::UserList(Arc::new(Vec::new()))
    }

    async fn fill(cache: &ListCache, calls: &AtomicUsize) {
        let result = cache
            .get_or_compute(CacheKey::UserList, async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(empty_list())
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_second_hit_within_ttl_skips_compute() {
        let cache = ListCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        fill(&cache, &calls).await;
        fill(&cache, &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputes() {
        let cache = ListCache::new(Duration::from_millis(50));
        let calls = AtomicUsize::new(0);

        fill(&cache, &calls).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        fill(&cache, &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute_within_ttl() {
        let cache = ListCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        fill(&cache, &calls).await;
        cache.invalidate(&CacheKey::UserList).await;
        fill(&cache, &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_compute_is_not_cached() {
        let cache = ListCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let result = cache
            .get_or_compute(CacheKey::UserList, async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RepositoryError::DataCorruption("boom".to_owned()))
            })
            .await;
        assert!(result.is_err());
        assert!(!cache.contains(&CacheKey::UserList));

        fill(&cache, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_contains_reflects_liveness() {
        let cache = ListCache::new(Duration::from_millis(50));
        let calls = AtomicUsize::new(0);

        assert!(!cache.contains(&CacheKey::UserList));
        fill(&cache, &calls).await;
        assert!(cache.contains(&CacheKey::UserList));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!cache.contains(&CacheKey::UserList));
    }
}
