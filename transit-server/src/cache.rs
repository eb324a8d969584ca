//! Caching layer for route fetches.
//!
//! Repeated searches for the same origin/destination within the TTL are
//! answered from memory. Only successful result sets are cached, so a
//! failed search is always retried against the backing service.
//!
//! Every hit hands out a fresh clone with the first alternative selected,
//! so one session's selection never leaks into another's.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{RouteQuery, RouteResultSet};
use crate::fetcher::{FetchError, RouteFetcher};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Route fetcher with caching.
///
/// Wraps any [`RouteFetcher`] and caches its successful answers per query.
pub struct CachedRouteFetcher<F> {
    inner: F,
    results: MokaCache<RouteQuery, Arc<RouteResultSet>>,
}

impl<F> CachedRouteFetcher<F> {
    /// Create a new cached fetcher.
    pub fn new(inner: F, config: &CacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, results }
    }

    /// Access the underlying fetcher for operations that bypass cache.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.results.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.results.invalidate_all();
    }
}

impl<F: RouteFetcher> RouteFetcher for CachedRouteFetcher<F> {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
        if let Some(cached) = self.results.get(query).await {
            debug!(%query, "Route cache hit");
            return Ok(RouteResultSet::clone(&cached));
        }

        let fresh = self.inner.fetch(query).await?;
        self.results
            .insert(query.clone(), Arc::new(fresh.clone()))
            .await;

        Ok(fresh)
    }
}
