//! No-op cache implementation for disabled caching.

use super::counter::PopularityCounter;
use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache that stores nothing.
///
/// Used when Redis is configured but unreachable at startup: falling back to
/// a per-process cache would let instances serve targets that another
/// instance already invalidated. Every lookup misses and every counter reads
/// zero, so nothing is ever promoted and all redirects hit the durable store.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_url(&self, _short_code: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(
        &self,
        _short_code: &str,
        _original_url: &str,
        _ttl: Duration,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl PopularityCounter for NullCache {
    async fn increment(&self, _short_code: &str) -> CacheResult<u64> {
        Ok(0)
    }

    async fn read(&self, _short_code: &str) -> CacheResult<u64> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_never_hits() {
        let cache = NullCache::new();
        cache
            .set_url("abc", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get_url("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_null_counter_stays_at_zero() {
        let cache = NullCache::new();
        assert_eq!(cache.increment("abc").await.unwrap(), 0);
        assert_eq!(cache.read("abc").await.unwrap(), 0);
    }
}
