//! In-process cache and popularity counter.

use super::counter::PopularityCounter;
use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedUrl {
    original_url: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct CounterSlot {
    count: u64,
    touched_at: Instant,
}

/// DashMap-backed implementation of [`CacheService`] and [`PopularityCounter`].
///
/// Suitable for a single service instance (no Redis configured) and as a test
/// double. Expired entries are dropped lazily on access; there is no sweeper
/// task. Counter increments run under the shard lock of their key, so
/// concurrent increments of the same code never lose updates.
#[derive(Clone, Default)]
pub struct MemoryCache {
    urls: Arc<DashMap<String, CachedUrl>>,
    counters: Arc<DashMap<String, CounterSlot>>,
    counter_ttl: Option<Duration>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose counters reset after `ttl` without increments.
    pub fn with_counter_ttl(counter_ttl: Option<Duration>) -> Self {
        Self {
            counter_ttl,
            ..Self::default()
        }
    }

    /// Number of live cache entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.urls.iter().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn counter_expired(&self, slot: &CounterSlot, now: Instant) -> bool {
        self.counter_ttl
            .is_some_and(|ttl| now.duration_since(slot.touched_at) >= ttl)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        if let Some(entry) = self.urls.get(short_code) {
            if entry.expires_at > now {
                debug!("Cache HIT: {}", short_code);
                return Ok(Some(entry.original_url.clone()));
            }
        }

        self.urls.remove_if(short_code, |_, e| e.expires_at <= now);
        debug!("Cache MISS: {}", short_code);
        Ok(None)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.urls.insert(
            short_code.to_string(),
            CachedUrl {
                original_url: original_url.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        debug!("Cache SET: {} (TTL: {:?})", short_code, ttl);
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        if self.urls.remove(short_code).is_some() {
            debug!("Cache INVALIDATE: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl PopularityCounter for MemoryCache {
    async fn increment(&self, short_code: &str) -> CacheResult<u64> {
        let now = Instant::now();

        let count = match self.counters.entry(short_code.to_string()) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if self.counter_expired(slot, now) {
                    slot.count = 0;
                }
                slot.count += 1;
                slot.touched_at = now;
                slot.count
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CounterSlot {
                    count: 1,
                    touched_at: now,
                });
                1
            }
        };

        Ok(count)
    }

    async fn read(&self, short_code: &str) -> CacheResult<u64> {
        let now = Instant::now();

        Ok(self
            .counters
            .get(short_code)
            .filter(|slot| !self.counter_expired(slot, now))
            .map(|slot| slot.count)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache
            .set_url("abc123", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_url("short", "https://example.com", Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get_url("short").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_read_does_not_extend_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_url("fixed", "https://example.com", Duration::from_millis(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get_url("fixed").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get_url("fixed").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_url("code", "https://old.com", Duration::from_millis(20))
            .await
            .unwrap();
        cache
            .set_url("code", "https://new.com", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(
            cache.get_url("code").await.unwrap().as_deref(),
            Some("https://new.com")
        );
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = MemoryCache::new();
        cache
            .set_url("gone", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        cache.invalidate("gone").await.unwrap();
        cache.invalidate("never-cached").await.unwrap();

        assert_eq!(cache.get_url("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_counter_starts_at_one() {
        let cache = MemoryCache::new();
        assert_eq!(cache.read("abc").await.unwrap(), 0);
        assert_eq!(cache.increment("abc").await.unwrap(), 1);
        assert_eq!(cache.increment("abc").await.unwrap(), 2);
        assert_eq!(cache.read("abc").await.unwrap(), 2);
        assert_eq!(cache.read("other").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counter_never_expires_by_default() {
        let cache = MemoryCache::new();
        cache.increment("cold").await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.read("cold").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counter_resets_after_idle_ttl() {
        let cache = MemoryCache::with_counter_ttl(Some(Duration::from_millis(20)));
        cache.increment("idle").await.unwrap();
        cache.increment("idle").await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.read("idle").await.unwrap(), 0);
        assert_eq!(cache.increment("idle").await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let cache = MemoryCache::new();
        let mut handles = Vec::new();

        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..125 {
                    cache.increment("hot").await.unwrap();
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.read("hot").await.unwrap(), 1000);
    }
}
