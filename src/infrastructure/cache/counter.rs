//! Popularity counter trait.

use async_trait::async_trait;

use super::service::CacheResult;

/// Per short code request counter used to decide promotion.
///
/// Counters start at zero, are never decremented and are never reset by the
/// service. Unless the store is configured with an idle expiry, a counter
/// lives forever.
#[async_trait]
pub trait PopularityCounter: Send + Sync {
    /// Atomically increments the counter and returns the new value.
    ///
    /// An absent counter is created and the call returns 1. Concurrent
    /// increments for the same code never lose updates.
    async fn increment(&self, short_code: &str) -> CacheResult<u64>;

    /// Returns the current value, 0 if the counter does not exist.
    async fn read(&self, short_code: &str) -> CacheResult<u64>;
}
