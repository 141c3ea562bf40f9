//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache or counter operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Time-limited store of short code to original URL for promoted links.
///
/// Entries expire a fixed time after they were written; reads never extend
/// them. A missing entry and an expired entry are indistinguishable.
///
/// Implementations report failures as [`CacheError`]. Callers on the redirect
/// path treat any error as a miss; the cache is never a correctness
/// dependency.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - shared Redis cache
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process cache for a single instance
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached original URL for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on miss or expired entry
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping that expires `ttl` after this write.
    ///
    /// Overwrites any existing entry and restarts its TTL.
    async fn set_url(&self, short_code: &str, original_url: &str, ttl: Duration)
    -> CacheResult<()>;

    /// Removes a cached mapping. Removing an absent entry succeeds.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
