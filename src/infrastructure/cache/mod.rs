//! Cache layer and popularity counter for the redirect path.
//!
//! Provides the [`CacheService`] and [`PopularityCounter`] traits with three
//! implementations, each implementing both:
//! - [`RedisCache`] - shared Redis store for multi-instance deployments
//! - [`MemoryCache`] - in-process store for a single instance and for tests
//! - [`NullCache`] - no-op store when Redis is configured but unreachable

mod counter;
mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use counter::PopularityCounter;
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
