//! Redis-backed cache and popularity counter.

use super::counter::PopularityCounter;
use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

const URL_KEY_PREFIX: &str = "short_url:";
const COUNT_KEY_PREFIX: &str = "short_url_count:";

/// Redis implementation of [`CacheService`] and [`PopularityCounter`].
///
/// Cache entries are written with `SET .. EX`, so expiry is owned entirely by
/// Redis. Counters use `INCR`, which is atomic across every service instance
/// sharing the Redis server.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Errors are returned to the caller; the redirect resolver decides how to
/// degrade.
#[derive(Clone)]
pub struct RedisCache {
    client: ConnectionManager,
    counter_ttl: Option<Duration>,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `counter_ttl` - optional idle expiry for popularity counters; `None`
    ///   keeps counters forever
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, counter_ttl: Option<Duration>) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            counter_ttl,
        })
    }

    fn url_key(short_code: &str) -> String {
        format!("{}{}", URL_KEY_PREFIX, short_code)
    }

    fn count_key(short_code: &str) -> String {
        format!("{}{}", COUNT_KEY_PREFIX, short_code)
    }
}

fn op_error(op: &str, short_code: &str, e: redis::RedisError) -> CacheError {
    CacheError::OperationError(format!("Redis {} failed for {}: {}", op, short_code, e))
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let url: Option<String> = conn
            .get(Self::url_key(short_code))
            .await
            .map_err(|e| op_error("GET", short_code, e))?;

        match &url {
            Some(url) => debug!("Cache HIT: {} -> {}", short_code, url),
            None => debug!("Cache MISS: {}", short_code),
        }

        Ok(url)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(Self::url_key(short_code), original_url, ttl_seconds)
            .await
            .map_err(|e| op_error("SET", short_code, e))?;

        debug!(
            "Cache SET: {} -> {} (TTL: {}s)",
            short_code, original_url, ttl_seconds
        );
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let deleted: i64 = conn
            .del(Self::url_key(short_code))
            .await
            .map_err(|e| op_error("DEL", short_code, e))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[async_trait]
impl PopularityCounter for RedisCache {
    async fn increment(&self, short_code: &str) -> CacheResult<u64> {
        let mut conn = self.client.clone();
        let key = Self::count_key(short_code);

        let count: u64 = match self.counter_ttl {
            None => conn
                .incr(&key, 1u64)
                .await
                .map_err(|e| op_error("INCR", short_code, e))?,
            Some(ttl) => {
                let (count,): (u64,) = redis::pipe()
                    .atomic()
                    .incr(&key, 1u64)
                    .expire(&key, ttl.as_secs().max(1) as i64)
                    .ignore()
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| op_error("INCR", short_code, e))?;
                count
            }
        };

        Ok(count)
    }

    async fn read(&self, short_code: &str) -> CacheResult<u64> {
        let mut conn = self.client.clone();

        let count: Option<u64> = conn
            .get(Self::count_key(short_code))
            .await
            .map_err(|e| op_error("GET", short_code, e))?;

        Ok(count.unwrap_or(0))
    }
}
