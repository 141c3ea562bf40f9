//! Cache promotion policy.
//!
//! A short code is promoted into the cache once its popularity counter
//! reaches a static threshold. The decision is a pure comparison, so
//! re-evaluating it on every later miss is harmless: the entry is rewritten
//! with the same value and its TTL restarts from that write.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::entities::Link;

pub const DEFAULT_THRESHOLD: u64 = 3;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Entries shorter-lived than this are not worth writing.
const MIN_CACHE_TTL: Duration = Duration::from_secs(1);

/// Returns true once `count` has reached `threshold`.
pub fn should_promote(count: u64, threshold: u64) -> bool {
    count >= threshold
}

/// Threshold and TTL applied on the redirect miss path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPolicy {
    threshold: u64,
    cache_ttl: Duration,
}

impl PromotionPolicy {
    pub fn new(threshold: u64, cache_ttl: Duration) -> Self {
        Self {
            threshold,
            cache_ttl,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn should_promote(&self, count: u64) -> bool {
        should_promote(count, self.threshold)
    }

    /// TTL to use when caching `link` at `now`.
    ///
    /// Clamped to the time left before the link expires, so a cached target
    /// is never served past `expires_at`. Returns `None` when less than a
    /// second remains.
    pub fn ttl_for(&self, link: &Link, now: DateTime<Utc>) -> Option<Duration> {
        let ttl = match link.expires_at {
            None => self.cache_ttl,
            Some(expires_at) => {
                let remaining = (expires_at - now).to_std().ok()?;
                self.cache_ttl.min(remaining)
            }
        };

        (ttl >= MIN_CACHE_TTL).then_some(ttl)
    }
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn link_expiring(expires_at: Option<DateTime<Utc>>) -> Link {
        Link {
            id: 1,
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            owner_id: None,
            created_at: Utc::now(),
            expires_at,
            visits: 0,
            last_visited: None,
        }
    }

    #[test]
    fn test_should_promote_at_threshold() {
        assert!(!should_promote(0, 3));
        assert!(!should_promote(2, 3));
        assert!(should_promote(3, 3));
    }

    #[test]
    fn test_promotion_is_monotone() {
        let policy = PromotionPolicy::default();
        let first = (0..100).find(|&n| policy.should_promote(n)).unwrap();

        assert_eq!(first, DEFAULT_THRESHOLD);
        assert!((first..first + 1000).all(|n| policy.should_promote(n)));
    }

    #[test]
    fn test_threshold_one_promotes_first_miss() {
        let policy = PromotionPolicy::new(1, DEFAULT_CACHE_TTL);
        assert!(policy.should_promote(1));
    }

    #[test]
    fn test_defaults() {
        let policy = PromotionPolicy::default();
        assert_eq!(policy.threshold(), 3);
        assert_eq!(policy.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_ttl_for_link_without_expiry() {
        let policy = PromotionPolicy::default();
        let ttl = policy.ttl_for(&link_expiring(None), Utc::now());
        assert_eq!(ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_ttl_clamped_to_expiry() {
        let policy = PromotionPolicy::default();
        let now = Utc::now();
        let link = link_expiring(Some(now + TimeDelta::seconds(10)));

        assert_eq!(policy.ttl_for(&link, now), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_ttl_not_clamped_when_expiry_is_far() {
        let policy = PromotionPolicy::default();
        let now = Utc::now();
        let link = link_expiring(Some(now + TimeDelta::days(1)));

        assert_eq!(policy.ttl_for(&link, now), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_no_ttl_when_about_to_expire() {
        let policy = PromotionPolicy::default();
        let now = Utc::now();

        let almost = link_expiring(Some(now + TimeDelta::milliseconds(500)));
        assert_eq!(policy.ttl_for(&almost, now), None);

        let expired = link_expiring(Some(now - TimeDelta::seconds(1)));
        assert_eq!(policy.ttl_for(&expired, now), None);
    }
}
