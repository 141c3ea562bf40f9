//! Redirect resolution with popularity-gated caching.
//!
//! The hot path for `GET /links/{short_code}`:
//!
//! 1. Cache lookup. A hit is returned immediately; the popularity counter and
//!    the durable store are not touched.
//! 2. On a miss, the popularity counter is incremented.
//! 3. The durable store is queried. A missing link is `NotFound`, an expired
//!    one is `Gone`.
//! 4. If the counter has reached the promotion threshold, the target is
//!    written to the cache with a TTL.
//!
//! Cache and counter failures degrade to the durable path. Durable store
//! failures are reported as `StoreUnavailable`.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::promotion::PromotionPolicy;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, PopularityCounter};

const CACHE_HITS_TOTAL: &str = "redirect_cache_hits_total";
const CACHE_MISSES_TOTAL: &str = "redirect_cache_misses_total";
const PROMOTIONS_TOTAL: &str = "redirect_promotions_total";
const CACHE_ERRORS_TOTAL: &str = "redirect_cache_errors_total";
const VISIT_EVENTS_DROPPED_TOTAL: &str = "visit_events_dropped_total";

/// Where a resolved target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFrom {
    Cache,
    Store,
}

/// Outcome of a successful redirect lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub original_url: String,
    pub source: ResolvedFrom,
    /// True if this request wrote the target into the cache.
    pub promoted: bool,
}

/// Resolves short codes to their targets for the redirect endpoint.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    links: Arc<L>,
    cache: Arc<dyn CacheService>,
    counter: Arc<dyn PopularityCounter>,
    policy: PromotionPolicy,
    visits: Option<mpsc::Sender<VisitEvent>>,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    /// Creates a redirect service.
    ///
    /// `visits` is the sending half of the visit worker's queue; pass `None`
    /// to disable durable visit tracking.
    pub fn new(
        links: Arc<L>,
        cache: Arc<dyn CacheService>,
        counter: Arc<dyn PopularityCounter>,
        policy: PromotionPolicy,
        visits: Option<mpsc::Sender<VisitEvent>>,
    ) -> Self {
        Self {
            links,
            cache,
            counter,
            policy,
            visits,
        }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    /// Resolves `short_code` to the URL to redirect to.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the durable store has no such link
    /// - [`AppError::Gone`] if the link has expired
    /// - [`AppError::StoreUnavailable`] if the cache missed and the durable
    ///   store could not be reached
    pub async fn resolve(&self, short_code: &str) -> Result<Resolution, AppError> {
        match self.cache.get_url(short_code).await {
            Ok(Some(original_url)) => {
                counter!(CACHE_HITS_TOTAL).increment(1);
                self.record_visit(short_code);
                return Ok(Resolution {
                    original_url,
                    source: ResolvedFrom::Cache,
                    promoted: false,
                });
            }
            Ok(None) => {
                counter!(CACHE_MISSES_TOTAL).increment(1);
            }
            Err(e) => {
                counter!(CACHE_ERRORS_TOTAL, "op" => "get").increment(1);
                warn!(short_code, error = %e, "Cache lookup failed, falling back to store");
            }
        }

        let count = match self.counter.increment(short_code).await {
            Ok(count) => Some(count),
            Err(e) => {
                counter!(CACHE_ERRORS_TOTAL, "op" => "increment").increment(1);
                warn!(short_code, error = %e, "Popularity counter unavailable, skipping promotion");
                None
            }
        };

        let link = self
            .links
            .get_by_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": short_code }))
            })?;

        let now = Utc::now();
        if link.is_expired_at(now) {
            return Err(AppError::gone(
                "Short link has expired",
                json!({ "code": short_code, "expires_at": link.expires_at }),
            ));
        }

        let mut promoted = false;
        if let Some(count) = count
            && self.policy.should_promote(count)
            && let Some(ttl) = self.policy.ttl_for(&link, now)
        {
            match self
                .cache
                .set_url(short_code, &link.original_url, ttl)
                .await
            {
                Ok(()) => {
                    counter!(PROMOTIONS_TOTAL).increment(1);
                    debug!(short_code, count, ttl_secs = ttl.as_secs(), "Link promoted to cache");
                    promoted = true;
                }
                Err(e) => {
                    counter!(CACHE_ERRORS_TOTAL, "op" => "set").increment(1);
                    warn!(short_code, error = %e, "Failed to promote link to cache");
                }
            }
        }

        self.record_visit(short_code);

        Ok(Resolution {
            original_url: link.original_url,
            source: ResolvedFrom::Store,
            promoted,
        })
    }

    /// Queues a visit for the background worker without waiting.
    fn record_visit(&self, short_code: &str) {
        let Some(sender) = &self.visits else {
            return;
        };

        if let Err(e) = sender.try_send(VisitEvent::now(short_code)) {
            counter!(VISIT_EVENTS_DROPPED_TOTAL).increment(1);
            debug!(short_code, error = %e, "Visit event dropped");
        }
    }
}
