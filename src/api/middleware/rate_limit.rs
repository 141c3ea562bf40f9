//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

type Limiter<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Requests per second replenished for public endpoints.
const PUBLIC_PER_SECOND: u64 = 50;
const PUBLIC_BURST: u32 = 200;

/// Stricter limits for link-mutating endpoints.
const WRITE_PER_SECOND: u64 = 2;
const WRITE_BURST: u32 = 20;

fn build<K: KeyExtractor>(key_extractor: K, per_second: u64, burst: u32) -> Limiter<K> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(key_extractor)
        .per_second(per_second)
        .burst_size(burst)
        .finish()
        .expect("rate limit period and burst are non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}

/// Rate limiter for redirects, stats and search, keyed by peer IP.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> Limiter<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, PUBLIC_PER_SECOND, PUBLIC_BURST)
}

/// Rate limiter for shorten, update and delete, keyed by peer IP.
pub fn write_layer() -> Limiter<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, WRITE_PER_SECOND, WRITE_BURST)
}

/// Like [`layer`], but keyed on `X-Forwarded-For`, `X-Real-IP` or
/// `Forwarded` before falling back to the peer address.
///
/// Only safe behind a trusted reverse proxy that overwrites these headers.
pub fn proxied_layer() -> Limiter<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, PUBLIC_PER_SECOND, PUBLIC_BURST)
}

/// Like [`write_layer`], keyed on forwarded client IP headers.
pub fn proxied_write_layer() -> Limiter<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, WRITE_PER_SECOND, WRITE_BURST)
}
