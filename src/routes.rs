//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /health`                         - Health check: DB, cache, visit queue
//! - `POST   /links/shorten`                  - Create a link
//! - `GET    /links/url/search`               - Find a code by original URL
//! - `GET    /links/{short_code}`             - Redirect
//! - `DELETE /links/{short_code}`             - Delete (owner only)
//! - `PUT    /links/{short_code}/update-url`  - Rebind (owner only)
//! - `GET    /links/{short_code}/stats`       - Statistics
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on writes
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{public_routes, write_routes};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads the client IP from
///   forwarding headers instead of the peer socket address; enable only
///   behind a trusted reverse proxy
///
/// The returned service needs `ConnectInfo<SocketAddr>`; serve it with
/// `into_make_service_with_connect_info`.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let (public, write) = if behind_proxy {
        (
            public_routes().layer(rate_limit::proxied_layer()),
            write_routes().layer(rate_limit::proxied_write_layer()),
        )
    } else {
        (
            public_routes().layer(rate_limit::layer()),
            write_routes().layer(rate_limit::write_layer()),
        )
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(public)
        .merge(write)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
