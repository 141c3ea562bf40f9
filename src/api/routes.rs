//! Link API route configuration.

use crate::api::handlers::{
    delete_link_handler, redirect_handler, search_handler, shorten_handler, stats_handler,
    update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Read-only link routes: redirect, stats and search.
///
/// # Endpoints
///
/// - `GET /links/{short_code}`        - 307 redirect to the original URL
/// - `GET /links/{short_code}/stats`  - Link metadata, visits and popularity
/// - `GET /links/url/search`          - Short code for an exact original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/links/url/search", get(search_handler))
        .route("/links/{short_code}", get(redirect_handler))
        .route("/links/{short_code}/stats", get(stats_handler))
}

/// Routes that create or change links.
///
/// # Endpoints
///
/// - `POST   /links/shorten`                  - Create a link (owner optional)
/// - `DELETE /links/{short_code}`             - Delete an owned link
/// - `PUT    /links/{short_code}/update-url`  - Rebind an owned link
pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/links/shorten", post(shorten_handler))
        .route("/links/{short_code}", axum::routing::delete(delete_link_handler))
        .route("/links/{short_code}/update-url", put(update_url_handler))
}

/// All link routes without rate limiting, for embedding and tests.
pub fn link_routes() -> Router<AppState> {
    public_routes().merge(write_routes())
}
