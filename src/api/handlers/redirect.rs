//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /links/{short_code}`
///
/// Always answers `307 Temporary Redirect` so clients keep asking and the
/// popularity counter keeps seeing misses until the code is promoted.
/// See [`crate::application::services::RedirectService::resolve`] for the
/// cache and promotion flow.
///
/// # Errors
///
/// - 404 Not Found if the short code doesn't exist
/// - 410 Gone if the link has expired
/// - 503 Service Unavailable if the cache missed and the store is down
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let resolution = state.redirect_service.resolve(&short_code).await?;

    debug!(
        short_code = %short_code,
        source = ?resolution.source,
        promoted = resolution.promoted,
        "Redirect resolved"
    );

    Ok(Redirect::temporary(&resolution.original_url))
}
