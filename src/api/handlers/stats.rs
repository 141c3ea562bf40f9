//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns metadata, durable visits and popularity for a short link.
///
/// # Endpoint
///
/// `GET /links/{short_code}/stats`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "abc123",
///   "original_url": "https://example.com",
///   "owner_id": null,
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": null,
///   "visits": 12,
///   "last_visited": "2025-01-02T10:00:00Z",
///   "popularity": 5
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.stats(&short_code).await?;

    Ok(Json(stats.into()))
}
