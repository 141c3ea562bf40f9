//! Handler for lookup by original URL.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::search::{SearchParams, SearchResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Finds the short code for an original URL.
///
/// # Endpoint
///
/// `GET /links/url/search?original_url=https://example.com`
///
/// The match is exact. When several links share the URL, the oldest wins.
///
/// # Errors
///
/// Returns 404 Not Found if no link points at the URL.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let link = state.link_service.search(&params.original_url).await?;

    Ok(Json(SearchResponse {
        short_code: link.short_code,
    }))
}
