//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use validator::Validate;

use crate::api::dto::shorten::{LinkResponse, ShortenRequest};
use crate::api::middleware::MaybeIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /links/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "custom_alias": "my-link",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// The same fields are accepted as query parameters when the request has no
/// body (`POST /links/shorten?original_url=...&custom_alias=...`). A JSON
/// body wins when both are present.
///
/// `custom_alias` and `expires_at` are optional. When the request carries a
/// valid bearer token the caller becomes the owner; otherwise the link is
/// anonymous and can never be updated or deleted.
///
/// # Response
///
/// ```json
/// {
///   "short_code": "my-link",
///   "original_url": "https://example.com/some/long/path",
///   "owner_id": 42,
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body or query cannot be parsed, validation
/// fails or the alias is taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    MaybeIdentity(owner): MaybeIdentity,
    query: Result<Query<ShortenRequest>, QueryRejection>,
    body: Result<Option<Json<ShortenRequest>>, JsonRejection>,
) -> Result<Json<LinkResponse>, AppError> {
    let payload = match body? {
        Some(Json(payload)) => payload,
        None => query?.0,
    };
    payload.validate()?;

    let link = state
        .link_service
        .create(
            &payload.original_url,
            payload.custom_alias.as_deref(),
            payload.expires_at,
            owner,
        )
        .await?;

    Ok(Json(link.into()))
}
