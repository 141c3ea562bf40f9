//! Handlers for owner-only link management (update, delete).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use validator::Validate;

use crate::api::dto::message::MessageResponse;
use crate::api::dto::shorten::LinkResponse;
use crate::api::dto::update_link::UpdateUrlParams;
use crate::api::middleware::RequireIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Deletes a link owned by the caller.
///
/// # Endpoint
///
/// `DELETE /links/{short_code}`
///
/// The cache entry for the code is invalidated after the delete, so the
/// link stops resolving immediately.
///
/// # Errors
///
/// - 401 Unauthorized without a valid bearer token
/// - 404 Not Found if the code doesn't exist
/// - 403 Forbidden if the caller is not the owner (including anonymous links)
pub async fn delete_link_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<MessageResponse>, AppError> {
    state.link_service.delete(&short_code, &identity).await?;

    Ok(Json(MessageResponse::new("Link deleted")))
}

/// Points a link owned by the caller at a new URL.
///
/// # Endpoint
///
/// `PUT /links/{short_code}/update-url?new_url=https://example.org`
///
/// # Errors
///
/// - 401 Unauthorized without a valid bearer token
/// - 400 Bad Request if `new_url` is missing or invalid
/// - 404 Not Found if the code doesn't exist
/// - 403 Forbidden if the caller is not the owner
pub async fn update_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    params: Result<Query<UpdateUrlParams>, QueryRejection>,
) -> Result<Json<LinkResponse>, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let link = state
        .link_service
        .update_url(&short_code, &params.new_url, &identity)
        .await?;

    Ok(Json(link.into()))
}
