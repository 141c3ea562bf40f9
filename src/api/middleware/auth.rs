//! Bearer token identity extractors.
//!
//! Identity is optional on most routes: a request without a usable token is
//! anonymous. Routes that act on behalf of an owner use [`RequireIdentity`],
//! which turns anonymity into `401 Unauthorized`.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// The caller's identity, if the request carried a valid bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// A missing or malformed header, and an unknown or revoked token, all
/// resolve to `MaybeIdentity(None)`.
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = AuthBearer::from_request_parts(parts, &())
            .await
            .ok()
            .map(|AuthBearer(token)| token);

        let identity = state.identity_service.resolve(token.as_deref()).await?;

        Ok(Self(identity))
    }
}

/// An authenticated caller. Rejects anonymous requests with 401.
///
/// Adds `WWW-Authenticate: Bearer` to the rejection per RFC 6750.
#[derive(Debug, Clone, Copy)]
pub struct RequireIdentity(pub Identity);

impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeIdentity(identity) = MaybeIdentity::from_request_parts(parts, state).await?;

        identity.map(Self).ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing, invalid or revoked" }),
            )
        })
    }
}
