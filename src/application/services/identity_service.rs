//! Bearer token to caller identity resolution.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::Identity;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when issuing tokens, so both sides must share the secret.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves bearer tokens to identities.
///
/// Only token hashes are stored. Someone with read access to the database
/// cannot recover or forge a token without the server-side secret.
pub struct IdentityService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> IdentityService<R> {
    /// Creates a new identity service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Resolves an optional bearer token.
    ///
    /// A missing, empty, unknown or revoked token is anonymous (`Ok(None)`);
    /// callers that need an owner turn that into a 401. On success the
    /// token's `last_used_at` is refreshed, best-effort.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the token store cannot be queried.
    pub async fn resolve(&self, token: Option<&str>) -> Result<Option<Identity>, AppError> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let token_hash = hash_token(&self.signing_secret, token);

        let Some(owner_id) = self.repository.find_owner(&token_hash).await? else {
            debug!("Unknown or revoked bearer token");
            return Ok(None);
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(owner_id, error = %e, "Failed to update token last_used_at");
        }

        Ok(Some(Identity { id: owner_id }))
    }
}
