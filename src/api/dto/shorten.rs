//! DTOs for the shorten endpoint and link responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Body or query parameters for `POST /links/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to redirect to (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Optional caller-chosen short code.
    #[validate(length(min = 3, max = 32, message = "Alias must be between 3 and 32 characters"))]
    pub custom_alias: Option<String>,

    /// Optional expiry. After this time the link answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A link as returned by shorten and update.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            owner_id: link.owner_id,
            expires_at: link.expires_at,
        }
    }
}
