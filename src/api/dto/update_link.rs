//! DTO for the link update endpoint.

use serde::Deserialize;
use validator::Validate;

/// Query parameters for `PUT /links/{short_code}/update-url`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlParams {
    /// New destination URL for this link.
    #[validate(url(message = "Invalid URL format"))]
    pub new_url: String,
}
