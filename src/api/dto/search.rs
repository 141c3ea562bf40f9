//! DTOs for search by original URL.

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /links/url/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub original_url: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub short_code: String,
}
