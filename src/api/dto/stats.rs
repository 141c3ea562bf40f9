//! DTO for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkStats;

/// Statistics for a single short link.
///
/// `visits` is the durable visit count; `popularity` is the promotion
/// counter and may differ from it (cache hits do not increment it, lookups
/// of unknown codes do).
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub visits: i64,
    pub last_visited: Option<DateTime<Utc>>,
    pub popularity: u64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        let link = stats.link;
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            owner_id: link.owner_id,
            created_at: link.created_at,
            expires_at: link.expires_at,
            visits: link.visits,
            last_visited: link.last_visited,
            popularity: stats.popularity,
        }
    }
}
