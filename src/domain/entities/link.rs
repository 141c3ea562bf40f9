//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};

use super::Identity;

/// A shortened URL mapping as held by the durable store.
///
/// `visits` and `last_visited` are maintained asynchronously by the visit
/// worker and are independent of the cache-resident popularity counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub visits: i64,
    pub last_visited: Option<DateTime<Utc>>,
}

impl Link {
    /// Returns true if the link has an expiry that is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if `identity` owns this link.
    ///
    /// Anonymous links have no owner and are owned by nobody.
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.owner_id == Some(identity.id)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(owner_id: Option<i64>, expires_at: Option<DateTime<Utc>>) -> Link {
        Link {
            id: 1,
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            owner_id,
            created_at: Utc::now(),
            expires_at,
            visits: 0,
            last_visited: None,
        }
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link = link(None, None);
        assert!(!link.is_expired());
        assert!(!link.is_expired_at(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn test_link_is_expired() {
        let link = link(None, Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_expires_exactly_at_deadline() {
        let deadline = Utc::now();
        let link = link(None, Some(deadline));
        assert!(link.is_expired_at(deadline));
        assert!(!link.is_expired_at(deadline - Duration::milliseconds(1)));
    }

    #[test]
    fn test_is_owned_by() {
        let owned = link(Some(7), None);
        assert!(owned.is_owned_by(&Identity { id: 7 }));
        assert!(!owned.is_owned_by(&Identity { id: 8 }));
    }

    #[test]
    fn test_anonymous_link_is_owned_by_nobody() {
        let anonymous = link(None, None);
        for id in [0, 1, i64::MAX] {
            assert!(!anonymous.is_owned_by(&Identity { id }));
        }
    }
}
