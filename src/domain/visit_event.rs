//! Visit event model for asynchronous visit tracking.

use chrono::{DateTime, Utc};

/// A successful redirect waiting to be folded into the durable `visits`
/// counter.
///
/// Sent from the redirect resolver to
/// [`crate::domain::visit_worker::run_visit_worker`] over a bounded channel so
/// the redirect never waits on the durable store write.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitEvent {
    pub short_code: String,
    pub visited_at: DateTime<Utc>,
}

impl VisitEvent {
    /// Creates an event stamped with the current time.
    pub fn now(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            visited_at: Utc::now(),
        }
    }
}
