//! Background worker applying visit events to the durable store.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;

/// Number of retries after the first failed write.
const MAX_RETRIES: usize = 2;

/// Consumes visit events until every sender is dropped.
///
/// Each event is written with exponential backoff (10ms, 100ms). An event that
/// still fails is logged and dropped; durable visit counts are best-effort and
/// never block or fail a redirect.
pub async fn run_visit_worker<L>(mut rx: mpsc::Receiver<VisitEvent>, links: Arc<L>)
where
    L: LinkRepository + ?Sized,
{
    info!("Visit worker running");

    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(MAX_RETRIES);

        let result = Retry::start(strategy, || {
            links.record_visit(&event.short_code, event.visited_at)
        })
        .await;

        match result {
            Ok(true) => debug!(short_code = %event.short_code, "Visit recorded"),
            Ok(false) => debug!(short_code = %event.short_code, "Visit for deleted link ignored"),
            Err(e) => error!(short_code = %event.short_code, error = %e, "Failed to record visit"),
        }
    }

    info!("Visit worker stopped");
}
