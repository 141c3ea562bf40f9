//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` against the durable store
/// 2. **Cache**: backend ping (always ok for the in-process and null caches)
/// 3. **Visit queue**: channel open, or tracking disabled
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = if state.link_service.store_healthy().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Durable store unreachable")
    };

    let cache = if state.link_service.cache_healthy().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Cache backend unreachable")
    };

    let visit_queue = check_visit_queue(&state);

    let all_healthy = database.is_ok() && cache.is_ok() && visit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            cache,
            visit_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    match &state.visit_sender {
        None => CheckStatus::ok("Visit tracking disabled"),
        Some(sender) if sender.is_closed() => CheckStatus::error("Visit queue is closed"),
        Some(sender) => CheckStatus::ok(format!(
            "Free slots: {}/{}",
            sender.capacity(),
            sender.max_capacity()
        )),
    }
}
