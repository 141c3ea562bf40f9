//! Repository trait for the durable link store.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The authoritative short code to link mapping.
///
/// Implementations must enforce `short_code` uniqueness themselves; the
/// application-level existence check in
/// [`crate::application::services::LinkService`] is only a fast-fail.
///
/// Connectivity failures must surface as [`AppError::StoreUnavailable`] and
/// never as a missing row.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be reached.
    async fn get_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the first link pointing at exactly `original_url`.
    ///
    /// Several links may share a target; the oldest one wins.
    async fn get_by_url(&self, original_url: &str) -> Result<Option<Link>, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken. The
    /// store is left unchanged in that case.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Writes the mutable fields (`original_url`, `expires_at`) of `link`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link no longer exists.
    async fn update(&self, link: &Link) -> Result<Link, AppError>;

    /// Deletes a link. Returns `Ok(false)` if it was already gone.
    async fn delete(&self, link: &Link) -> Result<bool, AppError>;

    /// Increments the durable visit counter and stamps `last_visited`.
    ///
    /// Returns `Ok(false)` if the link no longer exists.
    async fn record_visit(
        &self,
        short_code: &str,
        visited_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Returns true if the store answers a trivial query.
    async fn health_check(&self) -> bool;
}
