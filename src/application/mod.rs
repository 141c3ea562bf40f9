//! Application layer services implementing business logic.
//!
//! Services consume the repository and cache traits and give handlers a
//! small API that already speaks in [`crate::error::AppError`].
//!
//! - [`services::RedirectService`] - the redirect hot path and cache promotion
//! - [`services::LinkService`] - create, update, delete, search and stats
//! - [`services::IdentityService`] - bearer token to owner resolution

pub mod services;
