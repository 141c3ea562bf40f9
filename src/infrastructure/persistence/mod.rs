//! PostgreSQL repository implementations.
//!
//! All repositories share a single `Arc<PgPool>` and use runtime-checked
//! queries mapped through `sqlx::FromRow`.

mod pg_link_repository;
mod pg_token_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
