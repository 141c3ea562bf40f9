//! # hotlink
//!
//! A URL shortener that keeps hot links in a time-limited cache.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits, visit events
//! - **Application Layer** ([`application`]) - Redirect resolution, promotion policy, link lifecycle
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL repositories, Redis and in-process caches
//! - **API Layer** ([`api`]) - REST handlers, DTOs, extractors and middleware
//!
//! ## Redirect path
//!
//! A redirect first asks the cache. On a miss it bumps the code's popularity
//! counter and reads the durable store; once the counter reaches the
//! promotion threshold the target is cached for a fixed TTL. Cache failures
//! fall back to the durable store; durable store failures surface as 503.
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        IdentityService, LinkService, PromotionPolicy, RedirectService,
    };
    pub use crate::domain::entities::{Identity, Link, NewLink};
    pub use crate::domain::repositories::{ApiToken, LinkRepository, TokenRepository};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{CacheService, MemoryCache, PopularityCounter};
    pub use crate::state::AppState;
}
