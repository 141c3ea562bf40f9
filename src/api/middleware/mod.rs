//! HTTP middleware and extractors for request processing and protection.
//!
//! Provides bearer identity extraction, rate limiting and request tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;

pub use auth::{MaybeIdentity, RequireIdentity};
