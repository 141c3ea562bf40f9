//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain and application layers.
//!
//! - [`cache`] - Cache layer and popularity counter (Redis, in-memory, no-op)
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
