//! Domain layer containing business entities and repository contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented by the
//! infrastructure layer.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit tracking event model
//! - [`visit_worker`] - Asynchronous visit counter worker
//!
//! # Visit Processing Flow
//!
//! 1. The redirect resolver answers a request (cache hit or miss)
//! 2. A [`visit_event::VisitEvent`] is offered to a bounded channel
//! 3. [`visit_worker::run_visit_worker`] applies it with retry
//! 4. The durable `visits` / `last_visited` fields are updated via
//!    [`repositories::LinkRepository::record_visit`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
