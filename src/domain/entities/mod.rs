//! Core domain entities.
//!
//! - [`Link`] - a short code to URL mapping held by the durable store
//! - [`NewLink`] - input for creating a link
//! - [`Identity`] - an authenticated caller

pub mod identity;
pub mod link;

pub use identity::Identity;
pub use link::{Link, NewLink};
