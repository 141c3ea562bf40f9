//! Business logic services for the application layer.

pub mod identity_service;
pub mod link_service;
pub mod promotion;
pub mod redirect_service;

pub use identity_service::{IdentityService, hash_token};
pub use link_service::{LinkService, LinkStats};
pub use promotion::PromotionPolicy;
pub use redirect_service::{RedirectService, Resolution, ResolvedFrom};
