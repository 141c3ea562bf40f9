//! Authenticated caller identity.

/// An authenticated caller, resolved from a bearer token.
///
/// The id is opaque to this service; it is only compared against
/// [`crate::domain::entities::Link::owner_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
}
