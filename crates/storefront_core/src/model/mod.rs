//! Domain model for storefront entities.
//!
//! # Responsibility
//! - Define canonical, identity-bearing data structures used by core logic.
//! - Keep construction-time validation inside entity factories.
//!
//! # Invariants
//! - Every entity is identified by a nominal id type unique to its kind.
//! - Entity equality is identity equality; other fields never participate.
//! - Identity is immutable after construction.

use std::fmt::Display;

pub mod currency;
pub mod session;

/// Base abstraction shared by all identity-bearing domain objects.
///
/// The persistence layer only ever reads the identity; it never mutates an
/// entity. Mappers produce new instances from persisted data.
pub trait Entity {
    /// Nominal identity type for this entity kind.
    type Id: Clone + Eq + Display;

    /// Returns this entity's identity.
    fn id(&self) -> &Self::Id;
}
