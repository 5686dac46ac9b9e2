//! Ownership guard.
//!
//! Every mutable entity in CropSight is anchored to the user that created it;
//! the owner id is fixed at creation and never reassigned. This module is the
//! single place that compares an entity's recorded owner against the caller.

use cropsight_core::{DomainError, UserId};

/// Entities that belong to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

/// Check that `caller` is `owner`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn assert_owner(owner: UserId, caller: UserId) -> Result<(), DomainError> {
    if owner == caller {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Convenience form of [`assert_owner`] for [`Owned`] entities.
pub fn assert_owns<E: Owned>(entity: &E, caller: UserId) -> Result<(), DomainError> {
    assert_owner(entity.owner_id(), caller)
}
