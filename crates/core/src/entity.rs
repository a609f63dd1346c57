//! Entity trait: catalog objects identified by a numeric id.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Sort entities ascending by id.
///
/// The sort is stable: entities sharing an id keep their original relative order.
pub fn sort_by_id<E: Entity>(entities: &mut [E]) {
    entities.sort_by_key(Entity::id);
}
