//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Identity is optional: an entity that has never been persisted has no id yet.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;

    /// Whether the entity has been persisted at least once.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
