use serde::{Deserialize, Serialize};

/// Process-unique, monotonically increasing entity identifier.
///
/// Ordering of `EntityId` drives every deterministic iteration order in the
/// engine, so the derive order here is load-bearing.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse entity kind used by spatial queries and snapshots.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Fish,
    Plant,
    Food,
    Crab,
}
