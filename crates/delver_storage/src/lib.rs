//! World model for Delver.
//!
//! This crate provides:
//! - [`Room`], [`Artifact`], [`Monster`], [`Effect`] - Entity records loaded from adventure data
//! - [`Location`] - The single place an artifact can be
//! - Repositories - Id-unique entity stores with derived "in the player's room" sets
//! - [`World`] - All entities together, with the queries that need more than one store
//! - [`AdventureData`] - The validating adventure-file loader
//! - [`Snapshot`] - The persistent state used by save and restore

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adventure;
pub mod artifact;
pub mod effect;
pub mod monster;
pub mod repository;
pub mod room;
pub mod snapshot;
pub mod world;

// Re-export main types for convenience
pub use adventure::{AdventureData, AdventureInfo, PlayerData};
pub use artifact::{ArmorType, Artifact, ArtifactKind, Location, Lock, WeaponType};
pub use effect::Effect;
pub use monster::{
    Armament, CombatCode, Friendliness, Monster, PlayerProfile, Reaction, Spell, SpellBook, Status,
    WeaponAbilities,
};
pub use repository::{ArtifactRepository, EffectRepository, MonsterRepository, RoomRepository};
pub use room::{EXIT, EXIT_SILENT, ExitTarget, Room, RoomExit};
pub use snapshot::{SaveSummary, Snapshot};
pub use world::World;

/// Free-form adventure values attached to entities and to the game.
pub type DataBag = std::collections::BTreeMap<String, serde_json::Value>;

#[cfg(test)]
mod proptests {
    use delver_foundation::{ActorId, ArtifactId, RoomId};
    use proptest::prelude::*;

    use super::*;

    fn location() -> impl Strategy<Value = Location> {
        prop_oneof![
            Just(Location::Nowhere),
            (1u32..4).prop_map(|r| Location::Room(RoomId(r))),
            Just(Location::Carried(ActorId::PLAYER)),
            (1u32..4).prop_map(|a| Location::Contained(ArtifactId(a))),
        ]
    }

    proptest! {
        #[test]
        fn relocation_leaves_exactly_one_place(moves in prop::collection::vec(location(), 1..20)) {
            let mut artifact = Artifact::new(ArtifactId(9), "coin", ArtifactKind::Treasure)
                .at(Location::Carried(ActorId::PLAYER));
            artifact.is_worn = true;
            for target in moves {
                artifact.relocate(target);
                let places = [
                    artifact.location.room().is_some(),
                    artifact.location.carrier().is_some(),
                    artifact.location.container().is_some(),
                ];
                prop_assert!(places.iter().filter(|p| **p).count() <= 1);
                prop_assert_eq!(artifact.location, target);
                if artifact.location.carrier().is_none() {
                    prop_assert!(!artifact.is_worn);
                }
            }
        }
    }
}
