//! Integration tests for adventure data loading

use delver_foundation::{ActorId, ArtifactId, ErrorKind, MonsterId, RoomId};
use delver_storage::{AdventureData, Armament, ArtifactKind, ExitTarget, Friendliness, Location};

use crate::demo;

// =============================================================================
// The Demo Adventure
// =============================================================================

#[test]
fn demo_metadata() {
    let (info, world) = demo();
    assert_eq!(info.name, "The Old Watchtower");
    assert!(info.intro_text.is_some());
    assert_eq!(world.rooms.len(), 5);
    assert_eq!(world.player_room(), Some(RoomId(1)));
    assert_eq!(world.player().unwrap().name, "Traveler");
}

#[test]
fn the_player_readies_what_they_brought() {
    let (_, world) = demo();
    let player = world.player().unwrap();
    assert_eq!(player.armament, Armament::Wields(ArtifactId(100)));
    let sword = world.artifacts.get(ArtifactId(100)).unwrap();
    assert!(sword.player_brought);
    assert!(sword.seen);
    assert_eq!(sword.location, Location::Carried(ActorId::PLAYER));
}

#[test]
fn monster_weapons_are_carried() {
    let (_, world) = demo();
    let guard = world.monsters.get(MonsterId(1)).unwrap();
    assert_eq!(guard.friendliness, Friendliness::Hostile);
    assert_eq!(guard.armament, Armament::Wields(ArtifactId(4)));
    assert_eq!(
        world.artifacts.get(ArtifactId(4)).unwrap().location,
        Location::Carried(ActorId::Monster(MonsterId(1)))
    );
}

#[test]
fn dead_bodies_follow_the_base_id() {
    let (_, world) = demo();
    assert_eq!(world.monsters.get(MonsterId(1)).unwrap().dead_body_id, Some(ArtifactId(40)));
    assert_eq!(world.monsters.get(MonsterId(2)).unwrap().dead_body_id, Some(ArtifactId(41)));
    assert_eq!(
        world.artifacts.get(ArtifactId(40)).unwrap().kind,
        ArtifactKind::DeadBody
    );
}

#[test]
fn groups_unpack_into_members() {
    let (_, world) = demo();
    let rats = MonsterId(2);
    assert!(world.monsters.has_members(rats));
    assert_eq!(world.monsters.member_keys(rats).len(), 3);
    assert!(
        world
            .monsters
            .members_of(rats)
            .all(|m| m.room == Some(RoomId(4)) && m.count == 1)
    );
}

#[test]
fn exits_to_the_outside_world() {
    let (_, world) = demo();
    let trailhead = world.rooms.get(RoomId(1)).unwrap();
    assert_eq!(trailhead.exit("w").unwrap().room_to, ExitTarget::Exit);
    assert_eq!(trailhead.exit("n").unwrap().room_to, ExitTarget::Room(RoomId(2)));
    assert!(trailhead.exit("e").is_none());
}

// =============================================================================
// Bad Data
// =============================================================================

#[test]
fn duplicate_rooms_are_rejected() {
    let json = r#"{
        "name": "Broken",
        "rooms": [
            {"id": 1, "name": "A", "description": "a"},
            {"id": 1, "name": "B", "description": "b"}
        ],
        "player": {"name": "P", "hardiness": 10, "agility": 10, "charisma": 10}
    }"#;
    let err = AdventureData::from_json(json).unwrap().build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateId { entity: "room", .. }));
}

#[test]
fn dangling_exits_are_rejected() {
    let json = r#"{
        "name": "Broken",
        "rooms": [
            {"id": 1, "name": "A", "description": "a", "exits": [{"direction": "n", "room_to": 9}]}
        ],
        "player": {"name": "P", "hardiness": 10, "agility": 10, "charisma": 10}
    }"#;
    let err = AdventureData::from_json(json).unwrap().build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingReference { .. }));
}

#[test]
fn unknown_fields_are_rejected() {
    let json = r#"{
        "name": "Broken",
        "rooms": [{"id": 1, "name": "A", "description": "a", "smell": "damp"}],
        "player": {"name": "P", "hardiness": 10, "agility": 10, "charisma": 10}
    }"#;
    assert!(AdventureData::from_json(json).is_err());
}
