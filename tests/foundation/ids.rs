//! Integration tests for entity ids and actor addressing

use delver_foundation::{ActorId, MemberKey, MonsterId, RoomId};

#[test]
fn player_is_monster_zero() {
    assert!(ActorId::PLAYER.is_player());
    assert!(MonsterId(0).is_player());
    assert!(!MonsterId(3).is_player());
}

#[test]
fn members_point_at_their_group() {
    let key = MemberKey::new(MonsterId(7), 2);
    let actor = ActorId::Member(key);
    assert_eq!(actor.monster(), MonsterId(7));
    assert_eq!(actor.member(), Some(key));
    assert!(!actor.is_player());
    assert_eq!(key.to_string(), "7[2]");
    assert_eq!(actor.to_string(), "member 7[2]");
}

#[test]
fn ids_round_trip_through_raw_numbers() {
    let room = RoomId::from(12);
    assert_eq!(room.get(), 12);
    assert_eq!(RoomId::new(12), room);
    assert_eq!(ActorId::Monster(MonsterId(4)).member(), None);
}

#[test]
fn actors_serialize_as_tagged_ids() {
    let json = serde_json::to_string(&ActorId::Monster(MonsterId(3))).unwrap();
    assert_eq!(json, r#"{"monster":3}"#);
    let back: ActorId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ActorId::Monster(MonsterId(3)));
}
