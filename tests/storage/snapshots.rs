//! Integration tests for world snapshots

use delver_foundation::{ActorId, ArtifactId, RoomId};
use delver_storage::{DataBag, Snapshot, World};
use serde_json::json;

use crate::demo;

#[test]
fn snapshots_rebuild_the_same_world() {
    let (_, mut world) = demo();
    world
        .move_artifact_to_inventory(ArtifactId(1), ActorId::PLAYER)
        .unwrap();
    let mut data = DataBag::new();
    data.insert("lamp_lit".to_string(), json!(true));
    let snapshot = world.snapshot(12, data);

    let rebuilt = World::from_snapshot(snapshot.clone()).unwrap();
    assert_eq!(rebuilt.snapshot(12, snapshot.data.clone()), snapshot);
    assert_eq!(rebuilt.player_room(), Some(RoomId(1)));
}

#[test]
fn snapshots_survive_message_pack() {
    let (_, world) = demo();
    let snapshot = world.snapshot(3, DataBag::new());
    let bytes = rmp_serde::to_vec_named(&snapshot).unwrap();
    let back: Snapshot = rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn derived_sets_are_recomputed() {
    let (_, world) = demo();
    let snapshot = world.snapshot(0, DataBag::new());
    let rebuilt = World::from_snapshot(snapshot).unwrap();
    assert_eq!(rebuilt.artifacts.visible(), world.artifacts.visible());
    assert_eq!(rebuilt.monsters.visible(), world.monsters.visible());
}

#[test]
fn snapshots_without_a_player_are_rejected() {
    let (_, world) = demo();
    let mut snapshot = world.snapshot(0, DataBag::new());
    snapshot.monsters.retain(|m| !m.id.is_player());
    assert!(World::from_snapshot(snapshot).is_err());
}
