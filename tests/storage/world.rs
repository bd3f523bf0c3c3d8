//! Integration tests for world queries: light, exits, containers

use delver_foundation::{ActorId, ArtifactId, RoomId};
use delver_storage::{ArtifactKind, Location};

use crate::demo;

const TORCH: ArtifactId = ArtifactId(1);
const CHEST: ArtifactId = ArtifactId(2);
const COINS: ArtifactId = ArtifactId(3);
const DOOR: ArtifactId = ArtifactId(30);

fn move_player(world: &mut delver_storage::World, room: u32) {
    world.player_mut().unwrap().room = Some(RoomId(room));
    world.update_visible();
}

#[test]
fn dark_rooms_need_a_lit_torch() {
    let (_, mut world) = demo();
    move_player(&mut world, 4);
    assert!(!world.has_light());

    world
        .artifacts
        .relocate(TORCH, Location::Carried(ActorId::PLAYER))
        .unwrap();
    assert!(!world.has_light());
    world.artifacts.get_mut(TORCH).unwrap().is_lit = true;
    assert!(world.has_light());
}

#[test]
fn closed_doors_block_exits() {
    let (_, mut world) = demo();
    let gate = RoomId(2);
    let good: Vec<String> = world
        .rooms
        .get(gate)
        .unwrap()
        .good_exits(&world.artifacts)
        .into_iter()
        .map(|e| e.direction.clone())
        .collect();
    assert!(!good.contains(&"n".to_string()));
    assert!(good.contains(&"s".to_string()));

    world.artifacts.get_mut(DOOR).unwrap().is_open = true;
    let room = world.rooms.get(gate).unwrap();
    assert!(room.exit("n").unwrap().is_open(&world.artifacts));
    assert_eq!(room.good_exits(&world.artifacts).len(), 3);
}

#[test]
fn visibility_follows_the_player() {
    let (_, mut world) = demo();
    assert!(world.artifacts.visible().contains(&TORCH));
    move_player(&mut world, 2);
    assert!(!world.artifacts.visible().contains(&TORCH));
    assert!(world.artifacts.in_player_room().contains(&DOOR));
    assert!(!world.artifacts.visible().contains(&DOOR));
}

#[test]
fn containers_hold_their_contents() {
    let (_, mut world) = demo();
    assert_eq!(world.artifacts.contents(CHEST), vec![COINS]);
    assert_eq!(world.artifact_room(COINS), Some(RoomId(4)));
    let to = world.remove_from_container(COINS).unwrap();
    assert_eq!(to, Location::Carried(ActorId::PLAYER));
    assert!(world.artifacts.contents(CHEST).is_empty());
}

#[test]
fn weight_counts_what_is_carried() {
    let (_, mut world) = demo();
    let before = world.weight_carried(ActorId::PLAYER);
    world.move_artifact_to_inventory(TORCH, ActorId::PLAYER).unwrap();
    assert_eq!(world.weight_carried(ActorId::PLAYER), before + 1);
    assert_eq!(
        world.artifacts.get(TORCH).unwrap().kind,
        ArtifactKind::LightSource
    );
}
