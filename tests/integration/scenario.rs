//! A short playthrough: torch, door, guard.

use std::cell::Cell;
use std::rc::Rc;

use delver_engine::{Event, HookResult};
use delver_foundation::{ActorId, ArtifactId, MonsterId, RoomId};
use delver_parser::Dispatch;
use delver_storage::{Location, Status};

use crate::demo_game;

const TORCH: ArtifactId = ArtifactId(1);
const DOOR: ArtifactId = ArtifactId(30);
const DEAD_GUARD: ArtifactId = ArtifactId(40);
const GUARD: MonsterId = MonsterId(1);

fn ran(dispatch: &Dispatch) -> bool {
    matches!(dispatch, Dispatch::Ran { .. })
}

#[test]
fn up_the_trail_and_past_the_guard() {
    let mut game = demo_game();
    let deaths = Rc::new(Cell::new(0));
    let counter = Rc::clone(&deaths);
    game.hooks.register("death", move |_, event| {
        if let Event::Death { actor, .. } = event {
            assert_eq!(*actor, ActorId::Monster(GUARD));
            counter.set(counter.get() + 1);
        }
        HookResult::Continue
    });

    assert!(ran(&game.input("get torch")));
    assert!(game.history.contains("torch taken."));
    assert_eq!(
        game.world.artifacts.get(TORCH).unwrap().location,
        Location::Carried(ActorId::PLAYER)
    );

    assert!(ran(&game.input("n")));
    assert_eq!(game.world.player_room(), Some(RoomId(2)));

    assert!(matches!(game.input("n"), Dispatch::Refused { .. }));
    assert!(game.history.contains("The oak door blocks your way!"));
    assert_eq!(game.world.player_room(), Some(RoomId(2)));

    assert!(ran(&game.input("open door")));
    assert!(game.history.contains("oak door opened."));
    assert!(game.world.artifacts.get(DOOR).unwrap().is_open);

    assert!(ran(&game.input("n")));
    assert_eq!(game.world.player_room(), Some(RoomId(3)));
    assert!(game.in_battle);

    // A plain hit, then far more damage than the guard can take.
    game.dice.script([10, 50]);
    assert!(ran(&game.input("attack guard")));

    assert_eq!(deaths.get(), 1);
    let guard = game.world.monsters.get(GUARD).unwrap();
    assert_eq!(guard.status, Status::Dead);
    assert_eq!(guard.room, None);
    assert_eq!(
        game.world.artifacts.get(DEAD_GUARD).unwrap().location,
        Location::Room(RoomId(3))
    );
    assert!(!game.in_battle);
    assert!(game.statistics.damage_dealt > 0);

    assert!(ran(&game.input("u")));
    assert_eq!(game.world.player_room(), Some(RoomId(5)));
    assert_eq!(deaths.get(), 1);
}
