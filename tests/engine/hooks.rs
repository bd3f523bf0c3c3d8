//! Integration tests for adventure hooks

use std::cell::RefCell;
use std::rc::Rc;

use delver_engine::{Event, HookResult};
use delver_foundation::{ActorId, ArtifactId, MonsterId, RoomId, Style};
use delver_storage::Location;

use crate::demo_game;

const TORCH: ArtifactId = ArtifactId(1);
const GUARD: MonsterId = MonsterId(1);

#[test]
fn a_veto_stops_the_default_behavior() {
    let mut game = demo_game();
    game.hooks.register("beforeGet", |game, _| {
        game.history.write("The torch is bolted to the signpost.", Style::Normal);
        HookResult::Veto
    });
    game.input("get torch");
    assert!(game.history.contains("The torch is bolted to the signpost."));
    assert_eq!(
        game.world.artifacts.get(TORCH).unwrap().location,
        Location::Room(RoomId(1))
    );
}

#[test]
fn hooks_see_the_event_that_fired() {
    let mut game = demo_game();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    game.hooks.register("afterGet", move |_, event| {
        log.borrow_mut().push(event.clone());
        HookResult::Continue
    });
    game.input("get torch");
    assert_eq!(
        *seen.borrow(),
        [Event::AfterGet {
            arg: "torch".to_string(),
            artifact: TORCH,
        }]
    );
}

#[test]
fn replaced_odds_decide_the_hit() {
    let mut game = demo_game();
    game.move_player(RoomId(3), false).unwrap();
    game.hooks.register("attackOdds", |_, event| match event {
        Event::AttackOdds { attacker, .. } if attacker.is_player() => HookResult::Replace(0),
        _ => HookResult::Continue,
    });
    game.dice.script([10]);
    game.input("attack guard");
    assert_eq!(game.world.monsters.get(GUARD).unwrap().damage, 0);
}

#[test]
fn vetoing_a_death_keeps_the_monster_alive() {
    let mut game = demo_game();
    game.move_player(RoomId(3), false).unwrap();
    game.hooks.register("death", |game, event| match event {
        Event::Death { actor, .. } if *actor == ActorId::Monster(GUARD) => {
            game.history.write("The guard refuses to fall.", Style::Normal);
            HookResult::Veto
        }
        _ => HookResult::Continue,
    });
    game.dice.script([10, 50]);
    game.input("attack guard");

    let guard = game.world.monsters.get(GUARD).unwrap();
    assert!(guard.is_alive());
    assert_eq!(guard.damage, guard.hardiness);
    assert!(game.history.contains("The guard refuses to fall."));
    assert_eq!(game.world.artifacts.get(ArtifactId(40)).unwrap().location, Location::Nowhere);
}

#[test]
fn vetoing_the_exit_keeps_playing() {
    let mut game = demo_game();
    game.hooks.register("exit", |game, _| {
        game.history.write("You can't leave without the treasure.", Style::Normal);
        HookResult::Veto
    });
    game.input("w");
    assert!(!game.is_over());
    assert!(game.history.contains("You can't leave without the treasure."));
}
