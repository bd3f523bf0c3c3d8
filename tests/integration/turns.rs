//! Turns through the parser and the engine together

use delver_foundation::RoomId;
use delver_parser::Dispatch;

use crate::demo_game;

#[test]
fn walking_there_and_back() {
    let mut game = demo_game();
    let start = game.timer;

    let trailhead = game.world.rooms.get(RoomId(1)).unwrap().description.clone();
    let gate = game.world.rooms.get(RoomId(2)).unwrap().description.clone();
    assert!(!game.world.rooms.get(RoomId(2)).unwrap().seen);

    game.input("n");
    assert_eq!(game.world.player_room(), Some(RoomId(2)));
    let room = game.world.rooms.get(RoomId(2)).unwrap();
    assert!(room.visited);
    assert!(room.seen);
    assert!(game.history.contains(&gate));

    game.input("s");
    assert_eq!(game.world.player_room(), Some(RoomId(1)));
    assert_eq!(game.timer, start + 2);
    assert!(game.history.contains("Trailhead"));
    assert!(!game.history.contains(&trailhead));
    assert!(game.world.rooms.get(RoomId(1)).unwrap().seen);

    // Back again: only the name this time.
    game.input("n");
    assert!(game.history.contains("Tower Gate"));
    assert!(!game.history.contains(&gate));
}

#[test]
fn long_direction_names_work_too() {
    let mut game = demo_game();
    let dispatch = game.input("north");
    assert!(matches!(dispatch, Dispatch::Ran { .. }));
    assert_eq!(game.world.player_room(), Some(RoomId(2)));
}

#[test]
fn the_same_prefix_always_means_the_same_verb() {
    let mut game = demo_game();
    let first = game.input("inv");
    let second = game.input("inv");
    assert_eq!(first, second);
    assert!(matches!(first, Dispatch::Ran { verb, .. } if verb == "inventory"));
}

#[test]
fn ambiguous_prefixes_list_the_candidates() {
    let mut game = demo_game();
    let timer = game.timer;
    let Dispatch::Ambiguous(candidates) = game.input("ea") else {
        panic!("expected an ambiguous prefix");
    };
    assert!(candidates.contains(&"east".to_string()));
    assert!(candidates.contains(&"eat".to_string()));
    assert_eq!(game.timer, timer);
}

#[test]
fn blocked_exits_do_not_move_the_player() {
    let mut game = demo_game();
    let dispatch = game.input("s");
    assert!(matches!(dispatch, Dispatch::Refused { .. }));
    assert!(game.history.contains("You can't go that way!"));
    assert_eq!(game.world.player_room(), Some(RoomId(1)));
}
