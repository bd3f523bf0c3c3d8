//! Integration tests for the game lifecycle

use delver_engine::{Game, GameConfig, GameState};
use delver_foundation::RoomId;
use delver_parser::Dispatch;

use crate::demo_game;

#[test]
fn the_intro_comes_before_play() {
    let mut game = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing()).unwrap();
    assert_eq!(game.state(), GameState::Loading);
    game.start();
    assert_eq!(game.state(), GameState::Intro);

    let mut pages = 0;
    while game.state() == GameState::Intro {
        assert_eq!(game.input(""), Dispatch::Empty);
        pages += 1;
        assert!(pages < 10, "intro never ended");
    }
    assert_eq!(game.state(), GameState::Active);
    assert!(game.world.rooms.get(RoomId(1)).unwrap().seen);
}

#[test]
fn input_before_the_start_is_ignored() {
    let mut game = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing()).unwrap();
    assert_eq!(game.input("n"), Dispatch::Empty);
    assert_eq!(game.timer, 0);
}

#[test]
fn every_command_costs_a_turn() {
    let mut game = demo_game();
    let start = game.timer;
    game.input("look");
    game.input("inventory");
    assert_eq!(game.timer, start + 2);
}

#[test]
fn mistyped_verbs_are_free() {
    let mut game = demo_game();
    let start = game.timer;
    assert!(matches!(game.input("xyzzy"), Dispatch::Unknown(_)));
    assert!(matches!(game.input("ea"), Dispatch::Ambiguous(_)));
    assert_eq!(game.timer, start);
    assert!(game.is_ready());
}

#[test]
fn rooms_without_light_are_dark() {
    let mut game = demo_game();
    game.input("n");
    game.input("e");
    assert_eq!(game.world.player_room(), Some(RoomId(4)));
    assert!(!game.world.has_light());
    assert!(game.history.contains("It's too dark to see anything."));
}

#[test]
fn leaving_by_the_trail_wins() {
    let mut game = demo_game();
    game.input("w");
    assert_eq!(game.state(), GameState::Won);
    assert!(game.is_over());
    assert!(game.history.contains("You head back down the trail toward town, with a story to tell."));
    assert_eq!(game.input("n"), Dispatch::Empty);
}
