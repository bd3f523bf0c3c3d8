//! Resolution against the full core command set

use delver_engine::commands::core_parser;
use delver_engine::{Game, GameConfig, GameState};
use delver_parser::{Dispatch, FnCommand, Resolution};

fn game() -> Game {
    let mut game = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing()).unwrap();
    game.start();
    while game.state() == GameState::Intro {
        game.input("");
    }
    game
}

#[test]
fn exact_verbs_beat_longer_ones() {
    let game = game();
    let parser = core_parser().unwrap();
    assert_eq!(parser.resolve("read", &game), Resolution::Verb("read".to_string()));
    assert_eq!(parser.resolve("e", &game), Resolution::Verb("e".to_string()));
    assert_eq!(parser.resolve("i", &game), Resolution::Verb("i".to_string()));
}

#[test]
fn unique_prefixes() {
    let game = game();
    let parser = core_parser().unwrap();
    for (typed, verb) in [("exa", "examine"), ("inv", "inventory"), ("att", "attack"), ("sm", "smile")] {
        assert_eq!(parser.resolve(typed, &game), Resolution::Verb(verb.to_string()));
    }
}

#[test]
fn shared_prefixes_list_every_candidate_in_order() {
    let game = game();
    let parser = core_parser().unwrap();
    assert_eq!(
        parser.resolve("re", &game),
        Resolution::Ambiguous(
            ["remove", "ready", "read", "request", "release", "restore"]
                .map(String::from)
                .to_vec()
        )
    );
}

#[test]
fn ambiguity_costs_no_turn() {
    let mut game = game();
    let timer = game.timer;
    let dispatch = game.input("ea");
    assert_eq!(
        dispatch,
        Dispatch::Ambiguous(vec!["east".to_string(), "eat".to_string()])
    );
    assert!(game.history.contains("Did you mean 'east' or 'eat'?"));
    assert_eq!(game.timer, timer);
    assert!(game.is_ready());
}

#[test]
fn debug_verbs_stay_hidden() {
    let game = game();
    let parser = core_parser().unwrap();
    assert_eq!(parser.resolve("xg", &game), Resolution::Unknown);
}

#[test]
fn adventures_can_add_verbs() {
    let mut game = game();
    game.register_command(FnCommand::new("whistle", &["whistle"], |_, _, game: &mut Game| {
        game.history.write("You whistle a tune.", delver_foundation::Style::Normal);
        Ok(())
    }))
    .unwrap();
    assert!(game.verbs().iter().any(|v| v == "whistle"));
    let dispatch = game.input("whis");
    assert!(matches!(dispatch, Dispatch::Ran { ref verb, .. } if verb == "whistle"));
    assert!(game.history.contains("You whistle a tune."));
}
