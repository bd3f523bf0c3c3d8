//! Cross-layer integration tests for Delver
//!
//! Tests that play the demo adventure through the whole stack: the JSON
//! loader, the parser, the engine and the file-backed save store.

mod saving;
mod scenario;
mod turns;

use delver_engine::{Game, GameConfig, GameState};

/// The demo adventure, past its intro.
pub fn demo_game() -> Game {
    let mut game = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing()).unwrap();
    page_through_intro(&mut game);
    game
}

/// Starts the game and turns the intro pages the way a player would.
pub fn page_through_intro(game: &mut Game) {
    game.start();
    while game.state() == GameState::Intro {
        game.input("");
    }
}
