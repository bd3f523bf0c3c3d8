//! Integration tests for Layer 3: Engine
//!
//! Tests for combat, hooks and the game lifecycle, run against the demo
//! adventure.

mod combat;
mod hooks;
mod lifecycle;

use delver_engine::{Game, GameConfig, GameState};

/// The demo adventure, past its intro and waiting at the trailhead.
pub fn demo_game() -> Game {
    let mut game = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing()).unwrap();
    game.start();
    while game.state() == GameState::Intro {
        game.input("");
    }
    game
}
