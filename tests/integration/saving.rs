//! Saving and restoring whole games

use delver_engine::{Game, GameConfig};
use delver_foundation::{ActorId, ArtifactId, RoomId};
use delver_runtime::FileSaveStore;
use delver_storage::Location;
use serde_json::json;
use tempfile::TempDir;

use crate::{demo_game, page_through_intro};

#[test]
fn restoring_brings_back_exactly_what_was_saved() {
    let mut game = demo_game();
    game.input("get torch");
    game.input("n");
    game.data.insert("rang_bell".to_string(), json!(true));
    let saved = game.world.snapshot(game.timer, game.data.clone());
    let timer = game.timer;
    game.save(1, "at the gate").unwrap();

    game.input("s");
    game.input("drop torch");
    game.world.player_mut().unwrap().gold = 0;
    game.data.clear();

    game.restore(1).unwrap();
    assert_eq!(game.timer, timer);
    assert_eq!(game.world.snapshot(game.timer, game.data.clone()), saved);
    assert_eq!(game.world.player_room(), Some(RoomId(2)));
    assert!(game.history.contains("Game restored from slot 1."));
}

#[test]
fn saves_outlive_the_game_that_wrote_them() {
    let dir = TempDir::new().unwrap();

    let mut first = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing())
        .unwrap()
        .with_save_store(FileSaveStore::open(dir.path()).unwrap());
    page_through_intro(&mut first);
    first.input("get torch");
    first.save(7, "torch in hand").unwrap();

    let mut second = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing())
        .unwrap()
        .with_save_store(FileSaveStore::open(dir.path()).unwrap());
    page_through_intro(&mut second);
    let saves = second.list_saves().unwrap();
    assert_eq!(saves.len(), 1);
    assert_eq!((saves[0].slot, saves[0].description.as_str()), (7, "torch in hand"));

    second.restore(7).unwrap();
    assert_eq!(
        second.world.artifacts.get(ArtifactId(1)).unwrap().location,
        Location::Carried(ActorId::PLAYER)
    );
}

#[test]
fn the_save_command_writes_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::from_json(delver_runtime::DEMO_ADVENTURE, GameConfig::testing())
        .unwrap()
        .with_save_store(FileSaveStore::open(dir.path()).unwrap());
    page_through_intro(&mut game);

    game.input("save");
    game.input("2");
    game.input("before the tower");
    assert!(game.history.contains("Game saved to slot 2."));
    assert!(dir.path().join("slot-02.sav").exists());
}

#[test]
fn empty_slots_cannot_be_restored() {
    let mut game = demo_game();
    assert!(game.restore(5).is_err());
    assert!(game.restore(0).is_err());
}
