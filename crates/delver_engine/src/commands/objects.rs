//! Picking things up, putting them down, containers, doors, and lights.

use delver_foundation::{ActorId, ArtifactId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::{ArmorType, ArtifactKind, Location, Lock};
use tracing::debug;

use super::{
    artifact, guard_here, local_artifact, local_monster, monster_display_name, monster_name, player_has, split_from,
    split_into,
};
use crate::game::Game;
use crate::hooks::Event;

/// Picks something up, or everything with `get all`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetCommand;

impl Command<Game> for GetCommand {
    fn name(&self) -> &str {
        "get"
    }

    fn verbs(&self) -> &[&'static str] {
        &["get"]
    }

    fn description(&self) -> &str {
        "Picks something up"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if !game.allows(Event::SpecialGet { arg: arg.to_string() }) {
            return Ok(());
        }
        let all = arg == "all";
        let mut matched = false;
        let room = game.world.player_room();
        let lying_here = room.map_or_else(Vec::new, |r| game.world.artifacts.in_room(r));

        for id in lying_here {
            let item = artifact(game, id)?;
            if !(all || item.matches(arg)) || item.location.room() != room {
                continue;
            }
            matched = true;
            if all && (!item.get_all || item.embedded || item.hidden) {
                continue;
            }
            if !game.allows(Event::BeforeGet {
                arg: arg.to_string(),
                artifact: id,
            }) {
                continue;
            }
            if item.kind == ArtifactKind::DisguisedMonster {
                game.reveal_disguised_monster(id)?;
                continue;
            }
            if item.embedded {
                game.reveal_artifact(id)?;
            }
            if let Some(guard) = guard_here(game, &item) {
                if all {
                    continue;
                }
                return Err(CommandError::refused(format!(
                    "{} won't let you!",
                    monster_display_name(game, guard)
                )));
            }
            if all && (item.weight > 900 || item.weight == -999) {
                continue;
            }
            if item.weight > 900 {
                return Err(CommandError::refused("Don't be absurd."));
            }
            if item.weight == -999 {
                return Err(CommandError::refused("You can't get that."));
            }
            if item.kind == ArtifactKind::BoundMonster {
                if all {
                    game.history
                        .write(format!("{} can't be picked up.", item.name), Style::Normal);
                    continue;
                }
                return Err(CommandError::refused("You can't get that."));
            }

            if item.weight > game.world.remaining_capacity(ActorId::PLAYER) {
                game.history
                    .write(format!("{} is too heavy.", item.name), Style::Normal);
                continue;
            }
            game.pick_up(ActorId::PLAYER, id)?;
            let line = if item.kind == ArtifactKind::Gold {
                game.world.player_mut()?.gold += item.value;
                game.world.destroy_artifact(id)?;
                format!("{} is added to your coin pouch.", item.name)
            } else {
                format!("{} taken.", item.name)
            };
            if all {
                game.history.write_compact(line, Style::Normal);
            } else {
                game.history.write(line, Style::Normal);
            }
            game.trigger(Event::AfterGet {
                arg: arg.to_string(),
                artifact: id,
            });

            let unarmed = game.world.player()?.armament.weapon().is_none();
            if game.in_battle && item.is_weapon() && unarmed {
                let shield = game.world.is_wearing_slot(ActorId::PLAYER, ArmorType::Shield);
                if item.hands == 1 || !shield {
                    game.ready_weapon(ActorId::PLAYER, id)?;
                    game.history.write("Readied.", Style::Normal);
                }
            }
        }
        game.refresh_visible();

        if !matched {
            let nested = game
                .world
                .artifacts
                .by_name(arg)
                .and_then(|a| a.location.container().map(|c| (a.id, c)));
            if let Some((inner, container_id)) = nested {
                let container = artifact(game, container_id)?;
                if player_has(game, container_id) {
                    return Err(CommandError::refused(format!(
                        "You're already carrying it. But you could REMOVE it from the {}.",
                        container.name
                    )));
                }
                if container.location.room() == room && room.is_some() && !container.embedded {
                    if game.allows(Event::BeforeGet {
                        arg: arg.to_string(),
                        artifact: inner,
                    }) {
                        game.run_command(&format!("remove {arg} from {}", container.name));
                        game.trigger(Event::AfterGet {
                            arg: arg.to_string(),
                            artifact: inner,
                        });
                    }
                    return Ok(());
                }
            }
        }

        if !matched && !all {
            if local_monster(game, arg).is_some() {
                return Err(CommandError::refused("I can't get that."));
            }
            return Err(CommandError::refused(format!("I see no {arg} here!")));
        }
        Ok(())
    }
}

/// Takes something out of a container, or takes off something worn.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveCommand;

impl Command<Game> for RemoveCommand {
    fn name(&self) -> &str {
        "remove"
    }

    fn verbs(&self) -> &[&'static str] {
        &["remove"]
    }

    fn description(&self) -> &str {
        "Removes an item from a container, or takes off clothing or armor"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        match split_from(arg) {
            Some((item_name, container_name)) => remove_from_container(game, arg, item_name, container_name),
            None => take_off(game, arg),
        }
    }
}

fn remove_from_container(game: &mut Game, arg: &str, item_name: &str, container_name: &str) -> CommandResult {
    let Some(container_id) = local_artifact(game, container_name) else {
        if let Some(monster) = local_monster(game, container_name) {
            return Err(CommandError::refused(format!(
                "I can't remove something from {}!",
                monster_name(game, monster)
            )));
        }
        return Err(CommandError::refused(format!("I see no {container_name} here!")));
    };
    let container = artifact(game, container_id)?;
    if !container.is_container() {
        return Err(CommandError::refused(format!(
            "I can't remove things from the {container_name}!"
        )));
    }
    if !container.is_open {
        return Err(CommandError::refused(format!("Try opening the {container_name} first.")));
    }
    let inside = game
        .world
        .artifacts
        .contents(container_id)
        .into_iter()
        .find(|id| game.world.artifacts.get(*id).is_some_and(|a| a.matches(item_name)));
    let Some(item_id) = inside else {
        return Err(CommandError::refused(format!(
            "There is no {item_name} inside the {container_name}!"
        )));
    };

    if !game.allows(Event::BeforeRemoveFromContainer {
        arg: arg.to_string(),
        artifact: item_id,
        container: container_id,
    }) {
        return Ok(());
    }
    let item = artifact(game, item_id)?;
    if !item.seen {
        game.show_artifact_description(item_id);
        game.world.artifacts.require_mut(item_id)?.seen = true;
    }
    if let Some(guard) = guard_here(game, &item) {
        return Err(CommandError::refused(format!(
            "{} won't let you!",
            monster_display_name(game, guard)
        )));
    }
    if item.kind == ArtifactKind::Gold {
        game.history.write(
            format!("You add the {} to your coin pouch.", item.name),
            Style::Normal,
        );
        game.world.player_mut()?.gold += item.value;
        game.world.destroy_artifact(item_id)?;
    } else {
        let to_player =
            game.world.removal_destination(item_id)? == Location::Carried(ActorId::PLAYER);
        if to_player && item.weight > game.world.remaining_capacity(ActorId::PLAYER) {
            return Err(CommandError::refused(format!("{} is too heavy.", item.name)));
        }
        game.history.write(
            format!("{} removed from {}.", item.name, container.name),
            Style::Normal,
        );
        let to = game.world.remove_from_container(item_id)?;
        debug!(artifact = %item_id, ?to, "removed from container");
    }
    game.refresh_visible();
    game.trigger(Event::AfterRemoveFromContainer {
        arg: arg.to_string(),
        artifact: item_id,
        container: container_id,
    });
    Ok(())
}

fn take_off(game: &mut Game, arg: &str) -> CommandResult {
    let worn = game
        .world
        .worn(ActorId::PLAYER)
        .into_iter()
        .find(|id| game.world.artifacts.get(*id).is_some_and(|a| a.matches(arg)));
    let Some(id) = worn.or_else(|| game.world.find_in_inventory(ActorId::PLAYER, arg)) else {
        return Err(CommandError::refused(format!("You aren't carrying a {arg}!")));
    };
    let item = artifact(game, id)?;
    if !item.is_worn {
        return Err(CommandError::refused("You aren't wearing it!"));
    }
    if game.allows(Event::BeforeRemoveWearable {
        arg: arg.to_string(),
        artifact: id,
    }) {
        game.set_worn(ActorId::PLAYER, id, false)?;
        game.history
            .write(format!("You take off the {}.", item.name), Style::Normal);
        game.trigger(Event::AfterRemoveWearable {
            arg: arg.to_string(),
            artifact: id,
        });
    }
    Ok(())
}

/// Puts something into a container.
#[derive(Clone, Copy, Debug, Default)]
pub struct PutCommand;

impl Command<Game> for PutCommand {
    fn name(&self) -> &str {
        "put"
    }

    fn verbs(&self) -> &[&'static str] {
        &["put"]
    }

    fn description(&self) -> &str {
        "Places an item into a container"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let Some((item_name, container_name)) = split_into(arg) else {
            return Err(CommandError::refused("Try putting (SOMETHING) into (SOMETHING ELSE)."));
        };
        if let Some(monster) = local_monster(game, item_name) {
            return Err(CommandError::refused(format!(
                "I can't put {} into something!",
                monster_name(game, monster)
            )));
        }
        if let Some(monster) = local_monster(game, container_name) {
            return Err(CommandError::refused(format!(
                "I can't put something into {}!",
                monster_name(game, monster)
            )));
        }
        let item_id =
            local_artifact(game, item_name).ok_or_else(|| CommandError::refused(format!("I see no {item_name} here!")))?;
        let container_id = local_artifact(game, container_name)
            .ok_or_else(|| CommandError::refused(format!("I see no {container_name} here!")))?;

        if !game.allows(Event::SpecialPut {
            arg: arg.to_string(),
            item: item_id,
            container: container_id,
        }) {
            return Ok(());
        }
        let item = artifact(game, item_id)?;
        let container = artifact(game, container_id)?;
        if game.world.would_contain_itself(item_id, container_id) {
            return Err(CommandError::refused("You can't put something inside itself."));
        }
        if item.kind == ArtifactKind::DisguisedMonster {
            return Ok(game.reveal_disguised_monster(item_id)?);
        }
        if container.kind == ArtifactKind::DisguisedMonster {
            return Ok(game.reveal_disguised_monster(container_id)?);
        }
        if item.weight > 900 {
            return Err(CommandError::refused("Don't be absurd."));
        }
        if item.weight == -999 || item.kind == ArtifactKind::BoundMonster {
            return Err(CommandError::refused("You can't do that."));
        }
        if item.weight > game.world.artifacts.remaining_capacity(container_id) {
            return Err(CommandError::refused("It won't fit!"));
        }
        if !container.is_container() {
            return Err(CommandError::refused(format!(
                "I can't put things into the {container_name}!"
            )));
        }
        if !container.is_open {
            return Err(CommandError::refused(format!("Try opening the {container_name} first.")));
        }
        if game.allows(Event::BeforePut {
            arg: arg.to_string(),
            item: item_id,
            container: container_id,
        }) {
            game.world.put_into_container(item_id, container_id)?;
            game.history.write("Done.", Style::Normal);
            game.refresh_visible();
            game.trigger(Event::AfterPut {
                arg: arg.to_string(),
                item: item_id,
                container: container_id,
            });
        }
        Ok(())
    }
}

/// Drops something carried, or everything not worn with `drop all`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DropCommand;

impl Command<Game> for DropCommand {
    fn name(&self) -> &str {
        "drop"
    }

    fn verbs(&self) -> &[&'static str] {
        &["drop"]
    }

    fn description(&self) -> &str {
        "Drops an item you are carrying"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let all = arg == "all";
        let mut matched = false;
        for id in game.world.carried(ActorId::PLAYER) {
            let item = artifact(game, id)?;
            if !(all || item.matches(arg)) || (all && item.is_worn) {
                continue;
            }
            matched = true;
            if game.allows(Event::Drop {
                arg: arg.to_string(),
                artifact: id,
            }) {
                game.drop_artifact(ActorId::PLAYER, id)?;
                game.history
                    .write_compact(format!("{} dropped.", item.name), Style::Normal);
            }
        }
        game.refresh_visible();
        if !matched && !all {
            return Err(CommandError::refused(format!("You aren't carrying a {arg}!")));
        }
        Ok(())
    }
}

// =============================================================================
// Doors and containers
// =============================================================================

/// Opens a door, gate, or container, using a carried key if it needs one.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenCommand;

impl Command<Game> for OpenCommand {
    fn name(&self) -> &str {
        "open"
    }

    fn verbs(&self) -> &[&'static str] {
        &["open"]
    }

    fn description(&self) -> &str {
        "Opens a closed door, gate, or container"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if arg.is_empty() {
            return Err(CommandError::refused("Open what?"));
        }
        let Some(id) = local_artifact(game, arg) else {
            let mentioned = game.world.current_room().is_some_and(|r| r.text_match(arg));
            if mentioned && arg == "door" {
                return Err(CommandError::refused("The door will open when you pass through it."));
            }
            if mentioned || local_monster(game, arg).is_some() {
                return Err(CommandError::refused("That's not something you can open."));
            }
            return Err(CommandError::refused(format!("I don't see a {arg} here!")));
        };

        if !game.allows(Event::BeforeOpen {
            arg: arg.to_string(),
            artifact: Some(id),
        }) {
            return Ok(());
        }
        let item = artifact(game, id)?;
        let revealed = item.embedded;
        if revealed {
            game.reveal_artifact(id)?;
        }
        let openable = matches!(
            item.kind,
            ArtifactKind::Container
                | ArtifactKind::Door
                | ArtifactKind::Readable
                | ArtifactKind::Edible
                | ArtifactKind::Drinkable
        );
        if item.kind == ArtifactKind::DisguisedMonster {
            game.reveal_disguised_monster(id)?;
            return Ok(());
        }
        if !openable {
            return Err(CommandError::refused("That's not something you can open."));
        }
        if game.world.artifacts.get(id).is_some_and(|a| a.is_open) {
            if !revealed {
                game.history.write("It's already open!", Style::Normal);
            }
            return Ok(());
        }

        match item.lock {
            Lock::Jammed => game.history.write("It won't open.", Style::Normal),
            Lock::Unlocked if item.hardiness.is_some() => {
                game.history.write("You'll have to force it open.", Style::Normal);
            }
            Lock::Key(key) if !player_has(game, key) => {
                game.history
                    .write("It's locked and you don't have the key!", Style::Normal);
            }
            Lock::Key(key) => {
                let key_name = artifact(game, key)?.name;
                game.history
                    .write(format!("You unlock it using the {key_name}."), Style::Normal);
                finish_opening(game, arg, id)?;
            }
            Lock::Unlocked => {
                game.history
                    .write(format!("{} opened.", item.name), Style::Normal);
                finish_opening(game, arg, id)?;
            }
        }
        Ok(())
    }
}

fn finish_opening(game: &mut Game, arg: &str, id: ArtifactId) -> CommandResult {
    game.open_artifact(id)?;
    let item = artifact(game, id)?;
    let unseen_effect = item
        .effect_id
        .filter(|effect| game.world.effects.get(*effect).is_some_and(|e| !e.seen));
    if let Some(effect) = unseen_effect {
        game.print_effect(effect);
    }
    game.trigger(Event::AfterOpen {
        arg: arg.to_string(),
        artifact: id,
    });
    if item.is_container() {
        game.print_contents(id)?;
    }
    Ok(())
}

/// Closes a door, gate, or container.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloseCommand;

impl Command<Game> for CloseCommand {
    fn name(&self) -> &str {
        "close"
    }

    fn verbs(&self) -> &[&'static str] {
        &["close"]
    }

    fn description(&self) -> &str {
        "Closes an open door, gate, or container"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if arg.is_empty() {
            return Err(CommandError::refused("Close what?"));
        }
        let Some(id) = local_artifact(game, arg) else {
            return Err(CommandError::refused("It's not here."));
        };
        if !game.allows(Event::BeforeClose {
            arg: arg.to_string(),
            artifact: Some(id),
        }) {
            return Ok(());
        }
        let item = artifact(game, id)?;
        if item.hidden {
            return Err(CommandError::refused("I don't follow you."));
        }
        if item.embedded {
            game.reveal_artifact(id)?;
        }
        let needless = matches!(
            item.kind,
            ArtifactKind::Readable | ArtifactKind::Edible | ArtifactKind::Drinkable
        ) || item.lock == Lock::Jammed;
        if needless {
            return Err(CommandError::refused("You don't need to."));
        }
        if item.is_container() || item.is_door() {
            if !item.is_open {
                return Err(CommandError::refused("It's not open."));
            }
            if item.is_broken {
                return Err(CommandError::refused("You broke it."));
            }
            game.close_artifact(id)?;
            game.history
                .write(format!("{} closed.", item.name), Style::Normal);
            game.trigger(Event::AfterClose {
                arg: arg.to_string(),
                artifact: id,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Light
// =============================================================================

/// Lights a light source, or puts it out.
#[derive(Clone, Copy, Debug, Default)]
pub struct LightCommand;

impl Command<Game> for LightCommand {
    fn name(&self) -> &str {
        "light"
    }

    fn verbs(&self) -> &[&'static str] {
        &["light"]
    }

    fn description(&self) -> &str {
        "Lights a light source, or puts it out if it is lit"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if arg.is_empty() {
            return Err(CommandError::refused("Light what?"));
        }
        let Some(id) = local_artifact(game, arg) else {
            return Err(CommandError::refused(format!("You aren't carrying a {arg}!")));
        };
        if !game.allows(Event::Light {
            arg: arg.to_string(),
            artifact: id,
        }) {
            return Ok(());
        }
        let item = artifact(game, id)?;
        if item.kind != ArtifactKind::LightSource {
            return Err(CommandError::refused("That isn't a light source!"));
        }
        if item.is_lit {
            game.world.artifacts.require_mut(id)?.is_lit = false;
            game.history
                .write(format!("You put out the {}.", item.name), Style::Normal);
        } else if item.quantity.is_none_or(|fuel| fuel > 0 || fuel == -1) {
            game.world.artifacts.require_mut(id)?.is_lit = true;
            game.history
                .write(format!("You light the {}.", item.name), Style::Normal);
        } else {
            game.history.write("It's out of fuel!", Style::Normal);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use delver_foundation::{ActorId, ArtifactId};
    use delver_parser::Dispatch;
    use delver_storage::{Armament, Artifact, ArtifactKind, Location};

    use super::super::testkit::*;
    use crate::game::Game;
    use crate::hooks::HookResult;

    fn armed(game: &Game) -> bool {
        game.world
            .player()
            .is_ok_and(|p| matches!(p.armament, Armament::Wields(_)))
    }

    fn open_chest(game: &mut Game) {
        game.world.artifacts.get_mut(CHEST).unwrap().is_open = true;
    }

    #[test]
    fn get_and_drop() {
        let mut game = game();
        game.input("get torch");
        assert!(game.history.contains("torch taken."));
        assert_eq!(
            game.world.artifacts.get(TORCH).unwrap().location,
            Location::Carried(ActorId::PLAYER)
        );
        game.input("drop torch");
        assert!(game.history.contains("torch dropped."));
        assert_eq!(game.world.artifact_room(TORCH), Some(COURTYARD));
    }

    #[test]
    fn get_refusals() {
        let mut game = game();
        game.input("get boulder");
        assert!(game.history.contains("Don't be absurd."));
        game.input("get iron gate");
        assert!(game.history.contains("You can't get that."));
        let dispatch = game.input("get unicorn");
        assert!(matches!(dispatch, Dispatch::Refused { .. }));
        assert!(game.history.contains("I see no unicorn here!"));
    }

    #[test]
    fn get_all_skips_what_cannot_be_carried() {
        let mut game = game();
        let mut stone = Artifact::new(ArtifactId(60), "loose stone", ArtifactKind::Treasure)
            .at(Location::Room(COURTYARD))
            .with_weight(1);
        stone.hidden = true;
        game.world.artifacts.add(stone).unwrap();
        let mut crest = Artifact::new(ArtifactId(61), "carved crest", ArtifactKind::Treasure)
            .at(Location::Room(COURTYARD))
            .with_weight(1);
        crest.embedded = true;
        game.world.artifacts.add(crest).unwrap();
        game.refresh_visible();

        game.input("get all");
        assert!(game.history.contains("torch taken."));
        assert!(game.history.contains("scroll taken."));
        assert!(!game.history.contains("Don't be absurd."));
        assert!(!game.history.contains("loose stone taken."));
        assert!(!game.history.contains("carved crest taken."));
        assert_eq!(game.world.artifact_room(BOULDER), Some(COURTYARD));
        assert_eq!(game.world.artifact_room(CHEST), Some(COURTYARD));
        assert_eq!(game.world.artifact_room(ArtifactId(60)), Some(COURTYARD));
        assert_eq!(game.world.artifact_room(ArtifactId(61)), Some(COURTYARD));
        assert!(game.world.artifacts.get(ArtifactId(61)).unwrap().embedded);
    }

    #[test]
    fn heavy_things_stay_put() {
        let mut game = game();
        game.world.artifacts.get_mut(TORCH).unwrap().weight = 500;
        game.input("get torch");
        assert!(game.history.contains("torch is too heavy."));
    }

    #[test]
    fn guards_protect_their_treasure() {
        let mut game = game_in(GARDEN);
        game.world.artifacts.get_mut(KEY).unwrap().guard_id = Some(HERMIT);
        game.input("get iron key");
        assert!(game.history.contains("hermit won't let you!"));
        assert_eq!(game.world.artifact_room(KEY), Some(GARDEN));
    }

    #[test]
    fn gold_in_a_chest() {
        let mut game = game();
        game.input("remove coins from chest");
        assert!(game.history.contains("Try opening the chest first."));
        game.input("open chest");
        assert!(game.history.contains("chest opened."));
        assert!(game.history.contains(" - coins"));
        game.input("get coins");
        assert!(game.history.contains("You add the coins to your coin pouch."));
        assert_eq!(game.world.player().unwrap().gold, 35);
        assert_eq!(game.world.artifacts.get(COINS).unwrap().location, Location::Nowhere);
    }

    #[test]
    fn put_and_remove() {
        let mut game = game();
        open_chest(&mut game);
        game.input("put potion into chest");
        assert!(game.history.contains("Done."));
        assert_eq!(game.world.artifacts.get(POTION).unwrap().location, Location::Contained(CHEST));
        game.input("remove potion from chest");
        assert!(game.history.contains("potion removed from chest."));
        assert_eq!(
            game.world.artifacts.get(POTION).unwrap().location,
            Location::Carried(ActorId::PLAYER)
        );
        game.input("remove potion from torch");
        assert!(game.history.contains("I can't remove things from the torch!"));
    }

    #[test]
    fn removing_respects_carrying_capacity() {
        let mut game = game();
        open_chest(&mut game);
        game.world
            .artifacts
            .add(
                Artifact::new(ArtifactId(62), "anvil", ArtifactKind::Treasure)
                    .at(Location::Contained(CHEST))
                    .with_weight(195),
            )
            .unwrap();
        let before = game.world.weight_carried(ActorId::PLAYER);

        let dispatch = game.input("remove anvil from chest");
        assert!(matches!(dispatch, Dispatch::Refused { .. }));
        assert!(game.history.contains("anvil is too heavy."));
        assert!(!game.history.contains("anvil removed from chest."));
        assert_eq!(
            game.world.artifacts.get(ArtifactId(62)).unwrap().location,
            Location::Contained(CHEST)
        );
        assert_eq!(game.world.weight_carried(ActorId::PLAYER), before);
    }

    #[test]
    fn nothing_goes_inside_itself() {
        let mut game = game();
        let mut bag = Artifact::new(ArtifactId(63), "bag", ArtifactKind::Container)
            .at(Location::Carried(ActorId::PLAYER))
            .with_weight(1);
        bag.is_open = true;
        bag.quantity = Some(10);
        game.world.artifacts.add(bag).unwrap();

        let dispatch = game.input("put bag into bag");
        assert!(matches!(dispatch, Dispatch::Refused { .. }));
        assert!(game.history.contains("You can't put something inside itself."));
        assert!(!game.history.contains("Done."));
        assert_eq!(
            game.world.artifacts.get(ArtifactId(63)).unwrap().location,
            Location::Carried(ActorId::PLAYER)
        );
    }

    #[test]
    fn put_refusals() {
        let mut game = game();
        open_chest(&mut game);
        game.input("put potion");
        assert!(game.history.contains("Try putting (SOMETHING) into (SOMETHING ELSE)."));
        game.world.artifacts.get_mut(ARMOR).unwrap().weight = 25;
        game.input("put leather armor in chest");
        assert!(game.history.contains("It won't fit!"));
        game.input("put potion in boulder");
        assert!(game.history.contains("I can't put things into the boulder!"));
    }

    #[test]
    fn take_off_armor() {
        let mut game = game();
        game.set_worn(ActorId::PLAYER, ARMOR, true).unwrap();
        game.input("remove leather armor");
        assert!(game.history.contains("You take off the leather armor."));
        assert!(!game.world.artifacts.get(ARMOR).unwrap().is_worn);
        game.input("remove leather armor");
        assert!(game.history.contains("You aren't wearing it!"));
        game.input("remove crown");
        assert!(game.history.contains("You aren't carrying a crown!"));
    }

    #[test]
    fn drop_all_keeps_worn_items() {
        let mut game = game();
        game.set_worn(ActorId::PLAYER, ARMOR, true).unwrap();
        game.input("drop all");
        assert!(game.history.contains("dagger dropped."));
        assert!(game.history.contains("potion dropped."));
        assert_eq!(
            game.world.artifacts.get(ARMOR).unwrap().location,
            Location::Carried(ActorId::PLAYER)
        );
        assert!(!armed(&game));
    }

    #[test]
    fn locked_gate_needs_its_key() {
        let mut game = game();
        game.input("open iron gate");
        assert!(game.history.contains("It's locked and you don't have the key!"));
        game.world
            .move_artifact_to_inventory(KEY, ActorId::PLAYER)
            .unwrap();
        game.input("open gate");
        assert!(game.history.contains("You unlock it using the iron key."));
        assert!(game.world.artifacts.get(GATE).unwrap().is_open);
        game.input("open gate");
        assert!(game.history.contains("It's already open!"));
        game.input("close gate");
        assert!(game.history.contains("iron gate closed."));
        game.input("close gate");
        assert!(game.history.contains("It's not open."));
    }

    #[test]
    fn stuck_and_jammed_things() {
        let mut game = game();
        game.world.artifacts.get_mut(CHEST).unwrap().hardiness = Some(10);
        game.input("open chest");
        assert!(game.history.contains("You'll have to force it open."));
        game.world.artifacts.get_mut(CHEST).unwrap().lock = delver_storage::Lock::Jammed;
        game.input("open chest");
        assert!(game.history.contains("It won't open."));
        game.input("open torch");
        assert!(game.history.contains("That's not something you can open."));
        game.input("open door");
        assert!(game.history.contains("I don't see a door here!"));
        game.input("close scroll");
        assert!(game.history.contains("You don't need to."));
    }

    #[test]
    fn before_open_can_refuse_quietly() {
        let mut game = game();
        game.hooks.register("beforeOpen", |_, _| HookResult::Veto);
        game.input("open chest");
        assert!(!game.world.artifacts.get(CHEST).unwrap().is_open);
        assert!(!game.history.contains("chest opened."));
    }

    #[test]
    fn lighting_and_snuffing() {
        let mut game = game();
        game.input("light torch");
        assert!(game.history.contains("You light the torch."));
        assert!(game.world.artifacts.get(TORCH).unwrap().is_lit);
        game.input("light torch");
        assert!(game.history.contains("You put out the torch."));
        game.world.artifacts.get_mut(TORCH).unwrap().quantity = Some(0);
        game.input("light torch");
        assert!(game.history.contains("It's out of fuel!"));
        game.input("light scroll");
        assert!(game.history.contains("That isn't a light source!"));
        game.input("light");
        assert!(game.history.contains("Light what?"));
    }

    #[test]
    fn bound_monsters_cannot_be_carried() {
        let mut game = game();
        let mut prisoner = delver_storage::Artifact::new(
            delver_foundation::ArtifactId(20),
            "prisoner",
            ArtifactKind::BoundMonster,
        )
        .at(Location::Room(COURTYARD));
        prisoner.bound_monster = Some(HERMIT);
        game.world.artifacts.add(prisoner).unwrap();
        game.refresh_visible();
        game.input("get prisoner");
        assert!(game.history.contains("You can't get that."));
        game.input("get all");
        assert!(game.history.contains("prisoner can't be picked up."));
    }
}
